use force10_core::Force10Config;
use force10_core::preload::PreloadTagGenerator;
use std::path::PathBuf;

pub fn run(root: PathBuf, config: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => Force10Config::load(&Force10Config::resolve_path(&root, &path))?,
        None => Force10Config::load_from_project(&root)?,
    };

    let tags = PreloadTagGenerator::new(&root, &config).generate();
    if !tags.is_empty() {
        println!("{}", tags);
    }
    Ok(())
}
