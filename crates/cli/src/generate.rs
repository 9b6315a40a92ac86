use force10_core::manifest::ManifestFormat;
use force10_core::project::{ChainLocator, ControllerDirs, ProjectLayout, Psr4Locator};
use force10_core::route::RouteListFile;
use force10_core::scanner::ScanReport;
use force10_core::{ComponentResolver, Force10Config, ManifestWriter, RouteScanner};
use nu_ansi_term::Color;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub struct GenerateArgs {
    pub root: PathBuf,
    pub routes: PathBuf,
    pub config: Option<PathBuf>,
    pub path: Option<PathBuf>,
    pub verbose: bool,
}

pub fn run(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => Force10Config::load(&Force10Config::resolve_path(&args.root, path))?,
        None => Force10Config::load_from_project(&args.root)?,
    };

    if !config.enabled {
        warn!("Force10 is disabled; nothing generated");
        return Ok(());
    }

    let controller_dirs = config
        .resolution
        .controller_paths
        .iter()
        .map(|dir| Force10Config::resolve_path(&args.root, dir))
        .collect();
    let project = Arc::new(
        ProjectLayout::discover(&args.root)
            .with_app_dir(Force10Config::resolve_path(&args.root, &config.app_dir))
            .with_locator(ChainLocator::new(
                Psr4Locator::from_composer(&args.root),
                ControllerDirs::new(controller_dirs),
            )),
    );
    let routes = RouteListFile::load(&Force10Config::resolve_path(&args.root, &args.routes))?;
    let scanner = RouteScanner::new(routes, ComponentResolver::standard(project));

    info!("Scanning routes under {}", args.root.display());
    let entries = scanner.build_manifest(&config.routes);

    let output = args.path.as_ref().unwrap_or(&config.manifest_path);
    let output = Force10Config::resolve_path(&args.root, output);
    ManifestWriter::new(ManifestFormat::for_path(&output)).write(&entries, &output)?;

    if args.verbose {
        print_report(&scanner.report(&config.routes));
        println!();
    }
    println!(
        "{}",
        Color::Green.paint(format!(
            "Generated {} routes to {}",
            entries.len(),
            output.display()
        ))
    );

    Ok(())
}

fn print_report(report: &ScanReport) {
    println!(
        "{}",
        Color::Green.paint(format!("Included routes ({}):", report.included.len()))
    );
    for (uri, component) in &report.included {
        println!("  {} {} -> {}", Color::Green.paint("+"), uri, component);
    }

    if !report.skipped.is_empty() {
        println!();
        println!(
            "{}",
            Color::Yellow.paint(format!("Skipped routes ({}):", report.skipped.len()))
        );
        for (uri, reason) in &report.skipped {
            println!("  {} {}: {}", Color::Yellow.paint("-"), uri, reason);
        }
    }
}
