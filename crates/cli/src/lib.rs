mod generate;
mod preload;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "force10",
    version,
    about = "Generate the Force10 route manifest for Inertia applications",
    long_about = "Force10 reads the host application's GET routes, infers which Inertia page \
                  component each one renders, and writes a manifest the client router can \
                  import for optimistic navigation."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the route manifest
    #[command(
        long_about = "Resolves a component for every eligible route in the route dump and writes \
                            the manifest module. Routes without a resolvable component are skipped."
    )]
    Generate {
        /// Project root. Defaults to current directory.
        #[arg(long, value_name = "PROJECT_PATH")]
        project: Option<PathBuf>,

        /// JSON route dump from the host router
        #[arg(long, value_name = "FILE", default_value = "routes.json")]
        routes: PathBuf,

        /// Config file. Defaults to force10.json in the project root.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output path for manifest
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,

        /// Report included and skipped routes
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print modulepreload tags for manifest components
    Preload {
        /// Project root. Defaults to current directory.
        #[arg(long, value_name = "PROJECT_PATH")]
        project: Option<PathBuf>,

        /// Config file. Defaults to force10.json in the project root.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn project_root(project: Option<PathBuf>) -> PathBuf {
    project.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Generate { verbose: true, .. });
    let _guard = force10_core::logging::init_logging("cli", verbose);

    match cli.command {
        Commands::Generate {
            project,
            routes,
            config,
            path,
            verbose,
        } => generate::run(generate::GenerateArgs {
            root: project_root(project),
            routes,
            config,
            path,
            verbose,
        }),
        Commands::Preload { project, config } => preload::run(project_root(project), config),
    }
}
