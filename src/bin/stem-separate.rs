use std::{path::PathBuf, process};

use clap::{Parser, Subcommand};
use stem_harness::{load_config, load_config_from, run_all, run_backend, BackendKind, Config, SplitReport};

#[derive(Parser)]
#[command(name = "stem-separate")]
#[command(about = "Split a track into stems with Spleeter, Demucs or Open-Unmix", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to config.json at the project root)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// File under `input_dir` to separate (overrides `input_file`)
    #[arg(short, long, global = true)]
    input: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Separate with Spleeter
    Spleeter,

    /// Separate with Demucs
    Demucs,

    /// Separate with Open-Unmix
    Openunmix,

    /// Run several backends over the same input, one after another
    All {
        #[arg(short, long = "backend", value_enum)]
        backends: Vec<BackendKind>,
    },

    /// Print the configured input and output directories
    Config,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(input) = cli.input {
        config.input_file = input;
    }

    match cli.command {
        Commands::Spleeter => print_report(&run_backend(BackendKind::Spleeter, &config)?),
        Commands::Demucs => print_report(&run_backend(BackendKind::Demucs, &config)?),
        Commands::Openunmix => print_report(&run_backend(BackendKind::OpenUnmix, &config)?),
        Commands::All { backends } => {
            let kinds = if backends.is_empty() {
                BackendKind::all().to_vec()
            } else {
                backends
            };
            for report in run_all(&kinds, &config)? {
                print_report(&report);
            }
        }
        Commands::Config => print_config(&config),
    }

    Ok(())
}

fn print_report(report: &SplitReport) {
    eprintln!("✅ {} split into {:?}", report.backend, report.stems);
    for file in &report.files {
        println!("{}", file.display());
    }
}

fn print_config(config: &Config) {
    println!("Input Directory: {}", config.input_dir.display());
    println!("Output Directory: {}", config.output_dir.display());
    println!("Input File: {}", config.input_path().display());
}
