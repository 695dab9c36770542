use clap::Parser;
use std::env;
use zipchunk::pipeline::DEFAULT_SIZE_THRESHOLD;
use zipchunk::{scan_tree, Config, Mode};

#[derive(Parser)]
#[command(name = "zipchunk")]
#[command(about = "Compress and split large files, or recover them")]
struct Cli {
    /// Recover files from .dir chunk directories
    #[arg(long)]
    recover: bool,
    /// Remove originals after splitting (or chunk directories after recovery)
    #[arg(long)]
    auto_remove: bool,
    /// Show detailed progress information
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config {
        auto_remove: cli.auto_remove,
        verbose: cli.verbose,
        ..Config::default()
    };
    let mode = if cli.recover {
        Mode::Recover
    } else {
        Mode::Split
    };

    let root = env::current_dir()?;
    println!("Scanning directory: {}", root.display());

    match mode {
        Mode::Recover => {
            println!("Mode: RECOVER");
            if config.auto_remove {
                println!("Auto-remove: ENABLED (.dir directories will be deleted after recovery)");
            }
        }
        Mode::Split => {
            println!("Mode: COMPRESS AND SPLIT");
            println!("Maximum file size: {} bytes", DEFAULT_SIZE_THRESHOLD);
            if config.auto_remove {
                println!("Auto-remove: ENABLED (original files will be deleted after splitting)");
            }
        }
    }
    if config.verbose {
        println!("Verbose: ENABLED");
    }

    println!("{}", "-".repeat(60));
    let own_exe = env::current_exe().ok();
    let report = scan_tree(&root, mode, &config, own_exe.as_deref())?;
    println!("{}", "-".repeat(60));
    println!("{}", report.summary());
    println!("Done!");

    Ok(())
}
