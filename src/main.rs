//! wpcorr CLI entry point

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wpcorr::config::{Cli, Settings};
use wpcorr::pipeline;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli);

    // Validate inputs
    if let Err(e) = validate_inputs(&cli) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    // Build settings from CLI
    let settings = Settings::from_cli(&cli);

    // Run the pipeline
    match pipeline::run(&settings) {
        Ok(summary) => {
            if settings.dry_run {
                return ExitCode::SUCCESS;
            }

            for output in &summary.outputs {
                println!("✓ Wrote {} records to {}", summary.waypoints, output.display());
            }
            println!(
                "Summary: {} matched, {} unmatched, {} waypoints skipped (of {} waypoints, {} videos)",
                summary.matched,
                summary.unmatched,
                summary.skipped_waypoints,
                summary.waypoints + summary.skipped_waypoints,
                summary.videos
            );
            if summary.videos > 0 && summary.probed == 0 {
                println!("  Note: no container metadata was read; offsets use filesystem timestamps");
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = cli.log_level().to_string().to_lowercase();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn validate_inputs(cli: &Cli) -> Result<(), String> {
    if !cli.gpx_file.is_file() {
        return Err(format!(
            "GPX file not found: {}\n\n  Tip: Check the path is correct and accessible.\n  Example:\n    wpcorr ./survey.gpx ./videos -o correlation.csv",
            cli.gpx_file.display()
        ));
    }

    if !cli.video_dir.is_dir() {
        return Err(format!(
            "Video directory not found: {}\n\n  Tip: The second argument must be a directory containing the recordings.",
            cli.video_dir.display()
        ));
    }

    // Output files are created, but their directories must already exist
    check_output_parent(&cli.output)?;
    if let Some(ref json) = cli.json {
        check_output_parent(json)?;
    }

    Ok(())
}

fn check_output_parent(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(format!(
                "Output directory does not exist: {}\n\n  Example: mkdir -p {}",
                parent.display(),
                parent.display()
            ));
        }
    }
    Ok(())
}
