use clap::Parser;
use std::sync::Arc;
use story_progress::utils::{logger, validation::Validate};
use story_progress::{CliConfig, MarkerCatalog, ProgressModel, StoryState};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting story-progress CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let catalog = Arc::new(MarkerCatalog::from_file(&config.catalog)?);
    tracing::info!(
        "Loaded marker catalog for {} stages from {}",
        catalog.stage_count(),
        config.catalog
    );

    let raw = std::fs::read_to_string(&config.snapshot)?;
    let state = StoryState::from_str(&raw)?;
    let model = ProgressModel::new(state, catalog);

    let how_far = model.how_far();
    let progress = model.total_fraction_completed();

    println!("Student: {} ({})", model.state().name, model.state().title);
    println!("{}", how_far.text);
    if progress.percent.is_nan() {
        println!("Overall progress: unknown ({} markers tracked)", progress.total);
    } else {
        println!(
            "Overall progress: {}% ({}/{} markers)",
            progress.percent, progress.current, progress.total
        );
    }
    println!(
        "Story score: {} / {}",
        model.story_score(),
        model.possible_score()
    );
    if model.score().is_nan() {
        println!("Normalized score: n/a");
    } else {
        println!("Normalized score: {:.2}", model.score());
    }

    Ok(())
}
