use std::process::ExitCode;

use clap::Parser;
use dino_config::Config;
use dino_storage::OutputDir;
use dinoscrape::cli::{Cli, Command};
use dinoscrape::error::{ErrorKind, Result};
use dinoscrape::{logging, pipeline};
use exn::ResultExt;
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.global.verbose, cli.global.quiet);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.global.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let output_root = cli.global.output_dir.unwrap_or_else(|| config.paths.output_dir.clone());
    let output = || OutputDir::new(&output_root).or_raise(|| ErrorKind::Output(output_root.clone()));

    match cli.command {
        Command::ScrapeMaps { sites } => {
            let profiles = if sites.is_empty() { config.sources.profiles.clone() } else { sites };
            let fetcher = pipeline::http_fetcher(&config.http)?;
            let summary = pipeline::scrape_maps(&fetcher, &profiles, &output()?)?;
            info!(written = summary.written.len(), skipped = summary.skipped.len(), "scrape-maps done");
        },
        Command::Convert { input, output: file_name } => {
            let layout = config.sheet.layout().or_raise(|| ErrorKind::Config)?;
            let path = pipeline::convert(&input, layout, &output()?, file_name.as_deref())?;
            info!(path = %path.display(), "convert done");
        },
        Command::UpdateMaps { input, output: file_name, maps_dir } => {
            let maps_dir = maps_dir.unwrap_or_else(|| config.paths.maps_dir.clone());
            let file_name = pipeline::output_name(file_name.as_deref(), pipeline::MAPS_OUTPUT);
            let path = pipeline::update_maps(&input, &maps_dir, &config.maps, &output()?, &file_name)?;
            info!(path = %path.display(), "update-maps done");
        },
        Command::FillStats { input, output: file_name } => {
            let fetcher = pipeline::http_fetcher(&config.http)?;
            let file_name = pipeline::output_name(file_name.as_deref(), pipeline::STATS_OUTPUT);
            let path = pipeline::fill_stats(&input, &fetcher, &config.sources, &output()?, &file_name)?;
            info!(path = %path.display(), "fill-stats done");
        },
        Command::AttachIcons { input, output: file_name, icon_dir } => {
            let icon_dir = icon_dir.unwrap_or_else(|| config.paths.icon_dir.clone());
            let path = pipeline::attach_icons(&input, &icon_dir, &output()?, file_name.as_deref())?;
            info!(path = %path.display(), "attach-icons done");
        },
        Command::DownloadIcons { icon_dir } => {
            let icon_dir = icon_dir.unwrap_or_else(|| config.paths.icon_dir.clone());
            let icon_dir = OutputDir::new(&icon_dir).or_raise(|| ErrorKind::Output(icon_dir.clone()))?;
            let fetcher = pipeline::http_fetcher(&config.http)?;
            let summary = pipeline::download_icons(&fetcher, &config.sources.creatures_page, &icon_dir)?;
            info!(saved = summary.saved.len(), failed = summary.failed.len(), "download-icons done");
        },
        Command::WhitenIcons { input, output: target, threshold } => {
            let input = input.unwrap_or_else(|| config.paths.icon_dir.clone());
            let target = target.unwrap_or_else(|| config.paths.white_icon_dir.clone());
            let threshold = threshold.unwrap_or(config.icons.white_threshold);
            let converted = pipeline::whiten_icons(&input, &target, threshold)?;
            info!(converted = converted.len(), output = %target.display(), "whiten-icons done");
        },
    }
    Ok(())
}
