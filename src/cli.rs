//! Command line interface.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use dino_extract::SiteProfile;

#[derive(Debug, Parser)]
#[command(name = "dinoscrape", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file, instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Directory every output is written to, instead of `paths.output_dir`
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    /// More logging (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape the creature list of every map page into one text file per map
    ScrapeMaps {
        /// Only scrape these sites (repeatable)
        #[arg(long = "site", value_name = "SITE", value_parser = parse_site)]
        sites: Vec<SiteProfile>,
    },
    /// Convert a stat spreadsheet into a JSON record collection
    Convert {
        input: PathBuf,
        /// Output file name, instead of the input's stem with `.json`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Tag records with the maps they spawn on
    UpdateMaps {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Directory holding the map list files, instead of `paths.maps_dir`
        #[arg(long, value_name = "DIR")]
        maps_dir: Option<PathBuf>,
    },
    /// Look up missing health and damage on the wiki
    FillStats {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Point every record at its icon file
    AttachIcons {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Icon directory, instead of `paths.icon_dir`
        #[arg(long, value_name = "DIR")]
        icon_dir: Option<PathBuf>,
    },
    /// Download every creature icon from the wiki
    DownloadIcons {
        #[arg(long, value_name = "DIR")]
        icon_dir: Option<PathBuf>,
    },
    /// Recolor icons into white silhouettes
    WhitenIcons {
        #[arg(long, value_name = "DIR")]
        input: Option<PathBuf>,
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Inverted `r+g+b` a pixel needs to stay visible
        #[arg(long)]
        threshold: Option<u16>,
    },
}

fn parse_site(value: &str) -> Result<SiteProfile, String> {
    value.parse().map_err(|_| {
        let known: Vec<&str> = SiteProfile::ALL.iter().map(SiteProfile::as_str).collect();
        format!("unknown site {value:?}, expected one of: {}", known.join(", "))
    })
}
