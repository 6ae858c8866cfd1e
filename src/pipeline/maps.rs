use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dino_extract::{Extractor, SiteProfile, extract_creatures};
use dino_fetch::{Fetcher, Transport};
use dino_records::{MapFile, load_map_files, merge_maps_into_records};
use dino_storage::{OutputDir, sanitize_file_name};
use tracing::{info, instrument, warn};
use url::Url;

use super::{load_records, save_records};
use crate::error::Result;

/// Outcome of [`scrape_maps`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    /// Map pages found on the overview pages.
    pub pages: usize,
    /// List files written, one per map page that could be scraped.
    pub written: Vec<PathBuf>,
    /// Map pages (or overview pages) that were skipped.
    pub skipped: Vec<Url>,
}

/// Scrapes the creature list of every map of every profile into
/// `<map>_<suffix>.txt` files, one name per line.
///
/// Map pages are collected from each profile's overview page first, then
/// visited in URL order. A page that can't be fetched or doesn't have the
/// expected structure is logged and skipped.
#[instrument(skip_all, fields(profiles = ?profiles))]
pub fn scrape_maps<T: Transport>(
    fetcher: &Fetcher<T>,
    profiles: &[SiteProfile],
    output: &OutputDir,
) -> Result<ScrapeSummary> {
    let mut summary = ScrapeSummary::default();
    let mut pages: BTreeMap<Url, SiteProfile> = BTreeMap::new();
    for &profile in profiles {
        let overview = profile.overview_url();
        let page = match fetcher.fetch(overview) {
            Ok(page) => page,
            Err(error) => {
                warn!(site = %profile, url = %overview, error = ?error, "skipping unreachable overview page");
                summary.skipped.push(overview.clone());
                continue;
            },
        };
        let links = Extractor::from_html(&page.text()).map_links(&page.url, profile);
        info!(site = %profile, maps = links.len(), "found map pages");
        for link in links {
            pages.entry(link).or_insert(profile);
        }
    }
    summary.pages = pages.len();

    for (url, profile) in pages {
        let Some(key) = profile.output_key(&url).as_deref().and_then(sanitize_file_name) else {
            warn!(url = %url, "cannot derive an output name, skipping");
            summary.skipped.push(url);
            continue;
        };
        let page = match fetcher.fetch(&url) {
            Ok(page) => page,
            Err(error) => {
                warn!(url = %url, error = ?error, "skipping unreachable map page");
                summary.skipped.push(url);
                continue;
            },
        };
        let creatures = match extract_creatures(&page.text(), &page.url) {
            Ok(creatures) => creatures,
            Err(error) => {
                warn!(url = %url, final_url = %page.url, error = ?error, "skipping map page");
                summary.skipped.push(url);
                continue;
            },
        };
        match output.write_lines(format!("{key}.txt"), &creatures) {
            Ok(path) => {
                info!(map = %key, creatures = creatures.len(), "saved creature list");
                summary.written.push(path);
            },
            Err(error) => {
                warn!(map = %key, error = ?error, "could not save creature list");
                summary.skipped.push(url);
            },
        }
    }
    info!(pages = summary.pages, written = summary.written.len(), skipped = summary.skipped.len(), "scrape finished");
    Ok(summary)
}

/// Tags every record of `input` with the maps it spawns on, according to the
/// map list files in `maps_dir`, and saves the result as `file_name`.
#[instrument(skip_all, fields(input = %input.display(), maps_dir = %maps_dir.display()))]
pub fn update_maps(
    input: &Path,
    maps_dir: &Path,
    table: &[MapFile],
    output: &OutputDir,
    file_name: &Path,
) -> Result<PathBuf> {
    let mut file = load_records(input)?;
    let maps = load_map_files(maps_dir, table);
    info!(maps = maps.len(), configured = table.len(), "loaded map lists");
    merge_maps_into_records(&mut file.records, &maps);
    save_records(output, file_name, &file)
}
