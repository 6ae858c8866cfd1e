use std::path::{Path, PathBuf};

use dino_extract::Extractor;
use dino_fetch::{Fetcher, Transport};
use dino_icons::error::ErrorKind as IconErrorKind;
use dino_records::error::ErrorKind as RecordErrorKind;
use dino_records::{IconIndex, attach_icon};
use dino_storage::{OutputDir, sanitize_file_name};
use exn::{OptionExt, ResultExt};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{load_records, output_name, save_records};
use crate::error::{ErrorKind, Result};

/// Points every record of `input` at its icon in `icon_dir` (or at none) and
/// saves the result as `file_name`, by default under the input's own name.
#[instrument(skip_all, fields(input = %input.display(), icon_dir = %icon_dir.display()))]
pub fn attach_icons(input: &Path, icon_dir: &Path, output: &OutputDir, file_name: Option<&Path>) -> Result<PathBuf> {
    let default_name = input.file_name().ok_or_raise(|| ErrorKind::Input(input.to_path_buf()))?;
    let file_name = output_name(file_name, default_name);
    let index = IconIndex::scan(icon_dir).map_err(|error| {
        let kind = match &*error {
            RecordErrorKind::MissingDirectory(_) => ErrorKind::MissingInput(icon_dir.to_path_buf()),
            _ => ErrorKind::Input(icon_dir.to_path_buf()),
        };
        error.raise(kind)
    })?;
    let mut file = load_records(input)?;
    let attached =
        file.records.iter_mut().map(|record| attach_icon(record, &index)).filter(|found| *found).count();
    info!(icons = index.len(), records = file.records.len(), attached, "attached icons");
    save_records(output, &file_name, &file)
}

/// Outcome of [`download_icons`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Icons found on the creatures page.
    pub found: usize,
    pub saved: Vec<PathBuf>,
    /// Icons that couldn't be fetched or saved.
    pub failed: Vec<Url>,
}

/// Downloads every creature icon listed on `creatures_page` into `icon_dir`
/// as `<canonical name>.png`, replacing existing files.
///
/// # Errors
///
/// [`ErrorKind::Fetch`] if the creatures page itself can't be fetched. A
/// single icon that fails is logged and skipped.
#[instrument(skip_all, fields(page = %creatures_page, icon_dir = %icon_dir.root().display()))]
pub fn download_icons<T: Transport>(
    fetcher: &Fetcher<T>,
    creatures_page: &Url,
    icon_dir: &OutputDir,
) -> Result<DownloadSummary> {
    let page = fetcher.fetch(creatures_page).or_raise(|| ErrorKind::Fetch(creatures_page.to_string()))?;
    let icons = Extractor::from_html(&page.text()).icons(&page.url);
    let mut summary = DownloadSummary { found: icons.len(), ..DownloadSummary::default() };
    info!(icons = summary.found, "found icons");

    for icon in icons {
        let Some(file_name) = sanitize_file_name(&icon.name.icon_file_name()) else {
            warn!(name = %icon.name, "cannot derive an icon file name, skipping");
            summary.failed.push(icon.url);
            continue;
        };
        let image = match fetcher.fetch(&icon.url) {
            Ok(image) => image,
            Err(error) => {
                warn!(name = %icon.name, url = %icon.url, error = ?error, "skipping icon");
                summary.failed.push(icon.url);
                continue;
            },
        };
        match icon_dir.write(&file_name, &image.body) {
            Ok(path) => {
                debug!(name = %icon.name, path = %path.display(), "saved icon");
                summary.saved.push(path);
            },
            Err(error) => {
                warn!(name = %icon.name, error = ?error, "could not save icon");
                summary.failed.push(icon.url);
            },
        }
    }
    info!(saved = summary.saved.len(), failed = summary.failed.len(), "icon download finished");
    Ok(summary)
}

/// Recolors the icons of `input` into `output`. Returns the files written.
pub fn whiten_icons(input: &Path, output: &Path, threshold: u16) -> Result<Vec<PathBuf>> {
    let summary = dino_icons::whiten_dir(input, output, threshold).map_err(|error| {
        let kind = match &*error {
            IconErrorKind::MissingDirectory(_) => ErrorKind::MissingInput(input.to_path_buf()),
            _ => ErrorKind::Output(output.to_path_buf()),
        };
        error.raise(kind)
    })?;
    if !summary.failed.is_empty() {
        warn!(failed = summary.failed.len(), "some icons could not be recolored");
    }
    Ok(summary.converted)
}
