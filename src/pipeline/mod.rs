//! The batch jobs behind each subcommand.
//!
//! Every job runs once, end to end: it reads its inputs fresh, logs and skips
//! whatever fails for a single page, row, record or file, and writes one
//! output. Jobs that talk to the network are generic over the
//! [`Transport`](dino_fetch::Transport) so tests can script every response.

mod icons;
mod maps;
mod sheet;
mod stats;

use std::path::{Path, PathBuf};

use dino_config::HttpConfig;
use dino_extract::models::CreatureRecord;
use dino_fetch::{Fetcher, HttpTransport};
use dino_storage::OutputDir;
use dino_storage::error::ErrorKind as StorageErrorKind;
use exn::ResultExt;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;
use tracing::{info, warn};

pub use self::icons::{DownloadSummary, attach_icons, download_icons, whiten_icons};
pub use self::maps::{ScrapeSummary, scrape_maps, update_maps};
pub use self::sheet::convert;
pub use self::stats::{FillSummary, fill_stats};
use crate::error::{ErrorKind, Result};

/// Default output of `update-maps`.
pub const MAPS_OUTPUT: &str = "Dinos_out.json";
/// Default output of `fill-stats`.
pub const STATS_OUTPUT: &str = "Dinos_filled.json";

/// Builds the production fetcher from the `http` configuration section.
pub fn http_fetcher(config: &HttpConfig) -> Result<Fetcher<HttpTransport>> {
    let transport = HttpTransport::new(&config.user_agent, config.timeout()).or_raise(|| ErrorKind::Http)?;
    Ok(Fetcher::new(transport)
        .with_policy(config.retry_policy())
        .with_rate_limit_markers(&config.rate_limit_markers)
        .with_min_interval(config.request_delay()))
}

/// A record collection as read from disk.
///
/// Elements that can't be used as records (malformed, or without a name) are
/// kept aside with their position and written back untouched, so a job never
/// shrinks its input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFile {
    pub records: Vec<CreatureRecord>,
    untouched: Vec<(usize, Value)>,
}
impl RecordFile {
    /// Number of elements written back, records and untouched ones alike.
    pub fn len(&self) -> usize {
        self.records.len() + self.untouched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements that are passed through as they were read.
    pub fn untouched(&self) -> impl Iterator<Item = &Value> {
        self.untouched.iter().map(|(_, value)| value)
    }

    fn from_values(values: Vec<Value>) -> Self {
        let mut file = Self::default();
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<CreatureRecord>(value.clone()) {
                Ok(record) if record.is_valid() => file.records.push(record),
                Ok(_) => {
                    warn!(index, "record without a name, passing it through unchanged");
                    file.untouched.push((index, value));
                },
                Err(error) => {
                    warn!(index, %error, "malformed record, passing it through unchanged");
                    file.untouched.push((index, value));
                },
            }
        }
        file
    }
}
impl From<Vec<CreatureRecord>> for RecordFile {
    fn from(records: Vec<CreatureRecord>) -> Self {
        Self { records, untouched: Vec::new() }
    }
}
impl Serialize for RecordFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        let mut records = self.records.iter();
        let mut untouched = self.untouched.iter().peekable();
        for position in 0.. {
            if let Some((_, value)) = untouched.next_if(|(index, _)| *index <= position) {
                seq.serialize_element(value)?;
            } else if let Some(record) = records.next() {
                seq.serialize_element(record)?;
            } else if let Some((_, value)) = untouched.next() {
                seq.serialize_element(value)?;
            } else {
                break;
            }
        }
        seq.end()
    }
}

/// Reads a record collection, see [`RecordFile`].
pub fn load_records(path: &Path) -> Result<RecordFile> {
    let values: Vec<Value> = dino_storage::read_json(path).map_err(|error| {
        let kind = match &*error {
            StorageErrorKind::NotFound(_) => ErrorKind::MissingInput(path.to_path_buf()),
            _ => ErrorKind::Input(path.to_path_buf()),
        };
        error.raise(kind)
    })?;
    let file = RecordFile::from_values(values);
    info!(path = %path.display(), records = file.records.len(), untouched = file.untouched.len(), "loaded records");
    Ok(file)
}

/// Writes a record collection as pretty JSON into the output directory.
pub fn save_records(output: &OutputDir, file_name: &Path, file: &RecordFile) -> Result<PathBuf> {
    let path = output.write_json(file_name, file).or_raise(|| ErrorKind::Output(output.root().join(file_name)))?;
    info!(path = %path.display(), records = file.len(), "saved records");
    Ok(path)
}

/// Output file name of a record job: the explicit one, or `default`.
pub fn output_name(explicit: Option<&Path>, default: impl Into<PathBuf>) -> PathBuf {
    explicit.map(Path::to_path_buf).unwrap_or_else(|| default.into())
}

/// Builds a fetcher for a scripted transport, never sleeping.
#[cfg(test)]
pub(crate) fn test_fetcher<T: dino_fetch::Transport>(transport: T) -> Fetcher<T> {
    Fetcher::new(transport).with_policy(dino_fetch::RetryPolicy::bounded(2, std::time::Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn unusable_entries_are_written_back_in_place() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Dinos.json");
        fs::write(&path, r#"[{ "name": "Rex" }, { "name": "  " }, { "variants": [] }, 42, { "Name": "Dodo" }]"#)
            .unwrap();
        let mut file = load_records(&path).unwrap();
        let names: Vec<_> = file.records.iter().map(|record| record.name.as_str()).collect();
        assert_eq!(names, vec!["Rex", "Dodo"]);
        assert_eq!(file.untouched().count(), 3);

        file.records[1].health = 40;
        let output = OutputDir::new(temp.path().join("out")).unwrap();
        let saved = save_records(&output, Path::new("Dinos.json"), &file).unwrap();
        let raw: Vec<Value> = serde_json::from_str(&fs::read_to_string(saved).unwrap()).unwrap();
        assert_eq!(raw.len(), 5);
        assert_eq!(raw[0]["name"], "Rex");
        assert_eq!(raw[1], serde_json::json!({ "name": "  " }));
        assert_eq!(raw[2], serde_json::json!({ "variants": [] }));
        assert_eq!(raw[3], serde_json::json!(42));
        assert_eq!(raw[4]["name"], "Dodo");
        assert_eq!(raw[4]["health"], 40);
    }

    #[test]
    fn loose_field_types_still_load_as_records() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Dinos.json");
        fs::write(&path, r#"[{ "name": "Dodo", "health": null, "damage": 12.0 }, { "name": "Raptor", "icon": false }]"#)
            .unwrap();
        let file = load_records(&path).unwrap();
        assert_eq!(file.untouched().count(), 0);
        assert_eq!((file.records[0].health, file.records[0].damage), (0, 12));
        assert_eq!(file.records[1].icon, None);
    }

    #[test]
    fn load_records_reports_missing_and_broken_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Dinos.json");
        assert_eq!(*load_records(&path).unwrap_err(), ErrorKind::MissingInput(path.clone()));
        fs::write(&path, r#"{ "name": "Rex" }"#).unwrap();
        assert_eq!(*load_records(&path).unwrap_err(), ErrorKind::Input(path.clone()));
    }

    #[test]
    fn save_records_round_trips() {
        let temp = TempDir::new().unwrap();
        let output = OutputDir::new(temp.path()).unwrap();
        let file = RecordFile::from(vec![CreatureRecord::new("Rex")]);
        let path = save_records(&output, Path::new("out.json"), &file).unwrap();
        assert_eq!(load_records(&path).unwrap(), file);
    }

    #[test]
    fn output_name_prefers_explicit() {
        assert_eq!(output_name(Some(Path::new("x.json")), MAPS_OUTPUT), PathBuf::from("x.json"));
        assert_eq!(output_name(None, STATS_OUTPUT), PathBuf::from(STATS_OUTPUT));
    }
}
