use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use dino_extract::CanonicalName;
use dino_extract::models::CreatureRecord;
use exn::ResultExt;
use tracing::{debug, instrument, warn};

use crate::error::{ErrorKind, Result};

/// Icon files of a directory, looked up by canonical creature name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconIndex {
    files: HashMap<CanonicalName, String>,
}
impl IconIndex {
    /// Indexes every `.png` file (any case) directly inside `dir`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::MissingDirectory`] if `dir` doesn't exist, [`ErrorKind::Io`]
    /// if it can't be listed. Unreadable entries are skipped.
    #[instrument(skip(dir), fields(dir = %dir.display()))]
    pub fn scan(dir: &Path) -> Result<Self> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == IoErrorKind::NotFound => {
                return Err(error).or_raise(|| ErrorKind::MissingDirectory(dir.to_path_buf()));
            },
            Err(error) => return Err(error).or_raise(|| ErrorKind::Io(dir.to_path_buf())),
        };
        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) if entry.file_type().is_ok_and(|kind| kind.is_file()) => {
                    match entry.file_name().into_string() {
                        Ok(name) => files.push(name),
                        Err(name) => warn!(?name, "skipping icon with a non UTF-8 file name"),
                    }
                },
                Ok(_) => {},
                Err(error) => warn!(%error, "skipping unreadable directory entry"),
            }
        }
        let index = Self::from_files(files);
        debug!(icons = index.len(), "indexed icons");
        Ok(index)
    }

    /// Indexes file names directly. Names that aren't `.png` are ignored.
    ///
    /// When several files reduce to the same creature, the one already named
    /// in canonical form wins, otherwise the first in lexical order.
    pub fn from_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut files: Vec<String> = files
            .into_iter()
            .map(Into::into)
            .filter(|name| Path::new(name).extension().is_some_and(|ext| ext.eq_ignore_ascii_case("png")))
            .collect();
        files.sort();
        let mut index = HashMap::new();
        for file in files {
            let name = CanonicalName::new(&file);
            if name.is_empty() {
                continue;
            }
            let canonical = file == name.icon_file_name();
            match index.get(&name) {
                Some(_) if !canonical => continue,
                _ => {
                    index.insert(name, file);
                },
            }
        }
        Self { files: index }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Points the record at its icon, or explicitly at none. Returns whether an
/// icon was found.
pub fn attach_icon(record: &mut CreatureRecord, index: &IconIndex) -> bool {
    record.icon = index.get(record.key().as_str()).map(str::to_string);
    record.icon.is_some()
}
