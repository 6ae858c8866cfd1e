//! Map membership: which creatures spawn on which map.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use dino_extract::CanonicalName;
use dino_extract::models::{CreatureRecord, MapEntry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Lines starting with this are comments in map list files.
const COMMENT_PREFIX: &str = "//";
/// Field written by older tooling, superseded by `maps`.
const LEGACY_MAP_FIELD: &str = "map";

/// A map display name and the list file holding its creatures.
///
/// The order of a table of these is the order maps appear in on every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapFile {
    pub name: String,
    /// Relative to the maps directory.
    pub file: PathBuf,
}
impl MapFile {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), file: file.into() }
    }

    /// A map whose list file is named after the map.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let file = PathBuf::from(format!("{name}.txt"));
        Self { name, file }
    }
}

/// Official maps, in release order.
pub fn default_map_files() -> Vec<MapFile> {
    ["The Island", "Scorched Earth", "The Center", "Aberration", "Extinction", "Astraeos"]
        .into_iter()
        .map(MapFile::named)
        .collect()
}

/// Parses a map list file: one creature per line, blank lines and `//`
/// comments ignored. Names come back canonical.
///
/// ```
/// use dino_extract::CanonicalName;
/// use dino_records::load_map_list;
/// let names = load_map_list("// The Island\nRex\n\n  Dire_Wolf \n");
/// assert_eq!(names, vec![CanonicalName::new("Rex"), CanonicalName::new("Dire Wolf")]);
/// ```
pub fn load_map_list(text: &str) -> Vec<CanonicalName> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(CanonicalName::new)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Loads every map of `table` from `dir`, in table order. Files that are
/// missing or unreadable are logged and skipped.
#[instrument(skip(dir, table), fields(dir = %dir.display(), maps = table.len()))]
pub fn load_map_files(dir: &Path, table: &[MapFile]) -> Vec<MapEntry> {
    let mut entries = Vec::with_capacity(table.len());
    for map in table {
        let path = dir.join(&map.file);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == IoErrorKind::NotFound => {
                warn!(map = %map.name, path = %path.display(), "map file missing, skipping");
                continue;
            },
            Err(error) => {
                warn!(map = %map.name, path = %path.display(), %error, "map file unreadable, skipping");
                continue;
            },
        };
        let creatures: Vec<String> =
            load_map_list(&String::from_utf8_lossy(&bytes)).into_iter().map(CanonicalName::into_string).collect();
        debug!(map = %map.name, creatures = creatures.len(), "loaded map file");
        entries.push(MapEntry::new(map.name.clone(), creatures));
    }
    entries
}

/// Inverts map → creatures into creature → maps.
///
/// Maps keep the order of `maps`, and a map is listed at most once per
/// creature however often the creature appears in its file.
pub fn creature_maps(maps: &[MapEntry]) -> HashMap<CanonicalName, Vec<String>> {
    let mut index: HashMap<CanonicalName, Vec<String>> = HashMap::new();
    for map in maps {
        for creature in &map.creatures {
            let key = CanonicalName::new(creature);
            if key.is_empty() {
                continue;
            }
            let names = index.entry(key).or_default();
            if !names.contains(&map.name) {
                names.push(map.name.clone());
            }
        }
    }
    index
}

/// Overwrites the `maps` of every record with the maps it was found on (none
/// if it wasn't found at all) and drops the legacy `map` field.
///
/// Records are never added or removed, and running the merge twice gives the
/// same result as running it once. Returns how many records are on at least
/// one map.
#[instrument(skip_all, fields(records = records.len(), maps = maps.len()))]
pub fn merge_maps_into_records(records: &mut [CreatureRecord], maps: &[MapEntry]) -> usize {
    let index = creature_maps(maps);
    let mut matched = HashSet::new();
    for record in records.iter_mut() {
        let key = record.key();
        record.maps = index.get(key.as_str()).cloned().unwrap_or_default();
        record.extra.remove(LEGACY_MAP_FIELD);
        if !record.maps.is_empty() {
            matched.insert(key);
        }
    }
    for name in index.keys().filter(|name| !matched.contains(*name)) {
        debug!(creature = %name, "listed on a map but has no record");
    }
    let tagged = records.iter().filter(|record| !record.maps.is_empty()).count();
    info!(tagged, untagged = records.len() - tagged, "merged maps into records");
    tagged
}
