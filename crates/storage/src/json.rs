use std::fs;
use std::path::Path;

use exn::ResultExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Reads and parses a JSON file.
///
/// # Errors
///
/// [`ErrorKind::NotFound`] for a missing file, [`ErrorKind::InvalidJson`]
/// when the content doesn't match `T`.
#[instrument(level = "debug", skip(path), fields(path = %path.display()))]
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| ErrorKind::from_io(e, path))?;
    serde_json::from_slice(&bytes).or_raise(|| ErrorKind::InvalidJson(path.to_path_buf()))
}

/// Two-space indented JSON, non-ASCII kept as is, with a trailing newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut json = serde_json::to_vec_pretty(value)?;
    json.push(b'\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Creature {
        name: String,
    }

    #[test]
    fn reads_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Dinos.json");
        fs::write(&path, r#"[{ "name": "Rex" }]"#).unwrap();
        let creatures: Vec<Creature> = read_json(&path).unwrap();
        assert_eq!(creatures, vec![Creature { name: "Rex".to_string() }]);
    }

    #[test]
    fn reports_missing_and_invalid_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Dinos.json");
        let missing = read_json::<Vec<Creature>>(&path).unwrap_err();
        assert!(matches!(*missing, ErrorKind::NotFound(_)));
        fs::write(&path, "{ not json").unwrap();
        let invalid = read_json::<Vec<Creature>>(&path).unwrap_err();
        assert!(matches!(*invalid, ErrorKind::InvalidJson(_)));
    }
}
