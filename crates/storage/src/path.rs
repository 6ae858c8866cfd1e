//! Output path validation.
//!
//! Output file names are partly derived from scraped data (map URLs, creature
//! names), so they are checked before anything touches the filesystem.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Characters that can't appear in a file name on at least one platform.
const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];

/// Validates a path relative to an output directory and returns it
/// normalized. The path may not leave the directory, be empty, be absolute on
/// Windows (prefix) or contain null bytes.
///
/// ```
/// use std::path::Path;
/// use dino_storage::validate_path;
/// assert_eq!(validate_path("maps/./the-island_ASA.txt").unwrap(), Path::new("maps/the-island_ASA.txt"));
/// assert_eq!(validate_path("icons/../Rex.png").unwrap(), Path::new("Rex.png"));
/// assert!(validate_path("../Dinos.json").is_err());
/// assert!(validate_path("").is_err());
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let invalid = || ErrorKind::InvalidPath(path.to_path_buf());
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) if part.as_encoded_bytes().contains(&0) => exn::bail!(invalid()),
            Component::Normal(part) => parts.push(part),
            Component::CurDir | Component::RootDir => {},
            Component::ParentDir => {
                if parts.pop().is_none() {
                    exn::bail!(invalid());
                }
            },
            Component::Prefix(_) => exn::bail!(invalid()),
        }
    }
    if parts.is_empty() {
        exn::bail!(invalid());
    }
    Ok(parts.into_iter().collect())
}

/// Turns arbitrary text (a creature name, a URL segment) into a single file
/// name: reserved characters become `_`, surrounding whitespace and dots are
/// trimmed. Returns `None` if nothing usable is left.
///
/// ```
/// use dino_storage::sanitize_file_name;
/// assert_eq!(sanitize_file_name("Rex.png").as_deref(), Some("Rex.png"));
/// assert_eq!(sanitize_file_name("R-Reaper/King").as_deref(), Some("R-Reaper_King"));
/// assert_eq!(sanitize_file_name(" .. "), None);
/// ```
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let cleaned: String =
        name.chars().map(|c| if RESERVED.contains(&c) || c.is_control() { '_' } else { c }).collect();
    let trimmed = cleaned.trim().trim_matches('.').trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
