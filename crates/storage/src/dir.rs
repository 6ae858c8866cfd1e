use std::fs;
use std::path::{Path, PathBuf};

use exn::ResultExt;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{ErrorKind, Result};
use crate::json::to_pretty_json;
use crate::path::validate as validate_path;

/// A directory that job outputs are written into.
///
/// Every path handed to it is relative and validated; nothing is written
/// outside the root.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}
impl OutputDir {
    /// Opens `root`, creating it (and its parents) when missing.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidPath`] if `root` exists but isn't a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            fs::create_dir_all(&root).map_err(|e| ErrorKind::from_io(e, &root))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a relative output path.
    pub fn path(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        Ok(self.root.join(validate_path(relative)?))
    }

    /// Writes `data`, replacing any previous file and creating parent
    /// directories as needed. Returns the written path.
    #[instrument(level = "debug", skip(self, relative, data), fields(path = %relative.as_ref().display(), size = data.len()))]
    pub fn write(&self, relative: impl AsRef<Path>, data: &[u8]) -> Result<PathBuf> {
        let path = self.path(relative)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ErrorKind::from_io(e, parent))?;
        }
        fs::write(&path, data).map_err(|e| ErrorKind::from_io(e, &path))?;
        debug!(path = %path.display(), "written");
        Ok(path)
    }

    /// Writes `value` as pretty-printed JSON with a trailing newline.
    pub fn write_json<T: Serialize + ?Sized>(&self, relative: impl AsRef<Path>, value: &T) -> Result<PathBuf> {
        let relative = relative.as_ref();
        let json = to_pretty_json(value).or_raise(|| ErrorKind::Serialize(relative.to_path_buf()))?;
        self.write(relative, &json)
    }

    /// Writes one line per item, each terminated by a newline.
    pub fn write_lines<I, S>(&self, relative: impl AsRef<Path>, lines: I) -> Result<PathBuf>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for line in lines {
            text.push_str(line.as_ref());
            text.push('\n');
        }
        self.write(relative, text.as_bytes())
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = self.path(relative)?;
        Ok(fs::read(&path).map_err(|e| ErrorKind::from_io(e, &path))?)
    }
}
