mod dir;
pub mod error;
mod json;
mod path;

pub use crate::dir::OutputDir;
pub use crate::json::{read_json, to_pretty_json};
pub use crate::path::{sanitize_file_name, validate as validate_path};
