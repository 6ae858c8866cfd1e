mod consts;
pub mod error;
mod extract;
pub mod models;
pub mod normalize;
mod profile;
pub mod sheet;

pub use crate::extract::{BaseStats, Extractor, IconSource, extract_creatures};
pub use crate::normalize::CanonicalName;
pub use crate::profile::{SiteProfile, Strategy};
