pub mod error;
mod icons;
mod maps;
mod stats;

pub use crate::icons::{IconIndex, attach_icon};
pub use crate::maps::{MapFile, creature_maps, default_map_files, load_map_files, load_map_list, merge_maps_into_records};
pub use crate::stats::{FillOutcome, fill_stats_if_missing, needs_stats};
