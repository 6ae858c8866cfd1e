use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StatBlock;
use super::de;
use crate::normalize::CanonicalName;

/// A single creature in a record collection.
///
/// The name is the only identity: every merge looks records up by
/// [`key`](Self::key). Fields this crate doesn't know about are kept in
/// [`extra`](Self::extra) and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureRecord {
    #[serde(alias = "Name")]
    pub name: String,
    /// Variant names (e.g. "Aberrant", "Tek")
    #[serde(default, alias = "Variants", alias = "Varianten", deserialize_with = "de::string_or_list")]
    pub variants: Vec<String>,
    #[serde(default, alias = "Boss", deserialize_with = "de::lenient_flag")]
    pub boss: bool,
    /// Display names of the maps the creature spawns on
    #[serde(default, alias = "Maps", deserialize_with = "de::string_or_list")]
    pub maps: Vec<String>,
    #[serde(default, alias = "Stats")]
    pub stats: StatBlock,
    /// Icon file name; `null` when no icon exists.
    #[serde(default, deserialize_with = "de::lenient_icon")]
    pub icon: Option<String>,
    /// Base health, `0` when unknown
    #[serde(default, deserialize_with = "de::lenient_number")]
    pub health: i64,
    /// Base melee damage, `0` when unknown
    #[serde(default, deserialize_with = "de::lenient_number")]
    pub damage: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
impl CreatureRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
            boss: false,
            maps: Vec::new(),
            stats: StatBlock::default(),
            icon: None,
            health: 0,
            damage: 0,
            extra: Map::new(),
        }
    }

    /// Lookup key of this record.
    pub fn key(&self) -> CanonicalName {
        CanonicalName::new(&self.name)
    }

    /// A record without a name can never be matched by any merge.
    pub fn is_valid(&self) -> bool {
        !self.key().is_empty()
    }
}
