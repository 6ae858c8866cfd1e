mod creature;
mod de;
mod map;
mod stats;

pub use self::creature::CreatureRecord;
pub use self::map::MapEntry;
pub use self::stats::{Stat, StatBlock, StatValues, TokenQueue};
