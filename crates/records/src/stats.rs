use dino_extract::BaseStats;
use dino_extract::models::CreatureRecord;
use dino_extract::normalize::MISSING_NUMBER;

/// What [`fill_stats_if_missing`] did to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// Both stats were already known; nothing to do.
    AlreadyComplete,
    /// The lookup didn't find both stats, so the record was left alone.
    Incomplete,
    /// Fetched stats were applied to the fields that were missing.
    Filled { health: bool, damage: bool },
}

/// Whether the record is missing health or damage.
pub fn needs_stats(record: &CreatureRecord) -> bool {
    record.health == MISSING_NUMBER || record.damage == MISSING_NUMBER
}

/// Fills a record's missing health and damage from a wiki lookup.
///
/// The fetched pair is all-or-nothing: unless the lookup found both values,
/// nothing is written. When it did, only fields that are still missing are
/// overwritten, so a known value is never replaced.
///
/// ```
/// use dino_extract::BaseStats;
/// use dino_extract::models::CreatureRecord;
/// use dino_records::{FillOutcome, fill_stats_if_missing};
///
/// let mut rex = CreatureRecord { health: 7, ..CreatureRecord::new("Rex") };
/// let fetched = BaseStats { health: Some(1100), damage: Some(62) };
/// assert_eq!(fill_stats_if_missing(&mut rex, fetched), FillOutcome::Filled { health: false, damage: true });
/// assert_eq!((rex.health, rex.damage), (7, 62));
/// ```
pub fn fill_stats_if_missing(record: &mut CreatureRecord, fetched: BaseStats) -> FillOutcome {
    if !needs_stats(record) {
        return FillOutcome::AlreadyComplete;
    }
    let (Some(health), Some(damage)) = (fetched.health, fetched.damage) else {
        return FillOutcome::Incomplete;
    };
    let fill_health = record.health == MISSING_NUMBER;
    if fill_health {
        record.health = health;
    }
    let fill_damage = record.damage == MISSING_NUMBER;
    if fill_damage {
        record.damage = damage;
    }
    FillOutcome::Filled { health: fill_health, damage: fill_damage }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(health: i64, damage: i64) -> CreatureRecord {
        CreatureRecord { health, damage, ..CreatureRecord::new("Rex") }
    }

    #[rstest]
    #[case(0, 0, true)]
    #[case(7, 0, true)]
    #[case(0, 7, true)]
    #[case(7, 7, false)]
    fn test_needs_stats(#[case] health: i64, #[case] damage: i64, #[case] expected: bool) {
        assert_eq!(needs_stats(&record(health, damage)), expected);
    }

    #[rstest]
    #[case((0, 0), (Some(1), Some(1)), (1, 1), FillOutcome::Filled { health: true, damage: true })]
    #[case((7, 0), (Some(1), Some(1)), (7, 1), FillOutcome::Filled { health: false, damage: true })]
    #[case((0, 9), (Some(5), Some(1)), (5, 9), FillOutcome::Filled { health: true, damage: false })]
    #[case((0, 0), (Some(1), None), (0, 0), FillOutcome::Incomplete)]
    #[case((0, 0), (None, None), (0, 0), FillOutcome::Incomplete)]
    #[case((3, 4), (Some(1), Some(1)), (3, 4), FillOutcome::AlreadyComplete)]
    fn test_fill_stats_if_missing(
        #[case] before: (i64, i64),
        #[case] fetched: (Option<i64>, Option<i64>),
        #[case] after: (i64, i64),
        #[case] outcome: FillOutcome,
    ) {
        let mut record = record(before.0, before.1);
        let fetched = BaseStats { health: fetched.0, damage: fetched.1 };
        assert_eq!(fill_stats_if_missing(&mut record, fetched), outcome);
        assert_eq!((record.health, record.damage), after);
    }
}
