use scraper::ElementRef;
use tracing::{debug, instrument};

use super::{Extractor, stripped_text};
use crate::consts;
use crate::normalize::parse_wiki_number;

/// Base health and melee damage from a wiki creature page.
///
/// A field is `None` when the page has no stat table, no matching row, or a
/// value that doesn't parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseStats {
    pub health: Option<i64>,
    pub damage: Option<i64>,
}
impl BaseStats {
    /// Both values were found.
    pub fn is_complete(&self) -> bool {
        self.health.is_some() && self.damage.is_some()
    }
}

impl Extractor {
    #[instrument(level = "trace", skip(self))]
    pub fn base_stats(&self) -> BaseStats {
        let mut stats = BaseStats::default();
        let Some(table) = self.document.select(&consts::BASE_STATS_TABLE_SELECTOR).next() else {
            debug!("page has no base stats table");
            return stats;
        };
        for row in table.select(&consts::ROW_SELECTOR) {
            let mut cells = row.select(&consts::CELL_SELECTOR);
            let (Some(label), Some(value)) = (cells.next(), cells.next()) else {
                continue;
            };
            let slot = match stripped_text(label).as_str() {
                "Health" => &mut stats.health,
                "Melee Damage" => &mut stats.damage,
                _ => continue,
            };
            if let Some(number) = cell_number(value) {
                *slot = Some(number);
            }
        }
        stats
    }
}

fn cell_number(cell: ElementRef<'_>) -> Option<i64> {
    parse_wiki_number(&cell.text().collect::<String>())
}
