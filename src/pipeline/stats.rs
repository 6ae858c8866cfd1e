use std::path::{Path, PathBuf};

use dino_config::SourcesConfig;
use dino_extract::Extractor;
use dino_extract::models::CreatureRecord;
use dino_fetch::{Fetcher, Transport};
use dino_records::{FillOutcome, fill_stats_if_missing, needs_stats};
use dino_storage::OutputDir;
use tracing::{debug, info, instrument, warn};

use super::{load_records, save_records};
use crate::error::Result;

/// Outcome of [`fill_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillSummary {
    /// Records that needed health or damage.
    pub looked_up: usize,
    pub filled: usize,
    /// Lookups that failed or didn't find both values.
    pub missed: usize,
}

/// Looks up every record missing health or damage on the wiki and fills in
/// what's missing.
pub fn fill_records<T: Transport>(
    records: &mut [CreatureRecord],
    fetcher: &Fetcher<T>,
    sources: &SourcesConfig,
) -> FillSummary {
    let mut summary = FillSummary::default();
    for record in records.iter_mut().filter(|record| needs_stats(record)) {
        summary.looked_up += 1;
        let title = record.key().wiki_title();
        let url = match sources.wiki_page(&title) {
            Ok(url) => url,
            Err(error) => {
                warn!(creature = %record.name, %error, "cannot build wiki URL, skipping");
                summary.missed += 1;
                continue;
            },
        };
        let page = match fetcher.fetch(&url) {
            Ok(page) => page,
            Err(error) => {
                warn!(creature = %record.name, url = %url, error = ?error, "wiki lookup failed, skipping");
                summary.missed += 1;
                continue;
            },
        };
        let fetched = Extractor::from_html(&page.text()).base_stats();
        match fill_stats_if_missing(record, fetched) {
            FillOutcome::Filled { health, damage } => {
                info!(creature = %record.name, health = record.health, damage = record.damage, filled_health = health, filled_damage = damage, "filled stats");
                summary.filled += 1;
            },
            FillOutcome::Incomplete => {
                warn!(creature = %record.name, ?fetched, "wiki page lacks health or damage, left unchanged");
                summary.missed += 1;
            },
            FillOutcome::AlreadyComplete => debug!(creature = %record.name, "already complete"),
        }
    }
    summary
}

/// Loads `input`, fills missing stats from the wiki and saves the result as
/// `file_name`.
#[instrument(skip_all, fields(input = %input.display()))]
pub fn fill_stats<T: Transport>(
    input: &Path,
    fetcher: &Fetcher<T>,
    sources: &SourcesConfig,
    output: &OutputDir,
    file_name: &Path,
) -> Result<PathBuf> {
    let mut file = load_records(input)?;
    let summary = fill_records(&mut file.records, fetcher, sources);
    info!(looked_up = summary.looked_up, filled = summary.filled, missed = summary.missed, "stat lookup finished");
    save_records(output, file_name, &file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_fetcher;
    use dino_fetch::MockTransport;
    use std::fs;
    use tempfile::TempDir;

    fn stat_page(health: &str, damage: &str) -> String {
        format!(
            r#"<table class="wikitable" data-description="Base Stats and Growth">
                 <tr><td>Health</td><td>{health}</td></tr>
                 <tr><td>Melee Damage</td><td>{damage}</td></tr>
               </table>"#
        )
    }

    fn record(name: &str, health: i64, damage: i64) -> CreatureRecord {
        CreatureRecord { health, damage, ..CreatureRecord::new(name) }
    }

    #[test]
    fn fills_only_missing_values() {
        let transport = MockTransport::new()
            .reply("https://ark.wiki.gg/wiki/Rex", 200, stat_page("1,100", "62"))
            .reply("https://ark.wiki.gg/wiki/Dire_Wolf", 200, stat_page("330", "N/A"))
            .reply("https://ark.wiki.gg/wiki/Megalania_Toxin%27s", 200, stat_page("1", "1"));
        let fetcher = test_fetcher(transport);
        let mut records = vec![
            record("Rex", 7, 0),
            record("Dire Wolf", 0, 0),
            record("Dodo", 40, 5),
            record("Megalania Toxin's", 0, 0),
        ];

        let summary = fill_records(&mut records, &fetcher, &SourcesConfig::default());

        assert_eq!(summary, FillSummary { looked_up: 3, filled: 2, missed: 1 });
        assert_eq!((records[0].health, records[0].damage), (7, 62));
        assert_eq!((records[1].health, records[1].damage), (0, 0));
        assert_eq!((records[2].health, records[2].damage), (40, 5));
        assert_eq!((records[3].health, records[3].damage), (1, 1));
        // Complete records are never requested.
        assert!(fetcher.transport().requests().iter().all(|url| !url.as_str().ends_with("Dodo")));
    }

    #[test]
    fn failed_lookups_are_skipped() {
        let fetcher = test_fetcher(MockTransport::new().fail("https://ark.wiki.gg/wiki/Rex"));
        let mut records = vec![record("Rex", 0, 0), record("Raptor", 0, 0)];
        let summary = fill_records(&mut records, &fetcher, &SourcesConfig::default());
        assert_eq!(summary, FillSummary { looked_up: 2, filled: 0, missed: 2 });
        assert_eq!(fetcher.transport().requests().len(), 2);
    }

    #[test]
    fn fill_stats_job_writes_output() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("Dinos_out.json");
        fs::write(&input, r#"[{ "name": "Rex", "maps": ["The Island"] }]"#).unwrap();
        let output = OutputDir::new(temp.path()).unwrap();
        let fetcher = test_fetcher(MockTransport::new().reply("https://ark.wiki.gg/wiki/Rex", 200, stat_page("1100", "62")));

        let path =
            fill_stats(&input, &fetcher, &SourcesConfig::default(), &output, Path::new("Dinos_filled.json")).unwrap();

        let records = load_records(&path).unwrap().records;
        assert_eq!((records[0].health, records[0].damage), (1100, 62));
        assert_eq!(records[0].maps, vec!["The Island"]);
    }
}
