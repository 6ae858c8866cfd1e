//! Spreadsheet export to creature records.
//!
//! The export has one row per creature: name, variants, boss flag, maps, then
//! [`STAT_TOKEN_COUNT`] stat tokens in [`Stat::ALL`](crate::models::Stat::ALL)
//! order. Spreadsheet programs write it with a locale dependent delimiter and,
//! on older systems, in Windows-1252 rather than UTF-8.

use std::borrow::Cow;
use std::io::Read;

use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use exn::ResultExt;
use tracing::{debug, instrument, warn};

use crate::error::{ErrorKind, Result};
use crate::models::{CreatureRecord, StatBlock};
use crate::normalize::{CanonicalName, parse_flag, split_list};

/// Stat tokens following the four descriptive columns.
pub const STAT_TOKEN_COUNT: usize = 22;
const STATS_COLUMN: usize = 4;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub delimiter: u8,
    /// Rows to skip after blank rows have been removed.
    pub header_rows: usize,
}
impl Default for SheetLayout {
    fn default() -> Self {
        Self { delimiter: b';', header_rows: 2 }
    }
}

/// Decodes a spreadsheet export, falling back to Windows-1252 when the bytes
/// aren't valid UTF-8.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            debug!("spreadsheet is not UTF-8, decoding as Windows-1252");
            WINDOWS_1252.decode_without_bom_handling(bytes).0
        },
    }
}

/// Reads and converts a whole spreadsheet export.
///
/// # Errors
///
/// Only failing to read from `reader` is an error; bad rows are skipped.
pub fn read_records<R: Read>(mut reader: R, layout: SheetLayout) -> Result<Vec<CreatureRecord>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).or_raise(|| ErrorKind::Spreadsheet)?;
    Ok(parse_records(&decode(&bytes), layout))
}

/// Converts decoded spreadsheet text into records, in row order.
#[instrument(skip(text), fields(text_size = text.len()))]
pub fn parse_records(text: &str, layout: SheetLayout) -> Vec<CreatureRecord> {
    let mut reader = ReaderBuilder::new()
        .delimiter(layout.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    reader
        .records()
        .filter_map(|row| match row {
            Ok(row) => Some(row),
            Err(error) => {
                warn!(%error, "skipping malformed row");
                None
            },
        })
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .skip(layout.header_rows)
        .filter_map(|row| {
            let cell = |index: usize| row.get(index).unwrap_or_default();
            let name = CanonicalName::new(cell(0));
            if name.is_empty() {
                let line = row.position().map(|position| position.line());
                warn!(?line, "skipping row without a name");
                return None;
            }
            Some(CreatureRecord {
                variants: split_list(cell(1)),
                boss: parse_flag(cell(2)),
                maps: split_list(cell(3)),
                stats: StatBlock::from_tokens(row.iter().skip(STATS_COLUMN)),
                ..CreatureRecord::new(name)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatValues;

    const HEADER: &str = "Name;Variants;Boss;Maps;Health;;;Stamina\n;;;;Base;Wild;Tame;Base\n";

    fn stat_tokens() -> String {
        (1..=STAT_TOKEN_COUNT).map(|n| n.to_string()).collect::<Vec<_>>().join(";")
    }

    #[test]
    fn converts_full_rows() {
        let text = format!("{HEADER}Rex;Aberrant, Tek;;The Island, Aberration;{}\n", stat_tokens());
        let records = parse_records(&text, SheetLayout::default());
        assert_eq!(records.len(), 1);
        let rex = &records[0];
        assert_eq!(rex.name, "Rex");
        assert_eq!(rex.variants, vec!["Aberrant", "Tek"]);
        assert!(!rex.boss);
        assert_eq!(rex.maps, vec!["The Island", "Aberration"]);
        assert_eq!(rex.stats.health, StatValues { base: 1, wild: 2, tame: 3 });
        assert_eq!(rex.stats.speed, StatValues { base: 19, wild: 0, tame: 20 });
        assert_eq!(rex.stats.torpor, StatValues { base: 21, wild: 22, tame: 0 });
        assert_eq!(rex.icon, None);
        assert_eq!(rex.health, 0);
    }

    #[test]
    fn blank_rows_are_removed_before_headers_are_skipped() {
        let text = format!(";;;\n\n{HEADER};;\nDodo;;;;40;2,5\n");
        let records = parse_records(&text, SheetLayout::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Dodo");
        assert_eq!(records[0].stats.health, StatValues { base: 40, wild: 3, tame: 0 });
        assert_eq!(records[0].stats.torpor, StatValues::default());
    }

    #[test]
    fn rows_without_a_name_are_skipped() {
        let text = format!("{HEADER}  ;Tek;x;;1\nOverseer;;x\n");
        let records = parse_records(&text, SheetLayout::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Overseer");
        assert!(records[0].boss);
    }

    #[test]
    fn custom_layout() {
        let layout = SheetLayout { delimiter: b',', header_rows: 0 };
        let records = parse_records("Dire_Wolf,\"Alpha\",,\"The Island, Extinction\",300\n", layout);
        assert_eq!(records[0].name, "Dire Wolf");
        assert_eq!(records[0].maps, vec!["The Island", "Extinction"]);
        assert_eq!(records[0].stats.health.base, 300);
    }

    #[test]
    fn decodes_windows_1252() {
        let bytes = b"Name\n\nTh\xe9rizino;;;;1\n";
        assert!(decode(bytes).contains("Th\u{e9}rizino"));
        let records = read_records(&bytes[..], SheetLayout { header_rows: 1, ..SheetLayout::default() }).unwrap();
        assert_eq!(records[0].name, "Th\u{e9}rizino");
    }

    #[test]
    fn strips_utf8_bom() {
        let bytes = "\u{feff}Name\nRex;;;;5\n".as_bytes();
        assert_eq!(decode(bytes), "Name\nRex;;;;5\n");
        let records = read_records(bytes, SheetLayout { header_rows: 1, ..SheetLayout::default() }).unwrap();
        assert_eq!(records[0].stats.health.base, 5);
    }
}
