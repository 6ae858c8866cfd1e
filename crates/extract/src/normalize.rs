//! Field normalization.
//!
//! Pure functions that turn raw text tokens (spreadsheet cells, table cells,
//! image attributes, map list lines) into canonical numbers and names. None of
//! these fail: malformed input maps onto a named default so a single bad cell
//! never aborts a batch.

use std::borrow::Borrow;
use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::consts;

/// Value used for any numeric token that is missing, blank, or unparsable.
pub const MISSING_NUMBER: i64 = 0;

/// Converts a spreadsheet token into an integer.
///
/// - Surrounding whitespace is ignored and a decimal comma is read as a
///   decimal point.
/// - Blank tokens and a lone dash are [`MISSING_NUMBER`].
/// - Fractional values are rounded half away from zero and never fall below
///   `1`, so a stat of `0,4` still counts as present.
/// - Anything unparsable is [`MISSING_NUMBER`].
///
/// ```
/// use dino_extract::normalize::to_number;
/// assert_eq!(to_number(" 12,5 "), 13);
/// assert_eq!(to_number("0,4"), 1);
/// assert_eq!(to_number("-"), 0);
/// assert_eq!(to_number("abc"), 0);
/// ```
pub fn to_number(token: &str) -> i64 {
    let cleaned = token.trim().replace(',', ".");
    if cleaned.is_empty() || cleaned == "-" {
        return MISSING_NUMBER;
    }
    if cleaned.contains('.') {
        return match cleaned.parse::<f64>() {
            Ok(value) if value.is_finite() => (value.round() as i64).max(1),
            _ => MISSING_NUMBER,
        };
    }
    cleaned.parse::<i64>().unwrap_or(MISSING_NUMBER)
}

/// Parses a value cell of the wiki's base stat table.
///
/// The wiki uses English formatting (commas separate thousands) and sometimes
/// lists several values separated by `/`; only the first one is used. The
/// value is truncated towards zero.
pub fn parse_wiki_number(text: &str) -> Option<i64> {
    let cleaned = text.replace(',', "");
    let first = cleaned.split('/').next()?.trim();
    first.parse::<f64>().ok().filter(|value| value.is_finite()).map(|value| value.trunc() as i64)
}

/// Reduces a creature name to its canonical form.
///
/// Thumbnail size prefixes (`30px-`) and image extensions are removed,
/// underscores become spaces and runs of whitespace collapse into one space.
/// Every lookup key in the workspace goes through this function.
///
/// ```
/// use dino_extract::normalize::canonical_name;
/// assert_eq!(canonical_name("30px-Dire_Wolf.png"), "Dire Wolf");
/// assert_eq!(canonical_name("  Rex "), "Rex");
/// ```
pub fn canonical_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_prefix = consts::THUMBNAIL_PREFIX_REGEX.replace(trimmed, "");
    let without_extension = consts::IMAGE_EXTENSION_REGEX.replace(&without_prefix, "");
    without_extension.replace('_', " ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reads a yes/no spreadsheet cell. Anything that isn't an explicit "no" is a yes.
pub fn parse_flag(cell: &str) -> bool {
    !matches!(cell.trim().to_lowercase().as_str(), "" | "0" | "-" | "n" | "no" | "nein" | "false")
}

/// Splits a comma separated cell into its trimmed, non-empty parts.
pub fn split_list(cell: &str) -> Vec<String> {
    cell.split(',').map(str::trim).filter(|part| !part.is_empty()).map(str::to_string).collect()
}

/// A creature name in canonical form, see [`canonical_name`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalName(String);
impl CanonicalName {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(canonical_name(raw.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// File name of the creature's icon inside an icon directory.
    pub fn icon_file_name(&self) -> String {
        format!("{}.png", self.0)
    }

    /// Page title of the creature on the wiki, ready to append to the wiki base URL.
    pub fn wiki_title(&self) -> String {
        self.0.replace(' ', "_").replace('\'', "%27")
    }
}
impl FromStr for CanonicalName {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
impl From<&str> for CanonicalName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl From<String> for CanonicalName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
impl From<CanonicalName> for String {
    fn from(value: CanonicalName) -> Self {
        value.0
    }
}
impl AsRef<str> for CanonicalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
impl Borrow<str> for CanonicalName {
    fn borrow(&self) -> &str {
        &self.0
    }
}
impl Display for CanonicalName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("-", 0)]
    #[case("   ", 0)]
    #[case(" - ", 0)]
    #[case("abc", 0)]
    #[case("12,5", 13)]
    #[case("12.4", 12)]
    #[case("0,4", 1)]
    #[case("0,0", 1)]
    #[case("1100", 1100)]
    #[case(" 42 ", 42)]
    #[case("+7", 7)]
    #[case("-3", -3)]
    #[case("1.234.5", 0)]
    #[case("inf", 0)]
    fn test_to_number(#[case] token: &str, #[case] expected: i64) {
        assert_eq!(to_number(token), expected);
    }

    #[rstest]
    #[case("1,100", Some(1100))]
    #[case("540 / 600", Some(540))]
    #[case("32.5", Some(32))]
    #[case("", None)]
    #[case("N/A", None)]
    fn test_parse_wiki_number(#[case] text: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_wiki_number(text), expected);
    }

    #[rstest]
    #[case("Rex", "Rex")]
    #[case("  Dire   Wolf ", "Dire Wolf")]
    #[case("Dire_Wolf", "Dire Wolf")]
    #[case("Dire_Wolf.png", "Dire Wolf")]
    #[case("30px-Dire_Wolf.png", "Dire Wolf")]
    #[case("Achatina.PNG", "Achatina")]
    #[case("Tek Rex.jpeg", "Tek Rex")]
    #[case("R-Reaper King", "R-Reaper King")]
    #[case("", "")]
    fn test_canonical_name(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(canonical_name(raw), expected);
    }

    #[test]
    fn canonical_name_is_idempotent() {
        for raw in ["30px-Dire_Wolf.png", "Rock  Drake", "Ovis"] {
            let once = canonical_name(raw);
            assert_eq!(canonical_name(&once), once);
        }
    }

    #[test]
    fn canonical_name_derivations() {
        let name = CanonicalName::new("Megalania_Toxin's");
        assert_eq!(name.as_str(), "Megalania Toxin's");
        assert_eq!(name.icon_file_name(), "Megalania Toxin's.png");
        assert_eq!(name.wiki_title(), "Megalania_Toxin%27s");
    }

    #[rstest]
    #[case("", false)]
    #[case("0", false)]
    #[case("-", false)]
    #[case("Nein", false)]
    #[case("false", false)]
    #[case("x", true)]
    #[case("Ja", true)]
    #[case("1", true)]
    fn test_parse_flag(#[case] cell: &str, #[case] expected: bool) {
        assert_eq!(parse_flag(cell), expected);
    }

    #[test]
    fn split_list_drops_empty_parts() {
        assert_eq!(split_list("The Island, Aberration,, "), vec!["The Island", "Aberration"]);
        assert!(split_list("").is_empty());
    }
}
