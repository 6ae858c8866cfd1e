//! Record extraction from fetched HTML pages.
//!
//! An [`Extractor`] wraps a single parsed document. Which methods make sense
//! depends on the page: map pages yield [`creatures`](Extractor::creatures),
//! overview pages yield [`map_links`](Extractor::map_links), wiki creature
//! pages yield [`base_stats`](Extractor::base_stats) and the wiki creatures
//! list yields [`icons`](Extractor::icons).

mod icons;
mod stats;

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::str::FromStr;

use scraper::{ElementRef, Html};
use tracing::{instrument, warn};
use url::Url;

pub use self::icons::IconSource;
pub use self::stats::BaseStats;
use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::profile::{SiteProfile, Strategy};

#[derive(Debug)]
pub struct Extractor {
    document: Html,
}
impl Extractor {
    pub fn from_document(document: Html) -> Self {
        Self { document }
    }

    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        Self::from_document(document)
    }

    /// Creature names listed on a map page, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingElement`] when the page lacks the element
    /// the profile's strategy depends on. A page that has the element but
    /// lists nothing is not an error.
    #[instrument(skip(self))]
    pub fn creatures(&self, profile: SiteProfile) -> Result<Vec<String>> {
        match profile.strategy() {
            Strategy::ListScan { ignored } => Ok(self.list_scan(ignored)),
            Strategy::DropdownScan => self.dropdown_scan(),
        }
    }

    fn list_scan(&self, ignored: &[&str]) -> Vec<String> {
        self.document
            .select(&consts::CLICKABLE_ITEM_SELECTOR)
            .map(stripped_text)
            .filter(|text| !text.is_empty())
            .filter(|text| !ignored.iter().any(|placeholder| text.eq_ignore_ascii_case(placeholder)))
            .collect()
    }

    fn dropdown_scan(&self) -> Result<Vec<String>> {
        let Some(dropdown) = self.document.select(&consts::SPAWN_DROPDOWN_SELECTOR).next() else {
            exn::bail!(ErrorKind::MissingElement("spawn dropdown"));
        };
        Ok(dropdown
            .select(&consts::OPTION_SELECTOR)
            // The first option is a "select a creature" placeholder.
            .skip(1)
            // Values are taken as they are; only options without one are skipped.
            .filter_map(|option| option.value().attr("value"))
            .map(str::to_string)
            .collect())
    }

    /// Map pages linked from an overview page, resolved against `base`.
    #[instrument(skip(self, base), fields(base = %base))]
    pub fn map_links(&self, base: &Url, profile: SiteProfile) -> BTreeSet<Url> {
        let mut links = BTreeSet::new();
        for anchor in self.document.select(&consts::ANCHOR_SELECTOR) {
            if let Some(href) = anchor.value().attr("href").map(str::trim)
                && profile.is_map_link(href)
            {
                match base.join(href) {
                    Ok(url) => {
                        links.insert(url);
                    },
                    Err(error) => warn!(href, %error, "ignoring unresolvable map link"),
                }
            }
        }
        links
    }
}
impl FromStr for Extractor {
    type Err = Infallible;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_html(s))
    }
}
impl From<String> for Extractor {
    fn from(value: String) -> Self {
        Self::from_html(&value)
    }
}
impl From<Html> for Extractor {
    fn from(document: Html) -> Self {
        Self::from_document(document)
    }
}

/// Extracts the creature names of a map page, choosing the site profile from
/// the page's final URL (after redirects).
///
/// Pages from an unknown site yield an empty list and a warning rather than
/// an error, so one stray redirect doesn't abort a scrape.
///
/// ```rust
/// use dino_extract::extract_creatures;
/// use url::Url;
/// let html = r#"<div class="flex cursor-pointer">Rex</div><div class="cursor-pointer">None</div>"#;
/// let url = Url::parse("https://wikily.gg/ark-survival-ascended/maps/the-island/").unwrap();
/// assert_eq!(extract_creatures(html, &url).unwrap(), vec!["Rex"]);
/// ```
#[instrument(skip(html, url), fields(html_size = html.len(), url = %url))]
pub fn extract_creatures(html: &str, url: &Url) -> Result<Vec<String>> {
    let Some(profile) = SiteProfile::detect(url) else {
        warn!("no site profile matches this page");
        return Ok(Vec::new());
    };
    Extractor::from_html(html).creatures(profile)
}

/// Text content of an element with every text node trimmed and the empty ones
/// dropped, so markup indentation never leaks into a name.
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).filter(|text| !text.is_empty()).collect()
}
