use url::Url;

use crate::SiteProfile;

/// One map and the creatures found on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    /// Map display name
    pub name: String,
    /// Page the creature list was scraped from, if any
    pub url: Option<Url>,
    /// Site the page belongs to, if known
    pub site: Option<SiteProfile>,
    /// Creature names, in source order
    pub creatures: Vec<String>,
}
impl MapEntry {
    pub fn new(name: impl Into<String>, creatures: Vec<String>) -> Self {
        Self { name: name.into(), url: None, site: None, creatures }
    }

    pub fn with_source(mut self, url: Url, site: Option<SiteProfile>) -> Self {
        self.url = Some(url);
        self.site = site;
        self
    }
}
