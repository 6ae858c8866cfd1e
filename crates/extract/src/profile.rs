//! Supported source sites.
//!
//! Every site specific rule lives on [`SiteProfile`]; callers pick a profile
//! once (from configuration, or by matching a URL) and never compare domains
//! themselves.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::consts::MAPS_PATH;
use crate::error::{Error, ErrorKind};

static WIKILY_OVERVIEW: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://wikily.gg/ark-survival-ascended/maps/").unwrap());
static ARK_UNITY_OVERVIEW: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://ark-unity.com/ark-survival-ascended/maps/").unwrap());

/// Text of list items that are UI placeholders rather than creature names.
const LIST_PLACEHOLDERS: &[&str] = &["none", "see dino spawns"];

/// How a map page lists its creatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Every clickable item is a creature, except for the `ignored` placeholders
    /// (compared case-insensitively).
    ListScan { ignored: &'static [&'static str] },
    /// A single dropdown holds one option per creature, after a placeholder option.
    DropdownScan,
}

/// A supported source site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteProfile {
    /// wikily.gg (Ark: Survival Ascended)
    Wikily,
    /// ark-unity.com
    ArkUnity,
}
impl SiteProfile {
    pub const ALL: [SiteProfile; 2] = [SiteProfile::Wikily, SiteProfile::ArkUnity];

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteProfile::Wikily => "wikily",
            SiteProfile::ArkUnity => "ark-unity",
        }
    }

    pub fn domain(&self) -> &'static str {
        match self {
            SiteProfile::Wikily => "wikily.gg",
            SiteProfile::ArkUnity => "ark-unity.com",
        }
    }

    /// Page listing every map of the site.
    pub fn overview_url(&self) -> &'static Url {
        match self {
            SiteProfile::Wikily => &WIKILY_OVERVIEW,
            SiteProfile::ArkUnity => &ARK_UNITY_OVERVIEW,
        }
    }

    /// Appended to output keys so both sites can describe the same map.
    pub fn suffix(&self) -> &'static str {
        match self {
            SiteProfile::Wikily => "_ASA",
            SiteProfile::ArkUnity => "_ASE",
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            SiteProfile::Wikily => Strategy::ListScan { ignored: LIST_PLACEHOLDERS },
            SiteProfile::ArkUnity => Strategy::DropdownScan,
        }
    }

    /// Finds the profile whose domain (or one of its subdomains) hosts `url`.
    pub fn detect(url: &Url) -> Option<Self> {
        let host = url.host_str()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|profile| {
            let domain = profile.domain();
            host == domain || host.strip_suffix(domain).is_some_and(|rest| rest.ends_with('.'))
        })
    }

    /// Whether an `href` found on the overview page points at a map page.
    pub fn is_map_link(&self, href: &str) -> bool {
        match self {
            // Relative links count as well as absolute ones. The overview page
            // links to itself, which is not a map.
            SiteProfile::Wikily => {
                href.split_once(MAPS_PATH).is_some_and(|(_, rest)| !rest.trim_matches('/').is_empty())
            },
            SiteProfile::ArkUnity => href.starts_with(MAPS_PATH) && href != MAPS_PATH,
        }
    }

    /// Output key of a map page: its trailing path segment plus the profile suffix.
    ///
    /// ```
    /// use dino_extract::SiteProfile;
    /// use url::Url;
    /// let url = Url::parse("https://wikily.gg/ark-survival-ascended/maps/the-island/").unwrap();
    /// assert_eq!(SiteProfile::Wikily.output_key(&url).as_deref(), Some("the-island_ASA"));
    /// ```
    pub fn output_key(&self, url: &Url) -> Option<String> {
        let segment = url.path_segments()?.rfind(|segment| !segment.is_empty())?;
        Some(format!("{}{}", segment, self.suffix()))
    }
}
impl Display for SiteProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
impl FromStr for SiteProfile {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().replace(['_', '.', ' '], "-").as_str() {
            "wikily" | "wikily-gg" => Self::Wikily,
            "ark-unity" | "arkunity" | "ark-unity-com" => Self::ArkUnity,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "site",
                value: s.to_string(),
            }),
        })
    }
}
