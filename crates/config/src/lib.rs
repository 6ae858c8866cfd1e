//! Layered configuration for every dinoscrape job.
//!
//! Sources, from lowest to highest priority:
//!
//! 1. built-in defaults,
//! 2. `dinoscrape.toml` in the platform configuration directory,
//! 3. `dinoscrape.toml` in the working directory,
//! 4. an explicit file (TOML, YAML or JSON, chosen by extension),
//! 5. `DINOSCRAPE_` environment variables, `__` separating nested keys
//!    (`DINOSCRAPE_HTTP__TIMEOUT_SECS=30`).

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use dino_extract::SiteProfile;
use dino_extract::sheet::SheetLayout;
use dino_fetch::{DEFAULT_RATE_LIMIT_MARKERS, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, RetryPolicy};
use dino_records::{MapFile, default_map_files};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{ErrorKind, Result};

pub const APP_NAME: &str = "dinoscrape";
pub const FILE_NAME: &str = "dinoscrape.toml";
pub const ENV_PREFIX: &str = "DINOSCRAPE_";
/// Largest possible `r + g + b` of a pixel.
const MAX_BRIGHTNESS: u16 = 3 * 255;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub paths: PathsConfig,
    pub sources: SourcesConfig,
    /// Map display names and their list files, in the order maps are listed
    /// on records.
    pub maps: Vec<MapFile>,
    pub sheet: SheetConfig,
    pub icons: IconsConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            paths: PathsConfig::default(),
            sources: SourcesConfig::default(),
            maps: default_map_files(),
            sheet: SheetConfig::default(),
            icons: IconsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Delay before retrying a rate limited request.
    pub backoff_secs: u64,
    /// Requests per URL while rate limited; unset retries forever.
    pub max_attempts: Option<u32>,
    /// Pause between consecutive requests to the wiki.
    pub request_delay_ms: u64,
    pub rate_limit_markers: Vec<String>,
}
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            backoff_secs: 5,
            max_attempts: None,
            request_delay_ms: 1500,
            rate_limit_markers: DEFAULT_RATE_LIMIT_MARKERS.iter().map(|marker| marker.to_string()).collect(),
        }
    }
}
impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let backoff = Duration::from_secs(self.backoff_secs);
        match self.max_attempts {
            Some(max_attempts) => RetryPolicy::bounded(max_attempts, backoff),
            None => RetryPolicy::unlimited(backoff),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Where every job writes its results.
    pub output_dir: PathBuf,
    /// Where the map list files are read from.
    pub maps_dir: PathBuf,
    pub icon_dir: PathBuf,
    pub white_icon_dir: PathBuf,
}
impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            maps_dir: PathBuf::from("."),
            icon_dir: PathBuf::from("dino_icons"),
            white_icon_dir: PathBuf::from("dino_icons_white"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Sites scraped for map membership.
    pub profiles: Vec<SiteProfile>,
    /// Creature pages live at this URL plus the page title.
    pub wiki_base: Url,
    /// Wiki page listing every creature with its icon.
    pub creatures_page: Url,
}
impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            profiles: SiteProfile::ALL.to_vec(),
            wiki_base: wiki_url(""),
            creatures_page: wiki_url("Creatures"),
        }
    }
}
impl SourcesConfig {
    /// Page of a creature on the wiki.
    pub fn wiki_page(&self, title: &str) -> std::result::Result<Url, url::ParseError> {
        Url::parse(&format!("{}{}", self.wiki_base, title))
    }
}

fn wiki_url(title: &str) -> Url {
    let Ok(url) = Url::parse(&format!("https://ark.wiki.gg/wiki/{title}")) else {
        unreachable!("built-in wiki URL is valid");
    };
    url
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub header_rows: usize,
    pub delimiter: char,
}
impl Default for SheetConfig {
    fn default() -> Self {
        let layout = SheetLayout::default();
        Self { header_rows: layout.header_rows, delimiter: char::from(layout.delimiter) }
    }
}
impl SheetConfig {
    pub fn layout(&self) -> Result<SheetLayout> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_raise(|| ErrorKind::InvalidValue {
                field: "sheet.delimiter",
                reason: format!("{:?} is not a single ASCII character", self.delimiter),
            })?;
        Ok(SheetLayout { delimiter, header_rows: self.header_rows })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconsConfig {
    /// Inverted pixels brighter than this (`r + g + b`) turn white, the rest
    /// transparent.
    pub white_threshold: u16,
}
impl Default for IconsConfig {
    fn default() -> Self {
        Self { white_threshold: 700 }
    }
}

impl Config {
    /// Loads and validates the configuration, see the crate documentation for
    /// the order sources are merged in.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::NotFound`] if `explicit` is given but doesn't exist,
    /// - [`ErrorKind::Load`] if a source can't be parsed or has the wrong shape,
    /// - [`ErrorKind::InvalidValue`] if validation fails.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit
            && !path.is_file()
        {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        let config: Self = Self::figment(explicit).extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Every configuration source, merged but not yet extracted.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(dirs) = ProjectDirs::from("", "", APP_NAME) {
            figment = figment.merge(Toml::file(dirs.config_dir().join(FILE_NAME)));
        }
        figment = figment.merge(Toml::file(FILE_NAME));
        if let Some(path) = explicit {
            let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
            figment = match extension.as_deref() {
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        self.sheet.layout()?;
        if self.sources.profiles.is_empty() {
            exn::bail!(ErrorKind::InvalidValue {
                field: "sources.profiles",
                reason: "at least one site profile is required".to_string(),
            });
        }
        if !self.sources.wiki_base.path().ends_with('/') {
            exn::bail!(ErrorKind::InvalidValue {
                field: "sources.wiki_base",
                reason: format!("{} must end with '/'", self.sources.wiki_base),
            });
        }
        if self.http.max_attempts == Some(0) {
            exn::bail!(ErrorKind::InvalidValue {
                field: "http.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.icons.white_threshold >= MAX_BRIGHTNESS {
            exn::bail!(ErrorKind::InvalidValue {
                field: "icons.white_threshold",
                reason: format!("must be below {MAX_BRIGHTNESS}"),
            });
        }
        Ok(())
    }
}
