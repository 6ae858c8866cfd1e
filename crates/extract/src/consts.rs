use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Path shared by both overview pages; every map page lives below it.
pub(crate) const MAPS_PATH: &str = "/ark-survival-ascended/maps/";

// Wikily renders each creature of a map as a clickable `div`.
selector!(CLICKABLE_ITEM_SELECTOR, "div[class*='cursor-pointer']");
// Ark-Unity lists the creatures of a map in a single dropdown.
selector!(SPAWN_DROPDOWN_SELECTOR, "select#spawn-map-select");
selector!(OPTION_SELECTOR, "option");
selector!(ANCHOR_SELECTOR, "a[href]");
// Creature pages on the wiki.
selector!(BASE_STATS_TABLE_SELECTOR, "table.wikitable[data-description*='Base Stats and Growth']");
selector!(ROW_SELECTOR, "tr");
selector!(CELL_SELECTOR, "td");
// The creatures overview page on the wiki.
selector!(DINO_ICON_SELECTOR, "img.dinolink");

regex!(THUMBNAIL_PREFIX_REGEX, r"^\d+px-");
regex!(IMAGE_EXTENSION_REGEX, r"(?i)\.(?:png|jpe?g|gif|webp|svg)$");
