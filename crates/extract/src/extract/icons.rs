use tracing::{instrument, warn};
use url::Url;

use super::Extractor;
use crate::consts;
use crate::normalize::CanonicalName;

/// A creature icon found on the wiki's creatures page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSource {
    pub name: CanonicalName,
    /// Full size image, never the thumbnail.
    pub url: Url,
}

impl Extractor {
    /// Every creature icon on the page, in document order.
    ///
    /// Images without a usable `src` are skipped.
    #[instrument(skip(self, base), fields(base = %base))]
    pub fn icons(&self, base: &Url) -> Vec<IconSource> {
        let mut icons = Vec::new();
        for (index, image) in self.document.select(&consts::DINO_ICON_SELECTOR).enumerate() {
            let attributes = image.value();
            let Some(src) = attributes.attr("src").map(str::trim).filter(|src| !src.is_empty()) else {
                warn!(index, "icon without a source");
                continue;
            };
            let url = match base.join(src) {
                Ok(url) => full_size(url),
                Err(error) => {
                    warn!(src, %error, "icon source is not a valid URL");
                    continue;
                },
            };
            let name = [attributes.attr("alt"), attributes.attr("title"), file_name(&url)]
                .into_iter()
                .flatten()
                .map(CanonicalName::new)
                .find(|name| !name.is_empty())
                .unwrap_or_else(|| CanonicalName::new(format!("image_{}", index + 1)));
            icons.push(IconSource { name, url });
        }
        icons
    }
}

/// Undoes MediaWiki thumbnailing: `<prefix>/thumb/a/ab/File.png/30px-File.png`
/// is served in full as `<prefix>/a/ab/File.png`.
fn full_size(mut url: Url) -> Url {
    let path = url.path();
    if let Some((prefix, rest)) = path.split_once("/thumb/") {
        let original: Vec<&str> = rest.split('/').take(3).collect();
        if original.len() == 3 {
            let path = format!("{}/{}", prefix, original.join("/"));
            url.set_path(&path);
        }
    }
    url
}

fn file_name(url: &Url) -> Option<&str> {
    url.path_segments()?.next_back().filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://ark.wiki.gg/wiki/Creatures").unwrap()
    }

    #[test]
    fn names_fall_back_from_alt_to_title_to_file() {
        let html = r#"
            <img class="dinolink" alt="Dire Wolf.png" title="ignored" src="/images/thumb/1/1a/Dire_Wolf.png/30px-Dire_Wolf.png">
            <img class="dinolink" alt=" " title="Rock Drake" src="/images/thumb/2/2b/Rock_Drake.png/30px-Rock_Drake.png">
            <img class="dinolink" src="/images/thumb/3/3c/Achatina.png/30px-Achatina.png">
        "#;
        let names: Vec<String> =
            Extractor::from_html(html).icons(&base()).into_iter().map(|icon| icon.name.into_string()).collect();
        assert_eq!(names, vec!["Dire Wolf", "Rock Drake", "Achatina"]);
    }

    #[test]
    fn thumbnails_resolve_to_full_size_images() {
        let html = r#"<img class="dinolink" alt="Rex" src="/images/thumb/e/e1/Rex.png/30px-Rex.png?abc">"#;
        let icons = Extractor::from_html(html).icons(&base());
        assert_eq!(icons[0].url.as_str(), "https://ark.wiki.gg/images/e/e1/Rex.png?abc");
    }

    #[test]
    fn protocol_relative_sources_use_https() {
        let html = r#"<img class="dinolink" alt="Dodo" src="//cdn.example.com/Dodo.png">"#;
        let icons = Extractor::from_html(html).icons(&base());
        assert_eq!(icons[0].url.as_str(), "https://cdn.example.com/Dodo.png");
    }

    #[test]
    fn sourceless_images_are_skipped_and_indexes_stay_one_based() {
        let html = r#"
            <img class="dinolink" alt="Rex">
            <img class="dinolink" src="/images/">
            <img class="not-a-dinolink" alt="Raptor" src="/images/Raptor.png">
        "#;
        let icons = Extractor::from_html(html).icons(&base());
        assert_eq!(icons.len(), 1);
        assert_eq!(icons[0].name.as_str(), "image 2");
    }
}
