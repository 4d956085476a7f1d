//! Site metadata: `.env`-style configuration and the Open Graph / Twitter
//! Card tags rendered into the page shell

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::PlaygroundResult;
use crate::sanitize::escape_html;

/// Marker in the page shell replaced by the rendered meta tags
pub const META_MARKER: &str = "{{meta}}";

const KEYWORDS: &str =
    "code editor, HTML, CSS, JavaScript, online editor, web development, programming";

const DEFAULTS: &[(&str, &str)] = &[
    ("SITE_URL", "https://example.com"),
    ("SITE_NAME", "Web Code Editor"),
    ("SITE_DESCRIPTION", "A simple, easy-to-use browser-based code editor"),
    ("SITE_LOCALE", "en_US"),
    ("OGP_IMAGE_URL", "https://example.com/program/ogp-image.png"),
    ("TWITTER_CARD", "summary_large_image"),
    ("AUTHOR_NAME", "PYU224"),
    ("AUTHOR_URL", "https://linksta.cc/@pyu224"),
];

/// Key-value site configuration layered over built-in defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    values: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            values: DEFAULTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl SiteConfig {
    /// Parse `KEY=VALUE` lines. Comments (`#`) and lines without `=` are
    /// skipped; surrounding quotes are stripped from values.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            config.values.insert(key.trim().to_string(), value.to_string());
        }
        config
    }

    /// Load `path`, falling back to `<path>.example`, then to defaults
    pub fn load(path: &Path) -> PlaygroundResult<Self> {
        if path.exists() {
            return Ok(Self::parse(&fs::read_to_string(path)?));
        }

        let mut example = path.as_os_str().to_owned();
        example.push(".example");
        let example = Path::new(&example);
        if example.exists() {
            log::info!("{} not found, using {}", path.display(), example.display());
            return Ok(Self::parse(&fs::read_to_string(example)?));
        }

        log::info!("no site config at {}, using defaults", path.display());
        Ok(Self::default())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

fn name_tag(out: &mut String, name: &str, content: &str) {
    out.push_str(&format!(
        "    <meta name=\"{}\" content=\"{}\">\n",
        name,
        escape_html(content)
    ));
}

fn property_tag(out: &mut String, property: &str, content: &str) {
    out.push_str(&format!(
        "    <meta property=\"{}\" content=\"{}\">\n",
        property,
        escape_html(content)
    ));
}

/// Render the metadata block. `current_url` overrides `SITE_URL` for the
/// canonical and `og:url` entries.
pub fn render_meta_tags(config: &SiteConfig, current_url: Option<&str>) -> String {
    let title = config.value("SITE_NAME");
    let description = config.value("SITE_DESCRIPTION");
    let image = config.value("OGP_IMAGE_URL");
    let url = current_url.unwrap_or_else(|| config.value("SITE_URL"));

    let mut out = String::new();

    out.push_str("    <!-- Primary Meta Tags -->\n");
    name_tag(&mut out, "title", title);
    name_tag(&mut out, "description", description);
    name_tag(&mut out, "author", config.value("AUTHOR_NAME"));
    name_tag(&mut out, "keywords", KEYWORDS);

    out.push_str("\n    <!-- Open Graph / Facebook -->\n");
    property_tag(&mut out, "og:type", "website");
    property_tag(&mut out, "og:url", url);
    property_tag(&mut out, "og:title", title);
    property_tag(&mut out, "og:description", description);
    property_tag(&mut out, "og:image", image);
    property_tag(&mut out, "og:site_name", title);
    property_tag(&mut out, "og:locale", config.value("SITE_LOCALE"));

    out.push_str("\n    <!-- Twitter -->\n");
    property_tag(&mut out, "twitter:card", config.value("TWITTER_CARD"));
    property_tag(&mut out, "twitter:url", url);
    property_tag(&mut out, "twitter:title", title);
    property_tag(&mut out, "twitter:description", description);
    property_tag(&mut out, "twitter:image", image);

    out.push_str("\n    <!-- Canonical URL -->\n");
    out.push_str(&format!("    <link rel=\"canonical\" href=\"{}\">\n", escape_html(url)));

    out
}

/// Replace the meta marker in a page shell. Pages without the marker are
/// returned unchanged.
pub fn inject_meta(page: &str, tags: &str) -> String {
    page.replacen(META_MARKER, tags.trim_end(), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_style() {
        let config = SiteConfig::parse(
            "# site\nSITE_NAME = \"My Pad\"\n\nSITE_URL='https://pad.test'\nBROKEN LINE\nEXTRA=a=b\n",
        );
        assert_eq!(config.get("SITE_NAME"), Some("My Pad"));
        assert_eq!(config.get("SITE_URL"), Some("https://pad.test"));
        assert_eq!(config.get("EXTRA"), Some("a=b"));
        assert_eq!(config.get("TWITTER_CARD"), Some("summary_large_image"));
        assert_eq!(config.get("BROKEN LINE"), None);
    }

    #[test]
    fn test_values_are_attribute_escaped() {
        let mut config = SiteConfig::default();
        config.set("SITE_NAME", "Tom & \"Jerry\" <pad>");
        let tags = render_meta_tags(&config, None);
        assert!(tags.contains(
            r#"<meta property="og:title" content="Tom &amp; &quot;Jerry&quot; &lt;pad&gt;">"#
        ));
    }

    #[test]
    fn test_current_url_overrides_site_url() {
        let config = SiteConfig::default();
        let tags = render_meta_tags(&config, Some("https://pad.test/?x=1&y=2"));
        assert!(tags.contains(r#"<link rel="canonical" href="https://pad.test/?x=1&amp;y=2">"#));
        assert!(tags.contains(r#"<meta property="twitter:url" content="https://pad.test/?x=1&amp;y=2">"#));
        assert!(!tags.contains("https://example.com\""));
    }

    #[test]
    fn test_inject_meta() {
        let page = "<head>\n{{meta}}\n</head>";
        assert_eq!(inject_meta(page, "<meta a>\n"), "<head>\n<meta a>\n</head>");
        assert_eq!(inject_meta("<head></head>", "<meta a>"), "<head></head>");
    }

    #[test]
    fn test_load_falls_back_to_example() {
        let dir = tempfile::tempdir().unwrap();
        let env = dir.path().join(".env");
        fs::write(dir.path().join(".env.example"), "SITE_NAME=From Example\n").unwrap();

        let config = SiteConfig::load(&env).unwrap();
        assert_eq!(config.get("SITE_NAME"), Some("From Example"));

        fs::write(&env, "SITE_NAME=From Env\n").unwrap();
        let config = SiteConfig::load(&env).unwrap();
        assert_eq!(config.get("SITE_NAME"), Some("From Env"));
    }
}
