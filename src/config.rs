use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Attributes worth keeping for identification and interaction.
pub const IMPORTANT_ATTRIBUTES: &[&str] = &[
    "id",
    "class",
    "name",
    "value",
    "href",
    "src",
    "alt",
    "title",
    "aria-label",
    "aria-labelledby",
    "aria-describedby",
    "role",
    "placeholder",
    "type",
    "data-testid",
    "for",
    "action",
    "method",
];

pub const AD_KEYWORDS: &[&str] = &["ad", "ads", "advertisement", "banner", "promotion", "sponsor"];
pub const CONSENT_KEYWORDS: &[&str] = &["cookie", "consent", "gdpr", "privacy-alert"];
pub const TRACKING_KEYWORDS: &[&str] = &["analytics", "tracker", "tracking"];

/// Keyword matches only prune these tags.
pub const KEYWORD_GATED_TAGS: &[&str] = &["iframe", "div"];

/// Tags whose direct text children are captured as `textContent`.
pub const TEXT_BEARING_TAGS: &[&str] = &[
    "button", "a", "h1", "h2", "h3", "h4", "h5", "h6", "label", "li", "span", "p", "div", "td",
    "th",
];

pub const VOID_TAGS: &[&str] = &["img", "input", "br", "hr", "meta", "link"];

pub const INTERACTIVE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea", "label"];
pub const INTERACTIVE_ROLES: &[&str] = &["button", "link"];
pub const HANDLER_ATTRIBUTES: &[&str] = &["onclick", "onsubmit"];

/// A group of fingerprint keywords and the tags they are allowed to prune.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkipRule {
    pub name: String,
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
}

impl SkipRule {
    pub fn new(name: &str, keywords: &[&str], tags: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: to_strings(keywords),
            tags: to_strings(tags),
        }
    }

    pub fn applies_to(&self, tag_name: &str) -> bool {
        self.tags.iter().any(|t| t == tag_name)
    }

    /// Returns the first keyword contained in `fingerprint`, if any.
    pub fn matching_keyword(&self, fingerprint: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|kw| fingerprint.contains(kw))
    }
}

/// Classification tables used by the filter, simplifier, renderer and
/// selector deriver. `Default` carries the stock tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifierConfig {
    pub important_attributes: Vec<String>,
    pub skip_rules: Vec<SkipRule>,
    pub text_bearing_tags: Vec<String>,
    pub void_tags: Vec<String>,
    pub interactive_tags: Vec<String>,
    pub interactive_roles: Vec<String>,
    pub handler_attributes: Vec<String>,
    /// Characters of `textContent` quoted by text-matching selectors.
    pub text_snippet_chars: usize,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self {
            important_attributes: to_strings(IMPORTANT_ATTRIBUTES),
            skip_rules: vec![
                SkipRule::new("advertising", AD_KEYWORDS, KEYWORD_GATED_TAGS),
                SkipRule::new("consent", CONSENT_KEYWORDS, KEYWORD_GATED_TAGS),
                SkipRule::new("tracking", TRACKING_KEYWORDS, KEYWORD_GATED_TAGS),
            ],
            text_bearing_tags: to_strings(TEXT_BEARING_TAGS),
            void_tags: to_strings(VOID_TAGS),
            interactive_tags: to_strings(INTERACTIVE_TAGS),
            interactive_roles: to_strings(INTERACTIVE_ROLES),
            handler_attributes: to_strings(HANDLER_ATTRIBUTES),
            text_snippet_chars: 20,
        }
    }
}

impl SimplifierConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse simplifier config")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&source)?;
        log::info!(
            "Loaded simplifier config from {} ({} skip rules)",
            path.display(),
            config.skip_rules.len()
        );
        Ok(config)
    }

    /// Stock tables unless `path` is given.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn is_text_bearing(&self, tag_name: &str) -> bool {
        contains(&self.text_bearing_tags, tag_name)
    }

    pub fn is_void(&self, tag_name: &str) -> bool {
        contains(&self.void_tags, tag_name)
    }

    pub fn is_interactive_tag(&self, tag_name: &str) -> bool {
        contains(&self.interactive_tags, tag_name)
    }

    pub fn is_interactive_role(&self, role: &str) -> bool {
        contains(&self.interactive_roles, role)
    }
}

fn contains(list: &[String], value: &str) -> bool {
    list.iter().any(|item| item == value)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
