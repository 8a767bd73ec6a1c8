use crate::config::SimplifierConfig;
use crate::host::{HostNode, NodeKind};
use crate::simplifier::normalize_attr_value;

/// Fingerprint fields checked against the skip keywords.
const FINGERPRINT_ATTRIBUTES: &[&str] = &["id", "class", "aria-label"];

/// Decides which source nodes are noise: non-content node kinds, invisible
/// elements, and ad/consent/tracking containers.
pub struct RelevanceFilter<'c> {
    config: &'c SimplifierConfig,
}

impl<'c> RelevanceFilter<'c> {
    pub fn new(config: &'c SimplifierConfig) -> Self {
        Self { config }
    }

    pub fn should_skip<N: HostNode>(&self, node: &N) -> bool {
        match node.kind() {
            NodeKind::Text => false,
            NodeKind::Element => self.is_hidden(node) || self.matches_skip_rule(node),
            _ => true,
        }
    }

    fn is_hidden<N: HostNode>(&self, node: &N) -> bool {
        match node.computed_style() {
            Ok(style) => style.is_hidden(),
            Err(e) => {
                // fail open
                log::debug!("Style lookup failed, keeping element: {}", e);
                false
            }
        }
    }

    fn matches_skip_rule<N: HostNode>(&self, node: &N) -> bool {
        let tag_name = node.tag_name().unwrap_or_default().to_lowercase();
        let rules: Vec<_> = self
            .config
            .skip_rules
            .iter()
            .filter(|rule| rule.applies_to(&tag_name))
            .collect();
        if rules.is_empty() {
            return false;
        }

        let fingerprint = fingerprint(node);
        for rule in rules {
            if let Some(keyword) = rule.matching_keyword(&fingerprint) {
                log::trace!("Pruning <{}> ({} keyword {:?})", tag_name, rule.name, keyword);
                return true;
            }
        }
        false
    }
}

/// Lower-cased `id`, `class` and `aria-label`, space separated.
pub fn fingerprint<N: HostNode>(node: &N) -> String {
    FINGERPRINT_ATTRIBUTES
        .iter()
        .map(|name| normalize_attr_value(node.attribute(name).as_ref()).to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
