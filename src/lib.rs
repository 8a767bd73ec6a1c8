// DOM Simplifier Library
//
// Reduces a rendered document tree to the parts an automation agent needs:
// visible, non-advertising content with identifying attributes, interaction
// hints, and best-effort selectors for re-finding elements.

pub mod config;
pub mod fetch;
pub mod filter;
pub mod host;
pub mod html;
pub mod markup;
pub mod node;
pub mod selector;
pub mod simplifier;
pub mod walker;

use serde::{Deserialize, Serialize};

// Re-export main types for convenience
pub use config::{SimplifierConfig, SkipRule};
pub use fetch::PageFetcher;
pub use filter::RelevanceFilter;
pub use host::{AttrValue, ComputedStyle, HostNode, NodeKind, OptionEntry, StyleError};
pub use html::{HtmlDocument, HtmlNode};
pub use markup::MarkupRenderer;
pub use node::{Attributes, ElementNode, SimplifiedNode};
pub use selector::{derive_selector, interactive_elements, InteractiveElement};
pub use simplifier::{normalize_attr_value, NodeSimplifier};
pub use walker::{TreeWalker, WalkStats};

/// The simplified tree together with its rendered markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedDom {
    pub structure: SimplifiedNode,
    pub markup: String,
}

/// Entry point tying the walker, renderer and selector deriver to one
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct DomSimplifier {
    config: SimplifierConfig,
}

impl DomSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimplifierConfig) -> Self {
        Self { config }
    }

    /// Simplifies the tree below `body`. Never fails: a missing body gives
    /// an empty root.
    pub fn simplify_document<N: HostNode>(&self, body: Option<N>) -> SimplifiedDom {
        let structure = TreeWalker::new(&self.config).walk(body);
        let markup = self.render(&structure);
        SimplifiedDom { structure, markup }
    }

    pub fn simplify_html(&self, html: &str) -> SimplifiedDom {
        let document = HtmlDocument::parse(html);
        self.simplify_document(document.body())
    }

    pub fn render(&self, node: &SimplifiedNode) -> String {
        MarkupRenderer::new(&self.config).render(node)
    }

    pub fn derive_selector(&self, node: &SimplifiedNode) -> Option<String> {
        selector::derive_selector_with(node, self.config.text_snippet_chars)
    }

    pub fn interactive_elements(&self, root: &SimplifiedNode) -> Vec<InteractiveElement> {
        selector::interactive_elements(root, self.config.text_snippet_chars)
    }
}
