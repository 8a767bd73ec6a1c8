use crate::config::SimplifierConfig;
use crate::host::{AttrValue, HostNode, NodeKind};
use crate::node::{Attributes, ElementNode, SimplifiedNode};

/// Converts any host attribute shape to a plain string. Missing and null
/// values become the empty string.
pub fn normalize_attr_value(value: Option<&AttrValue>) -> String {
    match value {
        None | Some(AttrValue::Null) => String::new(),
        Some(AttrValue::Text(text)) => text.clone(),
        Some(AttrValue::TokenList(tokens)) => tokens.join(" "),
        Some(AttrValue::Animated { base_val }) => base_val.clone(),
        Some(AttrValue::Number(n)) => n.to_string(),
        Some(AttrValue::Bool(b)) => b.to_string(),
    }
}

/// Builds one [`SimplifiedNode`] from one retained source node.
pub struct NodeSimplifier<'c> {
    config: &'c SimplifierConfig,
}

impl<'c> NodeSimplifier<'c> {
    pub fn new(config: &'c SimplifierConfig) -> Self {
        Self { config }
    }

    /// `None` for empty text and for node kinds that carry no content.
    pub fn simplify<N: HostNode>(&self, node: &N) -> Option<SimplifiedNode> {
        match node.kind() {
            NodeKind::Text => {
                let content = node.text_content();
                let content = content.trim();
                if content.is_empty() {
                    None
                } else {
                    Some(SimplifiedNode::text(content))
                }
            }
            NodeKind::Element => Some(SimplifiedNode::Element(self.simplify_element(node))),
            _ => None,
        }
    }

    fn simplify_element<N: HostNode>(&self, node: &N) -> ElementNode {
        let tag_name = node.tag_name().unwrap_or_default().to_lowercase();
        let mut element = ElementNode::new(tag_name.as_str());

        let attributes = self.collect_attributes(node);
        if !attributes.is_empty() {
            element.attributes = Some(attributes);
        }

        if tag_name == "input"
            && matches!(node.input_type().as_deref(), Some("checkbox") | Some("radio"))
        {
            element.checked = Some(node.is_checked());
        }

        if tag_name == "select" {
            let options = node.options();
            if !options.is_empty() {
                let index = node.selected_index();
                element.selected_index = Some(index);
                if let Some(option) = usize::try_from(index).ok().and_then(|i| options.get(i)) {
                    element.selected_value = Some(option.value.clone());
                    element.selected_text = Some(option.text.clone());
                }
            }
        }

        if self.config.is_text_bearing(&tag_name) {
            element.text_content = direct_text(node);
        }

        if self.is_interactive(node, &tag_name) {
            element.interactive = Some(true);
        }

        element
    }

    fn collect_attributes<N: HostNode>(&self, node: &N) -> Attributes {
        let mut attributes = Attributes::new();
        for name in &self.config.important_attributes {
            if node.has_attribute(name) {
                let value = node.attribute(name);
                attributes.insert(name.clone(), normalize_attr_value(value.as_ref()));
            }
        }
        attributes
    }

    fn is_interactive<N: HostNode>(&self, node: &N, tag_name: &str) -> bool {
        if self.config.is_interactive_tag(tag_name) {
            return true;
        }
        if self
            .config
            .handler_attributes
            .iter()
            .any(|attr| node.has_attribute(attr))
        {
            return true;
        }

        let plain = |name: &str| node.attribute(name).map(|v| normalize_attr_value(Some(&v)));
        let role_matches = plain("role").is_some_and(|role| self.config.is_interactive_role(&role));
        role_matches || plain("tabindex").as_deref() == Some("0")
    }
}

/// Direct text children, each trimmed, joined by single spaces.
fn direct_text<N: HostNode>(node: &N) -> Option<String> {
    let joined = node
        .children()
        .iter()
        .filter(|child| child.kind() == NodeKind::Text)
        .map(|child| child.text_content().trim().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let trimmed = joined.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
