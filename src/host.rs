// Boundary with the document-tree provider.
//
// The simplifier only ever reads a tree through HostNode. Anything that can
// answer its questions can be simplified: a parsed HTML document, a browser
// snapshot, or a test fixture.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
    ProcessingInstruction,
    Doctype,
    Document,
}

/// Attribute or property value as the host hands it out.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    /// Multi-valued token collection such as a class list.
    TokenList(Vec<String>),
    /// Namespaced animated string (SVG) carrying a base value.
    Animated { base_val: String },
    Null,
    Number(f64),
    Bool(bool),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: String,
}

impl ComputedStyle {
    pub fn is_hidden(&self) -> bool {
        self.display == "none" || self.visibility == "hidden" || self.opacity == "0"
    }
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "inline".to_string(),
            visibility: "visible".to_string(),
            opacity: "1".to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StyleError {
    #[error("style is only defined for element nodes")]
    NotAnElement,
    #[error("invalid value {value:?} for `{property}`")]
    InvalidValue { property: String, value: String },
}

/// One entry of a selection control's option list.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionEntry {
    pub value: String,
    pub text: String,
}

pub trait HostNode: Sized {
    fn kind(&self) -> NodeKind;

    /// Tag name as the host reports it. `None` for non-elements.
    fn tag_name(&self) -> Option<String>;

    fn attribute(&self, name: &str) -> Option<AttrValue>;

    fn has_attribute(&self, name: &str) -> bool;

    /// Child nodes in document order.
    fn children(&self) -> Vec<Self>;

    /// Raw character data for text nodes, concatenated descendant text otherwise.
    fn text_content(&self) -> String;

    fn computed_style(&self) -> Result<ComputedStyle, StyleError>;

    /// Lower-cased `type` of an input element.
    fn input_type(&self) -> Option<String>;

    fn is_checked(&self) -> bool;

    fn options(&self) -> Vec<OptionEntry>;

    /// Index into [`HostNode::options`], `-1` when nothing is selected.
    fn selected_index(&self) -> i64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_style_detection() {
        let visible = ComputedStyle::default();
        assert!(!visible.is_hidden());

        let faded = ComputedStyle {
            opacity: "0".to_string(),
            ..ComputedStyle::default()
        };
        assert!(faded.is_hidden());

        let collapsed = ComputedStyle {
            visibility: "collapse".to_string(),
            ..ComputedStyle::default()
        };
        assert!(!collapsed.is_hidden());
    }

    #[test]
    fn test_style_error_message() {
        let err = StyleError::InvalidValue {
            property: "opacity".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value \"abc\" for `opacity`");
    }
}
