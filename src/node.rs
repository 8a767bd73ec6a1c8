use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Captured attributes in allow-list order.
pub type Attributes = IndexMap<String, String>;

/// A retained element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    /// Direct text children only, joined with single spaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SimplifiedNode>,
}

impl ElementNode {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|a| a.get(name))
            .map(String::as_str)
    }

    /// Like [`ElementNode::attr`] but treats an empty value as missing.
    pub fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|v| !v.is_empty())
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "lowercase")]
pub enum SimplifiedNode {
    Root {
        #[serde(default)]
        children: Vec<SimplifiedNode>,
    },
    Text {
        content: String,
    },
    Element(ElementNode),
}

impl SimplifiedNode {
    pub fn root() -> Self {
        SimplifiedNode::Root {
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        SimplifiedNode::Text {
            content: content.into(),
        }
    }

    pub fn children(&self) -> &[SimplifiedNode] {
        match self {
            SimplifiedNode::Root { children } => children,
            SimplifiedNode::Element(element) => &element.children,
            SimplifiedNode::Text { .. } => &[],
        }
    }

    /// Appends `child`. Text nodes cannot hold children; the call is a no-op
    /// and returns `false` for them.
    pub fn push_child(&mut self, child: SimplifiedNode) -> bool {
        match self {
            SimplifiedNode::Root { children } => children.push(child),
            SimplifiedNode::Element(element) => element.children.push(child),
            SimplifiedNode::Text { .. } => return false,
        }
        true
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            SimplifiedNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Pre-order iterator over this node and every descendant.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a SimplifiedNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SimplifiedNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_attributes_serialize_in_insertion_order() {
        let mut element = ElementNode::new("a");
        element.attributes = Some(attrs(&[("title", "t"), ("href", "/x"), ("id", "")]));

        let json = serde_json::to_string(&SimplifiedNode::Element(element)).unwrap();
        assert_eq!(
            json,
            r#"{"nodeType":"element","tagName":"a","attributes":{"title":"t","href":"/x","id":""}}"#
        );
    }

    #[test]
    fn test_non_empty_attr() {
        let mut element = ElementNode::new("input");
        element.attributes = Some(attrs(&[("id", ""), ("name", "q")]));
        assert_eq!(element.attr("id"), Some(""));
        assert_eq!(element.non_empty_attr("id"), None);
        assert_eq!(element.non_empty_attr("name"), Some("q"));
        assert_eq!(element.attr("class"), None);
    }

    #[test]
    fn test_json_shape() {
        let mut button = ElementNode::new("button");
        button.attributes = Some(attrs(&[("aria-label", "Go")]));
        button.text_content = Some("Go".to_string());
        button.interactive = Some(true);

        let mut root = SimplifiedNode::root();
        root.push_child(SimplifiedNode::Element(button));
        root.push_child(SimplifiedNode::text("tail"));

        assert_eq!(
            serde_json::to_value(&root).unwrap(),
            json!({
                "nodeType": "root",
                "children": [
                    {
                        "nodeType": "element",
                        "tagName": "button",
                        "attributes": {"aria-label": "Go"},
                        "textContent": "Go",
                        "interactive": true
                    },
                    {"nodeType": "text", "content": "tail"}
                ]
            })
        );
    }

    #[test]
    fn test_deserialize_element() {
        let node: SimplifiedNode = serde_json::from_value(json!({
            "nodeType": "element",
            "tagName": "select",
            "attributes": {"name": "size"},
            "selectedIndex": 1,
            "selectedValue": "m"
        }))
        .unwrap();

        let element = node.as_element().unwrap();
        assert_eq!(element.attr("name"), Some("size"));
        assert_eq!(element.selected_index, Some(1));
        assert!(element.children.is_empty());
    }

    #[test]
    fn test_text_rejects_children() {
        let mut text = SimplifiedNode::text("x");
        assert!(!text.push_child(SimplifiedNode::text("y")));
        assert!(text.children().is_empty());
    }

    #[test]
    fn test_descendants_pre_order() {
        let mut inner = ElementNode::new("p");
        inner.children.push(SimplifiedNode::text("b"));
        let mut outer = ElementNode::new("div");
        outer.children.push(SimplifiedNode::text("a"));
        outer.children.push(SimplifiedNode::Element(inner));

        let mut root = SimplifiedNode::root();
        root.push_child(SimplifiedNode::Element(outer));

        let order: Vec<String> = root
            .descendants()
            .map(|n| match n {
                SimplifiedNode::Root { .. } => "root".to_string(),
                SimplifiedNode::Text { content } => content.clone(),
                SimplifiedNode::Element(e) => e.tag_name.clone(),
            })
            .collect();
        assert_eq!(order, vec!["root", "div", "a", "p", "b"]);
    }
}
