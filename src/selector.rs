use serde::{Deserialize, Serialize};

use crate::node::{ElementNode, SimplifiedNode};

pub const DEFAULT_SNIPPET_CHARS: usize = 20;

/// Best-effort locator for a simplified element. `None` for root and text
/// nodes. The result is not guaranteed to be unique on the live page.
pub fn derive_selector(node: &SimplifiedNode) -> Option<String> {
    derive_selector_with(node, DEFAULT_SNIPPET_CHARS)
}

pub fn derive_selector_with(node: &SimplifiedNode, snippet_chars: usize) -> Option<String> {
    node.as_element()
        .map(|element| element_selector(element, snippet_chars))
}

fn element_selector(element: &ElementNode, snippet_chars: usize) -> String {
    let tag = element.tag_name.as_str();
    let attr = |name: &str| element.non_empty_attr(name);

    if let Some(id) = attr("id") {
        return format!("#{}", id);
    }

    if let Some(class) = attr("class") {
        let classes: String = class.split_whitespace().map(|c| format!(".{}", c)).collect();
        if !classes.is_empty() {
            return format!("{}{}", tag, classes);
        }
    }

    if let Some(name) = attr("name") {
        return format!("{}[name=\"{}\"]", tag, name);
    }

    if let Some(test_id) = attr("data-testid") {
        return format!("[data-testid=\"{}\"]", test_id);
    }

    if let Some(label) = attr("aria-label") {
        return format!("{}[aria-label=\"{}\"]", tag, label);
    }

    if let Some(text) = element.text_content.as_deref().filter(|t| !t.is_empty()) {
        let snippet: String = text.chars().take(snippet_chars).collect();
        return format!("//{}[contains(text(), \"{}\")]", tag, snippet.replace('"', "\\\""));
    }

    tag.to_string()
}

/// A numbered entry in the list of actionable elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveElement {
    pub index: usize,
    pub tag_name: String,
    pub selector: String,
    pub text: Option<String>,
}

/// Every interactive element under `root`, in document order.
pub fn interactive_elements(root: &SimplifiedNode, snippet_chars: usize) -> Vec<InteractiveElement> {
    root.descendants()
        .filter_map(SimplifiedNode::as_element)
        .filter(|element| element.is_interactive())
        .enumerate()
        .map(|(index, element)| InteractiveElement {
            index,
            tag_name: element.tag_name.clone(),
            selector: element_selector(element, snippet_chars),
            text: element
                .text_content
                .clone()
                .or_else(|| element.attr("aria-label").map(str::to_string))
                .or_else(|| element.attr("placeholder").map(str::to_string)),
        })
        .collect()
}

impl InteractiveElement {
    /// One line for an action menu: `[3] <button> "Save" -> #save`.
    pub fn to_line(&self) -> String {
        match &self.text {
            Some(text) => format!("[{}] <{}> \"{}\" -> {}", self.index, self.tag_name, text, self.selector),
            None => format!("[{}] <{}> -> {}", self.index, self.tag_name, self.selector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Attributes;

    fn element(tag: &str, attrs: &[(&str, &str)], text: Option<&str>) -> SimplifiedNode {
        let mut element = ElementNode::new(tag);
        if !attrs.is_empty() {
            element.attributes = Some(attrs.iter().map(|(n, v)| (n.to_string(), v.to_string())).collect());
        }
        element.text_content = text.map(str::to_string);
        SimplifiedNode::Element(element)
    }

    #[test]
    fn test_non_elements_have_no_selector() {
        assert_eq!(derive_selector(&SimplifiedNode::root()), None);
        assert_eq!(derive_selector(&SimplifiedNode::text("x")), None);
    }

    #[test]
    fn test_id_wins_over_class() {
        let node = element("div", &[("id", "x"), ("class", "y")], None);
        assert_eq!(derive_selector(&node).as_deref(), Some("#x"));
    }

    #[test]
    fn test_class_qualifiers() {
        let node = element("button", &[("class", "y  z")], Some("Go"));
        assert_eq!(derive_selector(&node).as_deref(), Some("button.y.z"));
    }

    #[test]
    fn test_priority_chain() {
        assert_eq!(
            derive_selector(&element("input", &[("name", "q"), ("data-testid", "t")], None)).as_deref(),
            Some("input[name=\"q\"]")
        );
        assert_eq!(
            derive_selector(&element("a", &[("data-testid", "nav"), ("aria-label", "Home")], None))
                .as_deref(),
            Some("[data-testid=\"nav\"]")
        );
        assert_eq!(
            derive_selector(&element("a", &[("aria-label", "Home")], Some("Home"))).as_deref(),
            Some("a[aria-label=\"Home\"]")
        );
        assert_eq!(derive_selector(&element("hr", &[], None)).as_deref(), Some("hr"));
    }

    #[test]
    fn test_empty_attributes_fall_through() {
        let node = element("div", &[("id", ""), ("class", "   "), ("name", "n")], None);
        assert_eq!(derive_selector(&node).as_deref(), Some("div[name=\"n\"]"));
    }

    #[test]
    fn test_text_snippet_is_truncated_and_escaped() {
        let node = element("p", &[], Some(r#"Say "hello" to the whole wide world"#));
        assert_eq!(
            derive_selector(&node).as_deref(),
            Some(r#"//p[contains(text(), "Say \"hello\" to the w")]"#)
        );
    }

    #[test]
    fn test_snippet_counts_characters() {
        let node = element("span", &[], Some("ééééé"));
        assert_eq!(
            derive_selector_with(&node, 3).as_deref(),
            Some(r#"//span[contains(text(), "ééé")]"#)
        );
    }

    #[test]
    fn test_interactive_elements_listing() {
        let mut button = ElementNode::new("button");
        button.text_content = Some("Save".to_string());
        button.attributes = Some(Attributes::from([("id".to_string(), "save".to_string())]));
        button.interactive = Some(true);

        let mut input = ElementNode::new("input");
        input.attributes = Some(Attributes::from([
            ("name".to_string(), "q".to_string()),
            ("placeholder".to_string(), "Search".to_string()),
        ]));
        input.interactive = Some(true);

        let mut form = ElementNode::new("form");
        form.children.push(SimplifiedNode::Element(input));
        form.children.push(SimplifiedNode::Element(button));

        let mut root = SimplifiedNode::root();
        root.push_child(SimplifiedNode::Element(form));

        let items = interactive_elements(&root, DEFAULT_SNIPPET_CHARS);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].to_line(), "[0] <input> \"Search\" -> input[name=\"q\"]");
        assert_eq!(items[1].to_line(), "[1] <button> \"Save\" -> #save");
    }
}
