use crate::config::SimplifierConfig;
use crate::node::{ElementNode, SimplifiedNode};

pub const ROOT_OPEN: &str = "<div class=\"simplified-dom-root\">";
pub const ROOT_CLOSE: &str = "</div>";

const INDENT: &str = "  ";

/// Renders a simplified tree as indented markup.
pub struct MarkupRenderer<'c> {
    config: &'c SimplifierConfig,
}

impl<'c> MarkupRenderer<'c> {
    pub fn new(config: &'c SimplifierConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, node: &SimplifiedNode) -> String {
        let mut out = String::new();
        self.render_into(node, 0, &mut out);
        out
    }

    pub fn render_at(&self, node: &SimplifiedNode, depth: usize) -> String {
        let mut out = String::new();
        self.render_into(node, depth, &mut out);
        out
    }

    fn render_into(&self, node: &SimplifiedNode, depth: usize, out: &mut String) {
        let indent = INDENT.repeat(depth);
        match node {
            SimplifiedNode::Root { children } => {
                out.push_str(ROOT_OPEN);
                out.push('\n');
                for child in children {
                    self.render_into(child, depth + 1, out);
                }
                out.push_str(ROOT_CLOSE);
                out.push('\n');
            }
            SimplifiedNode::Text { content } => {
                out.push_str(&indent);
                out.push_str(content);
                out.push('\n');
            }
            SimplifiedNode::Element(element) => self.render_element(element, depth, &indent, out),
        }
    }

    fn render_element(&self, element: &ElementNode, depth: usize, indent: &str, out: &mut String) {
        let tag = &element.tag_name;
        let attrs = format_attributes(element);

        if self.config.is_void(tag) && element.children.is_empty() {
            out.push_str(&format!("{}<{}{} />\n", indent, tag, attrs));
            return;
        }

        out.push_str(&format!("{}<{}{}>", indent, tag, attrs));
        if let Some(text) = &element.text_content {
            out.push_str(text);
        }
        if !element.children.is_empty() {
            out.push('\n');
            for child in &element.children {
                self.render_into(child, depth + 1, out);
            }
            out.push_str(indent);
        }
        out.push_str(&format!("</{}>\n", tag));
    }
}

fn format_attributes(element: &ElementNode) -> String {
    let mut attrs = String::new();
    if let Some(attributes) = &element.attributes {
        for (name, value) in attributes.iter() {
            attrs.push_str(&format!(" {}=\"{}\"", name, value));
        }
    }
    if element.is_interactive() {
        attrs.push_str(" data-interactive=\"true\"");
    }
    attrs
}
