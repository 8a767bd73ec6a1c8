// HostNode adapter over parsed HTML.
//
// There is no layout engine behind a parsed document, so computed style is
// approximated from the user-agent stylesheet, the `hidden` attribute and
// inline `style` declarations.

use ego_tree::NodeId;
use regex::Regex;
use scraper::node::{Node, Text};
use scraper::{ElementRef, Html, Selector};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::host::{AttrValue, ComputedStyle, HostNode, NodeKind, OptionEntry, StyleError};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Elements the user-agent stylesheet renders with `display: none`.
const UA_HIDDEN_TAGS: &[&str] = &[
    "head", "script", "style", "template", "noscript", "title", "meta", "link", "base",
];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "details", "dialog", "dd", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section", "table", "ul",
];

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z-]+)\s*:\s*(.*?)\s*(?:!\s*important)?\s*$")
        .expect("declaration pattern is valid")
});

/// Resolved `visibility` per element, filled lazily as styles are queried.
type VisibilityCache = RefCell<HashMap<NodeId, String>>;

/// An owned, parsed HTML document.
pub struct HtmlDocument {
    html: Html,
    visibility: VisibilityCache,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            visibility: VisibilityCache::default(),
        }
    }

    /// Parses `source` as a body-context fragment. Such a tree has no `<body>`.
    pub fn parse_fragment(source: &str) -> Self {
        Self {
            html: Html::parse_fragment(source),
            visibility: VisibilityCache::default(),
        }
    }

    pub fn body(&self) -> Option<HtmlNode<'_>> {
        self.select_first("body")
    }

    /// First element matching a CSS selector, for callers that want to start
    /// somewhere other than `<body>`.
    pub fn select_first(&self, css: &str) -> Option<HtmlNode<'_>> {
        let selector = Selector::parse(css).ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| HtmlNode::Element(el, &self.visibility))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum HtmlNode<'a> {
    Element(ElementRef<'a>, &'a VisibilityCache),
    Text(&'a Text),
    Other(NodeKind),
}

impl<'a> HtmlNode<'a> {
    fn element(&self) -> Option<ElementRef<'a>> {
        match self {
            HtmlNode::Element(el, _) => Some(*el),
            _ => None,
        }
    }

    fn is_tag(&self, tag: &str) -> bool {
        self.element().is_some_and(|el| el.value().name() == tag)
    }
}

impl HostNode for HtmlNode<'_> {
    fn kind(&self) -> NodeKind {
        match self {
            HtmlNode::Element(..) => NodeKind::Element,
            HtmlNode::Text(_) => NodeKind::Text,
            HtmlNode::Other(kind) => *kind,
        }
    }

    fn tag_name(&self) -> Option<String> {
        self.element().map(|el| el.value().name().to_string())
    }

    fn attribute(&self, name: &str) -> Option<AttrValue> {
        let element = self.element()?;
        let element = element.value();
        let raw = element.attr(name)?;
        let is_svg = &*element.name.ns == SVG_NAMESPACE;

        let value = match name {
            "class" | "href" if is_svg => AttrValue::Animated {
                base_val: raw.to_string(),
            },
            _ => AttrValue::Text(raw.to_string()),
        };
        Some(value)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.element()
            .is_some_and(|el| el.value().attr(name).is_some())
    }

    fn children(&self) -> Vec<Self> {
        let HtmlNode::Element(el, cache) = *self else {
            return Vec::new();
        };

        el.children()
            .map(|child| match child.value() {
                Node::Element(_) => ElementRef::wrap(child)
                    .map_or(HtmlNode::Other(NodeKind::Element), |el| HtmlNode::Element(el, cache)),
                Node::Text(text) => HtmlNode::Text(text),
                Node::Comment(_) => HtmlNode::Other(NodeKind::Comment),
                Node::ProcessingInstruction(_) => HtmlNode::Other(NodeKind::ProcessingInstruction),
                Node::Doctype(_) => HtmlNode::Other(NodeKind::Doctype),
                _ => HtmlNode::Other(NodeKind::Document),
            })
            .collect()
    }

    fn text_content(&self) -> String {
        match self {
            HtmlNode::Element(el, _) => el.text().collect(),
            HtmlNode::Text(text) => {
                let content: &str = &text.text;
                content.to_string()
            }
            HtmlNode::Other(_) => String::new(),
        }
    }

    fn computed_style(&self) -> Result<ComputedStyle, StyleError> {
        let HtmlNode::Element(el, cache) = *self else {
            return Err(StyleError::NotAnElement);
        };
        let element = el.value();
        let tag = element.name();
        let declarations = inline_declarations(element.attr("style"));

        let display = if self.input_type().as_deref() == Some("hidden") {
            "none".to_string()
        } else if let Some(display) = declarations.get("display") {
            display.clone()
        } else if UA_HIDDEN_TAGS.contains(&tag) || element.attr("hidden").is_some() {
            "none".to_string()
        } else if BLOCK_TAGS.contains(&tag) {
            "block".to_string()
        } else {
            "inline".to_string()
        };

        let visibility = inherited_visibility(el, cache);

        let opacity = match declarations.get("opacity") {
            Some(raw) => normalize_opacity(raw)?,
            None => "1".to_string(),
        };

        Ok(ComputedStyle {
            display,
            visibility,
            opacity,
        })
    }

    fn input_type(&self) -> Option<String> {
        if !self.is_tag("input") {
            return None;
        }
        let kind = self
            .element()
            .and_then(|el| el.value().attr("type"))
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "text".to_string());
        Some(kind)
    }

    fn is_checked(&self) -> bool {
        self.is_tag("input") && self.has_attribute("checked")
    }

    fn options(&self) -> Vec<OptionEntry> {
        option_elements(self)
            .into_iter()
            .map(|option| {
                let text = collapse_whitespace(&option.text().collect::<String>());
                let value = option
                    .value()
                    .attr("value")
                    .map(str::to_string)
                    .unwrap_or_else(|| text.clone());
                OptionEntry { value, text }
            })
            .collect()
    }

    fn selected_index(&self) -> i64 {
        let options = option_elements(self);
        if options.is_empty() {
            return -1;
        }

        let is_selected = |o: &ElementRef| o.value().attr("selected").is_some();
        let index = if self.has_attribute("multiple") {
            options.iter().position(is_selected)
        } else {
            options
                .iter()
                .rposition(is_selected)
                .or_else(|| options.iter().position(|o| !is_disabled_option(o)))
        };

        index.map_or(-1, |i| i as i64)
    }
}

/// Visibility inherits, so the nearest explicit declaration wins. The walk up
/// stops at the first ancestor already resolved, and every element passed on
/// the way is cached with the result.
fn inherited_visibility(el: ElementRef<'_>, cache: &VisibilityCache) -> String {
    let mut path = Vec::new();
    let mut current = Some(el);
    let mut resolved = None;

    while let Some(node) = current {
        let cached = cache.borrow().get(&node.id()).cloned();
        if cached.is_some() {
            resolved = cached;
            break;
        }
        path.push(node.id());
        let explicit = inline_declarations(node.value().attr("style"))
            .remove("visibility")
            .filter(|v| v != "inherit");
        if explicit.is_some() {
            resolved = explicit;
            break;
        }
        current = node.parent().and_then(ElementRef::wrap);
    }

    let visibility = resolved.unwrap_or_else(|| "visible".to_string());
    let mut cache = cache.borrow_mut();
    for id in path {
        cache.insert(id, visibility.clone());
    }
    visibility
}

fn option_elements<'a>(node: &HtmlNode<'a>) -> Vec<ElementRef<'a>> {
    match node.element() {
        Some(select) if select.value().name() == "select" => select
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == "option")
            .collect(),
        _ => Vec::new(),
    }
}

fn is_disabled_option(option: &ElementRef) -> bool {
    if option.value().attr("disabled").is_some() {
        return true;
    }
    option
        .parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|p| p.value().name() == "optgroup" && p.value().attr("disabled").is_some())
}

/// Parses an inline `style` attribute. Later declarations win; property
/// names and values are lower-cased.
fn inline_declarations(style: Option<&str>) -> HashMap<String, String> {
    let mut declarations = HashMap::new();
    let Some(style) = style else {
        return declarations;
    };

    for part in style.split(';') {
        if let Some(caps) = DECLARATION.captures(part) {
            declarations.insert(caps[1].to_lowercase(), caps[2].to_lowercase());
        }
    }
    declarations
}

fn normalize_opacity(raw: &str) -> Result<String, StyleError> {
    let invalid = || StyleError::InvalidValue {
        property: "opacity".to_string(),
        value: raw.to_string(),
    };

    let value = match raw.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().map_err(|_| invalid())? / 100.0,
        None => raw.trim().parse::<f64>().map_err(|_| invalid())?,
    };
    if value.is_nan() {
        return Err(invalid());
    }

    if value <= 0.0 {
        return Ok("0".to_string());
    }
    Ok(value.min(1.0).to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
