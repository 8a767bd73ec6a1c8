use crate::config::SimplifierConfig;
use crate::filter::RelevanceFilter;
use crate::host::HostNode;
use crate::node::SimplifiedNode;
use crate::simplifier::NodeSimplifier;

/// Counters from one traversal, logged at debug level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub visited: usize,
    pub pruned: usize,
    pub empty_text: usize,
    pub retained: usize,
    pub max_depth: usize,
}

struct Frame<N> {
    pending: std::vec::IntoIter<N>,
    node: SimplifiedNode,
}

/// Depth-first, pre-order builder of the simplified tree.
///
/// Uses an explicit stack instead of recursion so deeply nested documents
/// cannot exhaust the call stack. A frame is attached to its parent only
/// once all of its children are processed, which keeps document order.
pub struct TreeWalker<'c> {
    filter: RelevanceFilter<'c>,
    simplifier: NodeSimplifier<'c>,
}

impl<'c> TreeWalker<'c> {
    pub fn new(config: &'c SimplifierConfig) -> Self {
        Self {
            filter: RelevanceFilter::new(config),
            simplifier: NodeSimplifier::new(config),
        }
    }

    /// Walks the children of `body` into a fresh root. A missing body, or one
    /// the relevance filter rejects, yields an empty root.
    pub fn walk<N: HostNode>(&self, body: Option<N>) -> SimplifiedNode {
        self.walk_with_stats(body).0
    }

    pub fn walk_with_stats<N: HostNode>(&self, body: Option<N>) -> (SimplifiedNode, WalkStats) {
        let mut stats = WalkStats::default();
        let Some(body) = body else {
            log::warn!("Document body is not available");
            return (SimplifiedNode::root(), stats);
        };

        stats.visited += 1;
        if self.filter.should_skip(&body) {
            log::debug!("Document body is hidden, nothing to simplify");
            stats.pruned += 1;
            return (SimplifiedNode::root(), stats);
        }

        let mut root = SimplifiedNode::root();
        let mut root_pending = body.children().into_iter();
        let mut stack: Vec<Frame<N>> = Vec::new();

        loop {
            let next = match stack.last_mut() {
                Some(frame) => frame.pending.next(),
                None => root_pending.next(),
            };
            let Some(source) = next else {
                match stack.pop() {
                    Some(frame) => attach(&mut stack, &mut root, frame.node),
                    None => break,
                }
                continue;
            };

            stats.visited += 1;
            if self.filter.should_skip(&source) {
                stats.pruned += 1;
                continue;
            }

            let Some(node) = self.simplifier.simplify(&source) else {
                stats.empty_text += 1;
                continue;
            };
            stats.retained += 1;
            stats.max_depth = stats.max_depth.max(stack.len() + 1);

            if matches!(node, SimplifiedNode::Element(_)) {
                stack.push(Frame {
                    pending: source.children().into_iter(),
                    node,
                });
            } else {
                attach(&mut stack, &mut root, node);
            }
        }

        log::debug!(
            "Simplified tree: {} visited, {} pruned, {} empty text, {} retained, depth {}",
            stats.visited,
            stats.pruned,
            stats.empty_text,
            stats.retained,
            stats.max_depth
        );
        (root, stats)
    }
}

fn attach<N>(stack: &mut [Frame<N>], root: &mut SimplifiedNode, node: SimplifiedNode) {
    match stack.last_mut() {
        Some(parent) => parent.node.push_child(node),
        None => root.push_child(node),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::HtmlDocument;

    fn walk(html: &str) -> (SimplifiedNode, WalkStats) {
        let config = SimplifierConfig::default();
        let doc = HtmlDocument::parse(html);
        TreeWalker::new(&config).walk_with_stats(doc.body())
    }

    fn tags(nodes: &[SimplifiedNode]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| match n {
                SimplifiedNode::Element(e) => e.tag_name.clone(),
                SimplifiedNode::Text { content } => format!("#{}", content),
                SimplifiedNode::Root { .. } => "root".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_missing_body_yields_empty_root() {
        let config = SimplifierConfig::default();
        let doc = HtmlDocument::parse_fragment("<p>orphan</p>");
        let root = TreeWalker::new(&config).walk(doc.body());
        assert_eq!(root, SimplifiedNode::root());
    }

    #[test]
    fn test_hidden_body_yields_empty_root() {
        for html in [
            "<body hidden><p>secret</p></body>",
            r#"<body style="display: none"><p>secret</p></body>"#,
            r#"<body style="visibility: hidden"><p>secret</p></body>"#,
        ] {
            let (root, stats) = walk(html);
            assert_eq!(root, SimplifiedNode::root(), "{}", html);
            assert_eq!(stats.visited, 1);
            assert_eq!(stats.pruned, 1);
        }
    }

    #[test]
    fn test_document_order_preserved() {
        let (root, _) = walk("<body><h1>A</h1>mid<ul><li>1</li><li>2</li></ul><p>end</p></body>");
        assert_eq!(tags(root.children()), vec!["h1", "#mid", "ul", "p"]);

        let list = &root.children()[2];
        assert_eq!(tags(list.children()), vec!["li", "li"]);
        assert_eq!(tags(list.children()[1].children()), vec!["#2"]);
    }

    #[test]
    fn test_pruning_is_subtree_wide() {
        let (root, stats) = walk(
            r#"<body>
                <div style="display:none"><button id="inner">Buy</button></div>
                <div class="ad-slot"><p>Visible on its own</p></div>
                <p>kept</p>
            </body>"#,
        );

        assert_eq!(tags(root.children()), vec!["p"]);
        assert!(root.descendants().all(|n| {
            n.as_element().is_none_or(|e| e.tag_name != "button")
        }));
        assert_eq!(stats.pruned, 2);
    }

    #[test]
    fn test_empty_text_contributes_nothing() {
        let (root, stats) = walk("<body>\n   <span>  </span>\n\t</body>");
        assert_eq!(tags(root.children()), vec!["span"]);
        assert!(root.children()[0].children().is_empty());
        assert_eq!(stats.empty_text, 3);
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 1_000;
        let html = format!("<body>{}leaf{}</body>", "<span>".repeat(depth), "</span>".repeat(depth));
        let (root, stats) = walk(&html);

        assert_eq!(stats.max_depth, depth + 1);
        let leaf = root.descendants().last().unwrap();
        assert_eq!(leaf, &SimplifiedNode::text("leaf"));
    }

    #[test]
    fn test_idempotent() {
        let html = r#"<body><form action="/s"><input name="q"><button>Go</button></form></body>"#;
        assert_eq!(walk(html), walk(html));
    }
}
