// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! Document representation

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use url::Url;

use super::element::Element;
use super::node::{Node, NodeData, NodeId, NodeType};
use crate::network::RequestKind;

/// Tags whose text never renders and must not leak into extracted text
const NON_RENDERED_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Tags that end a line when extracting visible text
const BLOCK_TAGS: [&str; 18] = [
    "p", "div", "section", "article", "header", "footer", "h1", "h2", "h3", "h4", "h5", "h6",
    "li", "tr", "br", "ul", "ol", "table",
];

/// HTML document representation
#[derive(Debug, Clone)]
pub struct Document {
    /// Document URL
    pub url: Option<Url>,
    /// Document title
    title: Arc<RwLock<String>>,
    /// Root node ID
    root_id: NodeId,
    /// Node storage
    pub(crate) nodes: Arc<RwLock<HashMap<NodeId, NodeData>>>,
    /// Body element ID
    body_id: Option<NodeId>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        let root_id = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root_id, NodeData::document());

        Self {
            url: None,
            title: Arc::new(RwLock::new(String::new())),
            root_id,
            nodes: Arc::new(RwLock::new(nodes)),
            body_id: None,
        }
    }

    /// Create a document with URL
    pub fn with_url(url: Url) -> Self {
        let mut doc = Self::new();
        doc.url = Some(url);
        doc
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.title.read().clone()
    }

    /// Set document title
    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.write() = title.into();
    }

    /// Get the <head> element
    pub fn head(&self) -> Option<Element> {
        self.get_elements_by_tag_name("head").into_iter().next()
    }

    /// Get the <body> element
    pub fn body(&self) -> Option<Element> {
        self.body_id
            .and_then(|id| Element::from_id(id, self.nodes.clone()))
    }

    /// Set the body element ID (called during parsing)
    pub(crate) fn set_body(&mut self, body: Option<NodeId>) {
        self.body_id = body;
    }

    /// Get the root node
    pub fn root(&self) -> Node {
        Node::new(self.root_id, self.nodes.clone())
    }

    /// Get elements by tag name, in document order
    pub fn get_elements_by_tag_name(&self, tag: &str) -> Vec<Element> {
        let tag = tag.to_lowercase();
        let mut results = Vec::new();
        let nodes = self.nodes.read();
        self.walk_elements(&nodes, self.root_id, &mut |id, data| {
            if data.tag_name.as_deref() == Some(tag.as_str()) {
                results.push(id);
            }
        });
        drop(nodes);

        results
            .into_iter()
            .filter_map(|id| Element::from_id(id, self.nodes.clone()))
            .collect()
    }

    /// Get all images
    pub fn images(&self) -> Vec<Element> {
        self.get_elements_by_tag_name("img")
    }

    /// Get all scripts
    pub fn scripts(&self) -> Vec<Element> {
        self.get_elements_by_tag_name("script")
    }

    /// Get all stylesheet links
    pub fn stylesheets(&self) -> Vec<Element> {
        self.get_elements_by_tag_name("link")
            .into_iter()
            .filter(|link| {
                link.rel()
                    .map(|rel| rel.eq_ignore_ascii_case("stylesheet"))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// URLs of all subresources the page references, resolved against the
    /// document URL. `data:` URLs carry their payload inline and are skipped.
    pub fn subresource_urls(&self) -> Vec<(Url, RequestKind)> {
        let mut refs: Vec<(String, RequestKind)> = Vec::new();

        for script in self.scripts() {
            if let Some(src) = script.src() {
                refs.push((src, RequestKind::Script));
            }
        }
        for sheet in self.stylesheets() {
            if let Some(href) = sheet.href() {
                refs.push((href, RequestKind::Stylesheet));
            }
        }
        for img in self.images() {
            if let Some(src) = img.src() {
                refs.push((src, RequestKind::Image));
            }
        }

        refs.into_iter()
            .filter(|(r, _)| !r.starts_with("data:"))
            .filter_map(|(r, kind)| {
                let resolved = match &self.url {
                    Some(base) => base.join(&r).ok(),
                    None => Url::parse(&r).ok(),
                };
                resolved.map(|url| (url, kind))
            })
            .collect()
    }

    /// Get the document's HTML
    pub fn outer_html(&self) -> String {
        self.root().outer_html()
    }

    /// Get all text content, including non-rendered text
    pub fn text_content(&self) -> String {
        self.root().text_content()
    }

    /// Extract the text a reader would see, one line per block element
    ///
    /// Script, style and template contents are excluded; consecutive
    /// whitespace collapses to single spaces.
    pub fn visible_text(&self) -> String {
        let nodes = self.nodes.read();
        let start = self.body_id.unwrap_or(self.root_id);

        let mut out = String::new();
        let mut line = String::new();
        Self::collect_visible(&nodes, start, &mut out, &mut line);
        flush_line(&mut out, &mut line);

        out
    }

    fn collect_visible(
        nodes: &HashMap<NodeId, NodeData>,
        node_id: NodeId,
        out: &mut String,
        line: &mut String,
    ) {
        let Some(node) = nodes.get(&node_id) else {
            return;
        };

        match node.node_type {
            NodeType::Text => {
                if let Some(ref text) = node.text_content {
                    for word in text.split_whitespace() {
                        if !line.is_empty() {
                            line.push(' ');
                        }
                        line.push_str(word);
                    }
                }
            }
            NodeType::Element => {
                let tag = node.tag_name.as_deref().unwrap_or("");
                if NON_RENDERED_TAGS.contains(&tag) {
                    return;
                }

                let is_block = BLOCK_TAGS.contains(&tag);
                if is_block {
                    flush_line(out, line);
                }
                for &child in &node.children {
                    Self::collect_visible(nodes, child, out, line);
                }
                if is_block {
                    flush_line(out, line);
                }
            }
            NodeType::Document => {
                for &child in &node.children {
                    Self::collect_visible(nodes, child, out, line);
                }
            }
            _ => {}
        }
    }

    fn walk_elements<F>(&self, nodes: &HashMap<NodeId, NodeData>, node_id: NodeId, f: &mut F)
    where
        F: FnMut(NodeId, &NodeData),
    {
        if let Some(node) = nodes.get(&node_id) {
            if node.node_type == NodeType::Element {
                f(node_id, node);
            }
            for &child in &node.children {
                self.walk_elements(nodes, child, f);
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn flush_line(out: &mut String, line: &mut String) {
    if !line.is_empty() {
        out.push_str(line);
        out.push('\n');
        line.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::parse_html;

    #[test]
    fn test_elements_by_tag() {
        let doc = parse_html("<html><body><p>a</p><p>b</p></body></html>").unwrap();
        assert_eq!(doc.get_elements_by_tag_name("p").len(), 2);
    }

    #[test]
    fn test_subresource_urls_resolved() {
        let html = r#"
            <html><head>
                <link rel="stylesheet" href="/style.css">
                <link rel="icon" href="/favicon.ico">
            </head><body>
                <script src="app.js"></script>
                <img src="data:image/png;base64,AAAA">
                <img src="https://cdn.example.com/logo.png">
            </body></html>
        "#;
        let doc = crate::dom::parse_html_with_url(
            html,
            Some(url::Url::parse("https://example.com/reports/1").unwrap()),
        )
        .unwrap();

        let subresources = doc.subresource_urls();
        let urls: Vec<String> = subresources.iter().map(|(u, _)| u.to_string()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/reports/app.js",
                "https://example.com/style.css",
                "https://cdn.example.com/logo.png",
            ]
        );

        use crate::network::RequestKind;
        assert_eq!(subresources[0].1, RequestKind::Script);
        assert_eq!(subresources[1].1, RequestKind::Stylesheet);
        assert_eq!(subresources[2].1, RequestKind::Image);
    }

    #[test]
    fn test_visible_text_skips_scripts() {
        let html = r#"
            <html><body>
                <h1>Title</h1>
                <p>First   paragraph</p>
                <script>console.log("invisible");</script>
                <style>p { color: red; }</style>
            </body></html>
        "#;
        let doc = parse_html(html).unwrap();
        let text = doc.visible_text();

        assert!(text.contains("Title"));
        assert!(text.contains("First paragraph"));
        assert!(!text.contains("invisible"));
        assert!(!text.contains("color"));
    }
}
