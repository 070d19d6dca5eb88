// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! HTML parser using html5ever

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use url::Url;

use super::document::Document;
use super::node::{NodeData, NodeId};
use crate::error::Result;

/// Parse HTML string into a Document
pub fn parse_html(html: &str) -> Result<Document> {
    parse_html_with_url(html, None)
}

/// Parse HTML string with a base URL
pub fn parse_html_with_url(html: &str, url: Option<Url>) -> Result<Document> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| crate::error::Error::HtmlParse(e.to_string()))?;

    let mut doc = match url {
        Some(u) => Document::with_url(u),
        None => Document::new(),
    };

    let converter = DomConverter::new(&mut doc);
    converter.convert(&dom.document);

    // Find title
    let title = doc
        .get_elements_by_tag_name("title")
        .into_iter()
        .next()
        .map(|t| t.text_content().trim().to_string());
    if let Some(title) = title {
        doc.set_title(title);
    }

    Ok(doc)
}

/// Converts the html5ever DOM into the arena document
struct DomConverter<'a> {
    doc: &'a mut Document,
}

impl<'a> DomConverter<'a> {
    fn new(doc: &'a mut Document) -> Self {
        Self { doc }
    }

    fn convert(mut self, handle: &Handle) {
        let root_id = self.doc.root().id;

        for child in handle.children.borrow().iter() {
            self.convert_node(child, root_id);
        }

        // Locate <body>; html5ever guarantees html > body nesting
        let body_id = self
            .doc
            .get_elements_by_tag_name("body")
            .into_iter()
            .next()
            .map(|e| e.node.id);
        self.doc.set_body(body_id);
    }

    fn convert_node(&mut self, handle: &Handle, parent_id: NodeId) -> Option<NodeId> {
        let node_id = NodeId::new();

        let node_data = match handle.data {
            RcNodeData::Document => {
                // Skip document node, we already have one
                return None;
            }
            RcNodeData::Doctype { .. } => NodeData::doctype(),
            RcNodeData::Text { ref contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() && text.len() > 1 {
                    // Skip whitespace-only text nodes (but keep single spaces)
                    return None;
                }
                NodeData::text(text)
            }
            RcNodeData::Comment { ref contents } => NodeData::comment(contents.to_string()),
            RcNodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let tag_name = name.local.to_string();
                let mut data = NodeData::element(&tag_name);

                for attr in attrs.borrow().iter() {
                    let attr_name = attr.name.local.to_string();
                    let attr_value = attr.value.to_string();
                    data.attributes.insert(attr_name, attr_value);
                }

                data
            }
            RcNodeData::ProcessingInstruction { .. } => {
                return None;
            }
        };

        let mut data = node_data;
        data.parent = Some(parent_id);

        {
            let mut nodes = self.doc.nodes.write();
            nodes.insert(node_id, data);
            if let Some(parent) = nodes.get_mut(&parent_id) {
                parent.children.push(node_id);
            }
        }

        for child in handle.children.borrow().iter() {
            self.convert_node(child, node_id);
        }

        Some(node_id)
    }
}
