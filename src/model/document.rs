// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Arena-backed document tree.
//!
//! Nodes are never freed. Removing a node from the tree only detaches it, so a [`NodeId`]
//! handed out earlier stays addressable and [`Document::is_connected`] tells whether it is still
//! part of the rendered document.

use std::collections::BTreeMap;

use smol_str::SmolStr;
use url::Url;

use super::ids::NodeId;
use super::style::InlineStyle;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0} does not exist in this document")]
    UnknownNode(NodeId),
    #[error("node {0} has no parent")]
    Detached(NodeId),
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    #[error("node {0} is not a text node")]
    NotText(NodeId),
    #[error("node {child} cannot be inserted under {parent} (it is an ancestor)")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    #[error("node {0} already has a parent")]
    AlreadyAttached(NodeId),
    #[error("node {0} appears more than once in a replacement")]
    DuplicateNode(NodeId),
    #[error("range {start}..{end} is not valid for text of length {len} (node {node})")]
    InvalidRange { node: NodeId, start: usize, end: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: SmolStr,
    attributes: BTreeMap<String, String>,
    style: InlineStyle,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: SmolStr::new(tag.to_ascii_lowercase()),
            attributes: BTreeMap::new(),
            style: InlineStyle::default(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Returns an attribute value. `style` is kept parsed and is read through [`Self::style`].
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        if name == "style" {
            self.style = InlineStyle::parse(&value);
        } else {
            self.attributes.insert(name, value);
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn style(&self) -> &InlineStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut InlineStyle {
        &mut self.style
    }

    pub fn is_hidden(&self) -> bool {
        self.style.is_display_none() || self.style.is_visibility_hidden()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlignment {
    Start,
    Center,
    End,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollAlignment,
    pub inline: ScrollAlignment,
}

impl ScrollOptions {
    pub const SMOOTH_CENTER: Self = Self {
        behavior: ScrollBehavior::Smooth,
        block: ScrollAlignment::Center,
        inline: ScrollAlignment::Center,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: NodeId,
    pub options: ScrollOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    url: Option<Url>,
    last_scroll: Option<ScrollRequest>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates `<html><head></head><body></body></html>`.
    pub fn new() -> Self {
        let mut document = Self::with_root(Element::new("html"));
        let head = document.create_element("head");
        let body = document.create_element("body");
        document.push_child(document.root, head);
        document.push_child(document.root, body);
        document.body = body;
        document
    }

    /// Creates a document holding only `root`. The body defaults to the root until
    /// [`Self::ensure_body`] runs.
    pub(crate) fn with_root(root: Element) -> Self {
        let root_id = NodeId::from_index(0);
        Self {
            nodes: vec![Node { parent: None, children: Vec::new(), data: NodeData::Element(root) }],
            root: root_id,
            body: root_id,
            url: None,
            last_scroll: None,
        }
    }

    /// Points `body` at the first `<body>` child of the root, creating one when missing.
    pub(crate) fn ensure_body(&mut self) {
        let existing = self
            .children(self.root)
            .iter()
            .copied()
            .find(|child| self.element(*child).is_some_and(|element| element.is("body")));
        self.body = match existing {
            Some(body) => body,
            None => {
                let body = self.create_element("body");
                self.push_child(self.root, body);
                body
            }
        };
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn set_url(&mut self, url: Option<Url>) {
        self.url = url;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeData::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(NodeData::Text(text.into()))
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let child = self.create_element(tag);
        self.append_child(parent, child)?;
        Ok(child)
    }

    pub fn append_text(
        &mut self,
        parent: NodeId,
        text: impl Into<String>,
    ) -> Result<NodeId, DomError> {
        let child = self.create_text(text);
        self.append_child(parent, child)?;
        Ok(child)
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index()).map(|node| &node.data)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.data(id)? {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.index())?.data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.data(id)? {
            NodeData::Text(text) => Some(text.as_str()),
            NodeData::Element(_) => None,
        }
    }

    pub fn set_text(&mut self, id: NodeId, value: impl Into<String>) -> Result<(), DomError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Text(text) => {
                *text = value.into();
                Ok(())
            }
            NodeData::Element(_) => Err(DomError::NotText(id)),
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.data(id), Some(NodeData::Text(_)))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index())?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.index()).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// The closest element containing `id` (its parent, since text nodes never have children).
    pub fn nearest_element(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(candidate) = current {
            if self.element(candidate).is_some() {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Whether `id` is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    /// Pre-order traversal of everything below `id` (excluding `id`).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = self.children(id).iter().rev().copied().collect();
        Descendants { document: self, stack }
    }

    /// Text nodes below `id`, in document order.
    pub fn text_nodes(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id).filter(|node| self.is_text(*node)).collect()
    }

    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_owned();
        }
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        out
    }

    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|node| self.element(*node).and_then(Element::id) == Some(value))
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .filter(|node| self.element(*node).is_some_and(|element| element.is(tag)))
            .collect()
    }

    /// `href` of every anchor in document order, resolved against the document URL when known.
    pub fn links(&self) -> Vec<String> {
        self.elements_by_tag("a")
            .into_iter()
            .filter_map(|anchor| self.element(anchor)?.attr("href"))
            .map(|href| self.resolve_href(href))
            .collect()
    }

    fn resolve_href(&self, href: &str) -> String {
        self.url
            .as_ref()
            .and_then(|base| base.join(href).ok())
            .map(String::from)
            .unwrap_or_else(|| href.to_owned())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node(child)?;
        if self.element(parent).is_none() {
            self.node(parent)?;
            return Err(DomError::NotAnElement(parent));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        self.detach(child);
        self.push_child(parent, child);
        Ok(())
    }

    /// Detaches `id` from its parent. Removing a detached node is a no-op.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        self.node(id)?;
        self.detach(id);
        Ok(())
    }

    /// Replaces `old` with `replacements`, in order.
    ///
    /// Every precondition is checked before the tree is touched: either the whole replacement
    /// happens or the document is left unchanged.
    pub fn replace_with(&mut self, old: NodeId, replacements: &[NodeId]) -> Result<(), DomError> {
        let parent = self.node(old)?.parent.ok_or(DomError::Detached(old))?;
        for (index, replacement) in replacements.iter().enumerate() {
            let node = self.node(*replacement)?;
            if *replacement == old || replacements[..index].contains(replacement) {
                return Err(DomError::DuplicateNode(*replacement));
            }
            if node.parent.is_some() {
                return Err(DomError::AlreadyAttached(*replacement));
            }
            if self.is_inclusive_ancestor(*replacement, parent) {
                return Err(DomError::HierarchyRequest { parent, child: *replacement });
            }
        }

        let siblings = &mut self.nodes[parent.index()].children;
        let Some(slot) = siblings.iter().position(|child| *child == old) else {
            return Err(DomError::Detached(old));
        };
        siblings.splice(slot..=slot, replacements.iter().copied());
        for replacement in replacements {
            self.nodes[replacement.index()].parent = Some(parent);
        }
        self.nodes[old.index()].parent = None;
        Ok(())
    }

    pub fn scroll_into_view(&mut self, id: NodeId, options: ScrollOptions) -> Result<(), DomError> {
        self.node(id)?;
        self.last_scroll = Some(ScrollRequest { target: id, options });
        Ok(())
    }

    pub fn last_scroll(&self) -> Option<ScrollRequest> {
        self.last_scroll
    }

    /// Serializes the connected tree back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>");
        self.write_html(self.root, false, &mut out);
        out
    }

    /// Serializes one subtree (including `id` itself).
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self
            .parent(id)
            .and_then(|parent| self.element(parent))
            .is_some_and(|element| RAW_TEXT_ELEMENTS.contains(&element.tag()));
        self.write_html(id, raw, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, raw_text: bool, out: &mut String) {
        match self.data(id) {
            None => {}
            Some(NodeData::Text(text)) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    escape_text(text, out);
                }
            }
            Some(NodeData::Element(element)) => {
                out.push('<');
                out.push_str(element.tag());
                for (name, value) in element.attributes() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                if !element.style().is_empty() {
                    out.push_str(" style=\"");
                    escape_attr(&element.style().to_string(), out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag()) {
                    return;
                }
                let raw = RAW_TEXT_ELEMENTS.contains(&element.tag());
                for child in self.children(id) {
                    self.write_html(*child, raw, out);
                }
                out.push_str("</");
                out.push_str(element.tag());
                out.push('>');
            }
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.index()).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.index()).ok_or(DomError::UnknownNode(id))
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node { parent: None, children: Vec::new(), data });
        id
    }

    fn push_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|child| *child != id);
        }
    }
}

pub struct Descendants<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(self.document.children(next).iter().rev().copied());
        Some(next)
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
