//! Captured DOM trees.
//!
//! A snapshot is the JSON dump of a rendered docs page (`tag`, `attrs`, `text`,
//! `children` per element) taken by a browser-side script. It implements the
//! driver traits, so the extractor runs on it exactly as on a live page. Clicks
//! are only counted; a snapshot has no scripts to react to them.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::driver::{DocElement, DocPage};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct NodeData {
    tag: String,
    #[serde(default)]
    attrs: BTreeMap<String, String>,
    /// Text preceding the children.
    #[serde(default)]
    text: String,
    #[serde(default)]
    children: Vec<SnapshotNode>,
    #[serde(skip)]
    clicks: AtomicUsize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SnapshotNode(Arc<NodeData>);

impl SnapshotNode {
    fn text_content(&self, out: &mut String) {
        out.push_str(&self.0.text);
        for child in &self.0.children {
            child.text_content(out);
        }
    }

    #[cfg(test)]
    pub fn clicks(&self) -> usize {
        self.0.clicks.load(Ordering::Relaxed)
    }

    fn select(&self, selector: &str, include_self: bool) -> Vec<SnapshotNode> {
        let compounds = parse_selector(selector);
        let mut out = Vec::new();
        let mut path = Vec::new();
        if include_self {
            walk(self, &mut path, &compounds, &mut out);
        } else {
            path.push(&*self.0);
            for child in &self.0.children {
                walk(child, &mut path, &compounds, &mut out);
            }
        }
        out
    }
}

fn walk<'a>(
    node: &'a SnapshotNode,
    path: &mut Vec<&'a NodeData>,
    selector: &[Compound],
    out: &mut Vec<SnapshotNode>,
) {
    if matches_selector(selector, &node.0, &path[..]) {
        out.push(node.clone());
    }
    path.push(&*node.0);
    for child in &node.0.children {
        walk(child, path, selector, out);
    }
    path.pop();
}

// ── Selectors: tag, .class, #id and the descendant combinator ──

#[derive(Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(s: &str) -> Self {
        let mut c = Compound::default();
        let mut kind = ' ';
        let mut part = String::new();
        for ch in s.chars().chain(std::iter::once('\0')) {
            if matches!(ch, '.' | '#' | '\0') {
                let part = std::mem::take(&mut part);
                match kind {
                    ' ' if !part.is_empty() && part != "*" => c.tag = Some(part.to_lowercase()),
                    '.' if !part.is_empty() => c.classes.push(part),
                    '#' if !part.is_empty() => c.id = Some(part),
                    _ => {}
                }
                kind = ch;
            } else {
                part.push(ch);
            }
        }
        c
    }

    fn matches(&self, node: &NodeData) -> bool {
        if self.tag.as_ref().is_some_and(|t| !node.tag.eq_ignore_ascii_case(t)) {
            return false;
        }
        if self.id.as_ref().is_some_and(|id| node.attrs.get("id") != Some(id)) {
            return false;
        }
        let classes = node.attrs.get("class").map(String::as_str).unwrap_or("");
        self.classes
            .iter()
            .all(|c| classes.split_whitespace().any(|have| have == c))
    }
}

fn parse_selector(selector: &str) -> Vec<Compound> {
    selector.split_whitespace().map(Compound::parse).collect()
}

/// Right-to-left: the node matches the last compound, the rest match
/// ancestors in order.
fn matches_selector(selector: &[Compound], node: &NodeData, ancestors: &[&NodeData]) -> bool {
    let Some((last, rest)) = selector.split_last() else {
        return false;
    };
    if !last.matches(node) {
        return false;
    }
    let mut remaining = rest.iter().rev().peekable();
    for ancestor in ancestors.iter().rev() {
        match remaining.peek() {
            Some(c) if c.matches(ancestor) => {
                remaining.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    remaining.peek().is_none()
}

impl DocElement for SnapshotNode {
    async fn tag_name(&self) -> Result<String> {
        Ok(self.0.tag.to_lowercase())
    }

    async fn text(&self) -> Result<String> {
        let mut out = String::new();
        self.text_content(&mut out);
        Ok(out.trim().to_string())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.0.attrs.get(name).cloned())
    }

    async fn children(&self) -> Result<Vec<Self>> {
        Ok(self.0.children.clone())
    }

    async fn query(&self, selector: &str) -> Result<Option<Self>> {
        Ok(self.select(selector, false).into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Self>> {
        Ok(self.select(selector, false))
    }

    async fn click(&self) -> Result<()> {
        self.0.clicks.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

pub struct SnapshotPage {
    url: String,
    document: SnapshotNode,
}

impl SnapshotPage {
    pub fn new(url: impl Into<String>, document: SnapshotNode) -> Self {
        SnapshotPage {
            url: url.into(),
            document,
        }
    }

    pub fn from_json(url: impl Into<String>, json: &str) -> Result<Self> {
        let document = serde_json::from_str(json)
            .map_err(|e| Error::Driver(format!("invalid DOM snapshot: {}", e)))?;
        Ok(Self::new(url, document))
    }
}

impl DocPage for SnapshotPage {
    type Element = SnapshotNode;

    fn url(&self) -> &str {
        &self.url
    }

    /// A captured page never changes, so there is nothing to wait for.
    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<Option<SnapshotNode>> {
        let found = self.query(selector).await?;
        debug!("snapshot lookup '{}': {}", selector, found.is_some());
        Ok(found)
    }

    async fn query(&self, selector: &str) -> Result<Option<SnapshotNode>> {
        Ok(self.document.select(selector, true).into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<SnapshotNode>> {
        Ok(self.document.select(selector, true))
    }
}

/// Builder for hand-made trees in tests.
#[cfg(test)]
pub struct NodeBuilder(NodeData);

#[cfg(test)]
pub fn el(tag: &str) -> NodeBuilder {
    NodeBuilder(NodeData {
        tag: tag.to_string(),
        attrs: BTreeMap::new(),
        text: String::new(),
        children: Vec::new(),
        clicks: AtomicUsize::new(0),
    })
}

#[cfg(test)]
impl NodeBuilder {
    pub fn text(mut self, text: &str) -> Self {
        self.0.text = text.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.0.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, child: impl Into<SnapshotNode>) -> Self {
        self.0.children.push(child.into());
        self
    }

    pub fn build(self) -> SnapshotNode {
        SnapshotNode(Arc::new(self.0))
    }
}

#[cfg(test)]
impl From<NodeBuilder> for SnapshotNode {
    fn from(b: NodeBuilder) -> Self {
        b.build()
    }
}
