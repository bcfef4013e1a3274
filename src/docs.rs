use serde::Serialize;

use crate::catalog::listing::DocKind;
use crate::extract::ExtractedDocument;
use crate::manifest::Entry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocDetail {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub markdown: String,
    pub metadata: DocMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocMetadata {
    pub kind: DocKind,
    pub path: String,
}

/// Combine the manifest entry with what was scraped from its page.
pub fn doc_detail(entry: &Entry, doc: ExtractedDocument) -> DocDetail {
    let kind = if entry.is_documentation() {
        DocKind::Docs
    } else {
        DocKind::Component
    };
    let title = if doc.title.is_empty() {
        entry.title().to_string()
    } else {
        doc.title
    };

    DocDetail {
        id: entry.id().to_string(),
        title,
        summary: summary(&doc.markdown),
        markdown: doc.markdown,
        metadata: DocMetadata {
            kind,
            path: entry.import_path().to_string(),
        },
    }
}

/// First prose paragraph: not a heading, list item, code fence or props marker.
fn summary(markdown: &str) -> String {
    markdown
        .split("\n\n")
        .map(str::trim)
        .find(|block| !block.is_empty() && !is_structural(block))
        .unwrap_or_default()
        .to_string()
}

fn is_structural(block: &str) -> bool {
    if block.starts_with('#') || block.starts_with("- ") || block.starts_with("```") || block == "**Props**" {
        return true;
    }
    let digits = block.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && block[digits..].starts_with(". ")
}
