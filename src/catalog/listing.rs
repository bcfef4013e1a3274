use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use super::{build_component_index, resolve_public_url, ComponentIndexEntry};
use crate::error::Result;
use crate::manifest::{Entry, Manifest};
use crate::utils::{base_id_from_title, is_documentation_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Component,
    Docs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocListEntry {
    pub id: String,
    pub title: String,
    pub kind: DocKind,
    pub path: String,
}

pub struct Listing {
    pub docs: Vec<DocListEntry>,
    pub components: Vec<DocListEntry>,
}

/// Docs are every entry that is documentation by type or by `.mdx` source.
/// Components are groups with at least one real (non-MDX) story.
pub fn list_all_documentation(manifest: &Manifest) -> Listing {
    let mut docs: IndexMap<&str, DocListEntry> = IndexMap::new();
    for e in manifest.entries.values().filter(|e| e.is_documentation()) {
        docs.insert(
            e.id(),
            DocListEntry {
                id: e.id().to_string(),
                title: e.title().to_string(),
                kind: DocKind::Docs,
                path: e.import_path().to_string(),
            },
        );
    }

    let components = build_component_index(manifest)
        .into_iter()
        .filter(|c| has_real_story(manifest, c))
        .map(|c| DocListEntry {
            path: c.import_paths.first().cloned().unwrap_or_default(),
            id: c.base_id,
            title: c.title,
            kind: DocKind::Component,
        })
        .collect();

    Listing {
        docs: docs.into_values().collect(),
        components,
    }
}

fn has_real_story(manifest: &Manifest, group: &ComponentIndexEntry) -> bool {
    group.stories.iter().any(|id| match manifest.get(id) {
        Some(Entry::Story(s)) => !is_documentation_path(&s.import_path),
        _ => false,
    })
}

impl Listing {
    /// Components first, then docs.
    pub fn entries(&self) -> Vec<DocListEntry> {
        self.components.iter().chain(&self.docs).cloned().collect()
    }

    /// Link list for humans. A component links to the docs page of its group
    /// when there is one, else to its first story.
    pub fn to_markdown(&self, manifest: &Manifest, base_url: &str) -> Result<String> {
        let mut lines = vec!["These are the available documentation files and components:".to_string()];

        let mut doc_by_base_id: HashMap<String, &DocListEntry> = HashMap::new();
        for d in &self.docs {
            doc_by_base_id.insert(base_id_from_title(&d.title), d);
        }

        for d in &self.docs {
            let url = match manifest.get(&d.id) {
                Some(entry) => resolve_public_url(entry, base_url)?,
                None => String::new(),
            };
            lines.push(format!("- [{}]({})", d.title, url));
        }

        let index = build_component_index(manifest);
        for c in &self.components {
            let target = match doc_by_base_id.get(&c.id) {
                Some(doc) => manifest.get(&doc.id),
                None => index
                    .iter()
                    .find(|g| g.base_id == c.id)
                    .and_then(|g| g.stories.first())
                    .and_then(|id| manifest.get(id)),
            };
            let url = match target {
                Some(entry) => resolve_public_url(entry, base_url)?,
                None => String::new(),
            };
            lines.push(format!("- [{}]({})", c.title, url));
        }

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::tests::sample;

    fn ids(list: &[DocListEntry]) -> Vec<&str> {
        list.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn mdx_story_is_docs_not_component() {
        let listing = list_all_documentation(&sample());

        let docs = ids(&listing.docs);
        assert_eq!(
            docs,
            ["intro--docs", "design-tokens-icons--docs", "mdx-only-group--default"]
        );

        let components = ids(&listing.components);
        assert_eq!(components, ["ui-library-code-codeblockwithtabs"]);
        assert!(!components.contains(&"mdx-only-group"));
        assert!(listing.components.iter().all(|c| c.kind == DocKind::Component));
        assert_eq!(
            listing.components[0].path,
            "../ui-library/src/code/CodeBlockWithTabs.stories.tsx"
        );
    }

    #[test]
    fn mixed_group_appears_in_both_lists_once() {
        let m: Manifest = serde_json::from_value(serde_json::json!({
            "v": 5,
            "entries": {
                "forms-input--docs": {
                    "type": "docs", "id": "forms-input--docs", "title": "Forms/Input",
                    "name": "Docs", "importPath": "./Input.mdx"
                },
                "forms-input--default": {
                    "type": "story", "id": "forms-input--default", "title": "Forms/Input",
                    "name": "Default", "importPath": "./Input.stories.tsx"
                },
                "forms-input--disabled": {
                    "type": "story", "id": "forms-input--disabled", "title": "Forms/Input",
                    "name": "Disabled", "importPath": "./Input.stories.tsx"
                }
            }
        }))
        .unwrap();

        let listing = list_all_documentation(&m);
        assert_eq!(ids(&listing.docs), ["forms-input--docs"]);
        assert_eq!(ids(&listing.components), ["forms-input"]);

        let entries = listing.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, DocKind::Component);
        assert_eq!(entries[1].kind, DocKind::Docs);

        let md = listing.to_markdown(&m, "https://x/sb").unwrap();
        assert!(md.contains("- [Forms/Input](https://x/sb/?path=/docs/forms-input--docs)"));
    }

    #[test]
    fn markdown_links_docs_and_components() {
        let m = sample();
        let md = list_all_documentation(&m)
            .to_markdown(&m, "https://example.com/storybook/")
            .unwrap();

        assert!(md.starts_with("These are the available documentation files and components:"));
        assert!(md.contains("- [Intro](https://example.com/storybook/?path=/docs/intro--docs)"));
        assert!(md.contains(
            "- [UI-Library/Code/CodeBlockWithTabs](https://example.com/storybook/?path=/story/ui-library-code-codeblockwithtabs--default)"
        ));
    }
}
