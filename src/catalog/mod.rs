pub mod components;
pub mod listing;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::manifest::{DocEntry, Entry, Manifest, StoryEntry};
use crate::utils::{base_id_from_title, normalize_base_url};

/// One component group: every manifest entry sharing a base id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentIndexEntry {
    pub base_id: String,
    pub title: String,
    pub import_paths: Vec<String>,
    pub has_docs: bool,
    pub stories: Vec<String>,
}

#[derive(Default)]
struct GroupAcc {
    title: String,
    import_paths: Vec<String>,
    has_docs: bool,
    stories: Vec<String>,
}

impl GroupAcc {
    fn add(&mut self, entry: &Entry) {
        push_unique(&mut self.import_paths, entry.import_path());
        self.has_docs |= entry.is_documentation();
        if let Entry::Story(s) = entry {
            push_unique(&mut self.stories, &s.id);
        }
    }

    fn finish(self, base_id: String) -> ComponentIndexEntry {
        ComponentIndexEntry {
            base_id,
            title: self.title,
            import_paths: self.import_paths,
            has_docs: self.has_docs,
            stories: self.stories,
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

pub fn list_docs(manifest: &Manifest) -> Vec<&DocEntry> {
    manifest
        .entries
        .values()
        .filter_map(|e| match e {
            Entry::Docs(d) => Some(d),
            Entry::Story(_) => None,
        })
        .collect()
}

pub fn list_stories(manifest: &Manifest) -> Vec<&StoryEntry> {
    manifest
        .entries
        .values()
        .filter_map(|e| match e {
            Entry::Story(s) => Some(s),
            Entry::Docs(_) => None,
        })
        .collect()
}

/// Aggregate all entries by base id, in manifest order. The first entry seen
/// names the group.
pub fn build_component_index(manifest: &Manifest) -> Vec<ComponentIndexEntry> {
    let mut groups: IndexMap<String, GroupAcc> = IndexMap::new();

    for entry in manifest.entries.values() {
        let acc = groups
            .entry(base_id_from_title(entry.title()))
            .or_insert_with(|| GroupAcc {
                title: entry.title().to_string(),
                ..Default::default()
            });
        acc.add(entry);
    }

    groups
        .into_iter()
        .map(|(base_id, acc)| acc.finish(base_id))
        .collect()
}

/// `<base>/?path=/docs/<id>` for docs entries, `<base>/?path=/story/<id>` otherwise.
pub fn resolve_public_url(entry: &Entry, base_url: &str) -> Result<String> {
    let base = normalize_base_url(base_url)?;
    let prefix = match entry {
        Entry::Docs(_) => "docs",
        Entry::Story(_) => "story",
    };
    Ok(format!("{}?path=/{}/{}", base, prefix, entry.id()))
}

/// Story viewer URL for an id the caller already knows.
pub fn story_url(id: &str, base_url: &str) -> Result<String> {
    let base = normalize_base_url(base_url)?;
    Ok(format!("{}?path=/story/{}", base, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::tests::sample;

    fn find<'a>(index: &'a [ComponentIndexEntry], base_id: &str) -> &'a ComponentIndexEntry {
        index.iter().find(|c| c.base_id == base_id).unwrap()
    }

    #[test]
    fn classification_splits_by_type() {
        let m = sample();
        let docs: Vec<&str> = list_docs(&m).iter().map(|d| d.id.as_str()).collect();
        assert_eq!(docs, ["intro--docs", "design-tokens-icons--docs"]);

        let stories: Vec<&str> = list_stories(&m).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            stories,
            [
                "ui-library-code-codeblockwithtabs--default",
                "mdx-only-group--default",
                "ui-library-code-codeblockwithtabs--with-title",
            ]
        );
    }

    #[test]
    fn index_aggregates_groups() {
        let index = build_component_index(&sample());
        assert_eq!(index.len(), 4);

        let code = find(&index, "ui-library-code-codeblockwithtabs");
        assert_eq!(code.title, "UI-Library/Code/CodeBlockWithTabs");
        assert_eq!(code.import_paths.len(), 1);
        assert_eq!(
            code.stories,
            [
                "ui-library-code-codeblockwithtabs--default",
                "ui-library-code-codeblockwithtabs--with-title",
            ]
        );
        assert!(!code.has_docs);

        assert!(find(&index, "design-tokens-icons").has_docs);
        assert!(find(&index, "mdx-only-group").has_docs);
    }

    #[test]
    fn index_is_order_independent_apart_from_titles() {
        let m = sample();
        let mut reversed = m.clone();
        reversed.entries.reverse();

        let mut a = build_component_index(&m);
        let mut b = build_component_index(&reversed);
        a.sort_by(|x, y| x.base_id.cmp(&y.base_id));
        b.sort_by(|x, y| x.base_id.cmp(&y.base_id));

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.base_id, y.base_id);
            assert_eq!(x.has_docs, y.has_docs);
            let mut xs = x.stories.clone();
            let mut ys = y.stories.clone();
            xs.sort();
            ys.sort();
            assert_eq!(xs, ys);
        }
    }

    #[test]
    fn two_entry_manifest_gives_two_groups() {
        let m: Manifest = serde_json::from_value(serde_json::json!({
            "v": 5,
            "entries": {
                "design-tokens-icons--docs": {
                    "type": "docs", "id": "design-tokens-icons--docs",
                    "title": "Design Tokens/Icons", "name": "Docs",
                    "importPath": "./icons.mdx"
                },
                "ui-library-code-codeblockwithtabs--default": {
                    "type": "story", "id": "ui-library-code-codeblockwithtabs--default",
                    "title": "UI-Library/Code/CodeBlockWithTabs", "name": "Default",
                    "importPath": "./CodeBlockWithTabs.stories.tsx"
                }
            }
        }))
        .unwrap();

        let index = build_component_index(&m);
        assert_eq!(index.len(), 2);
        assert!(find(&index, "design-tokens-icons").has_docs);
    }

    #[test]
    fn public_url_ignores_trailing_slash() {
        let m = sample();
        let doc = m.get("intro--docs").unwrap();
        for base in ["https://x/sb", "https://x/sb/"] {
            assert_eq!(
                resolve_public_url(doc, base).unwrap(),
                "https://x/sb/?path=/docs/intro--docs"
            );
        }

        let story = m.get("ui-library-code-codeblockwithtabs--default").unwrap();
        assert_eq!(
            resolve_public_url(story, "https://example.com/storybook/").unwrap(),
            "https://example.com/storybook/?path=/story/ui-library-code-codeblockwithtabs--default"
        );
    }

    #[test]
    fn story_url_for_raw_ids() {
        assert_eq!(
            story_url("ui-library-cardcontainer", "https://x/sb").unwrap(),
            "https://x/sb/?path=/story/ui-library-cardcontainer"
        );
    }
}
