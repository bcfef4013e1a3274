use std::collections::HashSet;

use serde::Serialize;

use super::story_url;
use crate::error::Result;
use crate::manifest::{Entry, Manifest};
use crate::utils::component_id_from_entry_id;

/// Tags every story carries and that say nothing about the component.
const NOISE_TAGS: &[&str] = &["dev", "test", "autodocs"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    pub id: String,
    pub title: String,
    pub import_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_path: Option<String>,
    pub tags: Vec<String>,
}

/// One entry per component group, taken from its first story.
pub fn list_all_components(manifest: &Manifest) -> Vec<ComponentEntry> {
    let mut seen = HashSet::new();
    let mut components = Vec::new();

    for entry in manifest.entries.values() {
        if entry.is_documentation() {
            continue;
        }
        let Entry::Story(story) = entry else {
            continue;
        };

        let id = component_id_from_entry_id(&story.id);
        if !seen.insert(id) {
            continue;
        }

        components.push(ComponentEntry {
            id: id.to_string(),
            title: story.title.clone(),
            import_path: story.import_path.clone(),
            component_path: story.component_path.clone(),
            tags: story
                .tags
                .iter()
                .filter(|t| !NOISE_TAGS.contains(&t.as_str()))
                .cloned()
                .collect(),
        });
    }

    components
}

pub fn components_markdown(components: &[ComponentEntry], base_url: &str) -> Result<String> {
    let mut lines = vec!["These are the available components:".to_string()];
    for c in components {
        let url = story_url(&c.id, base_url)?;
        let line = format!("- [{}]({}) [{}]", c.title, url, c.tags.join(", "));
        lines.push(line.trim_end().to_string());
    }
    Ok(lines.join("\n"))
}
