pub mod driver;
pub mod fragment;
pub mod locate;
pub mod snapshot;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use driver::{DocElement, DocPage};
use fragment::{assemble, heading_level, Fragment, PropRow};
use locate::{locate_container, Located};

/// Text Storybook puts in the empty first option of a select control.
const PLACEHOLDER_OPTION: &str = "Choose option";

/// Selectors and timings for Storybook docs pages. They match one generation
/// of the docs renderer, so all of them are overridable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub root_selector: String,
    pub content_selector: String,
    pub toggle_selector: String,
    pub expanded_class: String,
    pub settle_delay_ms: u64,
    pub probe_depth: usize,
    pub wait_timeout_ms: u64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            root_selector: "#storybook-docs".into(),
            content_selector: ".sbdocs-content".into(),
            toggle_selector: ".docblock-code-toggle".into(),
            expanded_class: "docblock-code-toggle--expanded".into(),
            settle_delay_ms: 300,
            probe_depth: 3,
            wait_timeout_ms: 15_000,
        }
    }
}

impl ExtractConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedDocument {
    pub title: String,
    pub markdown: String,
}

/// Locate the docs container on `page` and convert it to Markdown.
pub async fn extract_page<P: DocPage>(page: &P, cfg: &ExtractConfig) -> Result<ExtractedDocument> {
    info!("Extracting docs from {}", page.url());
    match locate_container(page, cfg).await? {
        Located::Container(container) => extract(&container, cfg).await,
        Located::Fallback(root) => Ok(extract_fallback(&root).await),
    }
}

/// Expand code toggles, then walk the direct children of `container` in order.
pub async fn extract<E: DocElement>(container: &E, cfg: &ExtractConfig) -> Result<ExtractedDocument> {
    let expanded = expand_code_toggles(container, cfg).await?;
    debug!("Expanded {} code toggles", expanded);

    let mut title: Option<String> = None;
    let mut lines = Vec::new();

    for child in container.children().await? {
        let fragment = match read_child(&child).await {
            Ok(Some(f)) => f,
            Ok(None) => continue,
            Err(e) => {
                debug!("Skipping unreadable element: {}", e);
                continue;
            }
        };
        if let Fragment::Heading { level: 1, text } = &fragment {
            if title.is_none() {
                title = Some(text.clone());
            }
        }
        lines.extend(fragment.to_lines());
    }

    Ok(ExtractedDocument {
        title: title.unwrap_or_default(),
        markdown: assemble(&lines),
    })
}

/// Click every code toggle not already expanded, pausing after each click
/// so the source panel can render. Returns how many were clicked.
pub async fn expand_code_toggles<E: DocElement>(container: &E, cfg: &ExtractConfig) -> Result<usize> {
    let mut clicked = 0;
    for toggle in container.query_all(&cfg.toggle_selector).await? {
        if is_expanded(&toggle, cfg).await? {
            continue;
        }
        if let Err(e) = toggle.click().await {
            warn!("Code toggle click failed: {}", e);
            continue;
        }
        clicked += 1;
        tokio::time::sleep(cfg.settle_delay()).await;
    }
    Ok(clicked)
}

async fn is_expanded<E: DocElement>(toggle: &E, cfg: &ExtractConfig) -> Result<bool> {
    if toggle.has_class(&cfg.expanded_class).await? {
        return Ok(true);
    }
    Ok(toggle.attribute("aria-expanded").await?.as_deref() == Some("true"))
}

async fn read_child<E: DocElement>(el: &E) -> Result<Option<Fragment>> {
    let tag = el.tag_name().await?;
    if let Some(level) = heading_level(&tag) {
        let text = el.text().await?;
        return Ok((!text.is_empty()).then_some(Fragment::Heading { level, text }));
    }
    match tag.as_str() {
        "style" | "script" => Ok(None),
        "ul" => Ok(Some(Fragment::Bullets(list_items(el).await?))),
        "ol" => Ok(Some(Fragment::Numbered(list_items(el).await?))),
        "div" => read_div(el).await,
        _ => read_text(el).await,
    }
}

async fn list_items<E: DocElement>(el: &E) -> Result<Vec<String>> {
    let mut items = Vec::new();
    for child in el.children().await? {
        if child.tag_name().await? == "li" {
            items.push(child.text().await?);
        }
    }
    Ok(items)
}

/// A div is a story source panel if it holds a `pre`, an args table if it
/// holds a `table`, plain text otherwise.
async fn read_div<E: DocElement>(el: &E) -> Result<Option<Fragment>> {
    if let Some(pre) = el.query("pre").await? {
        let code = pre.text().await?;
        if code.is_empty() {
            return Ok(None);
        }
        let title = match el.query("h3").await? {
            Some(h3) => Some(h3.text().await?),
            None => None,
        };
        return Ok(Some(Fragment::CodePanel { title, code }));
    }

    if let Some(table) = el.query("table").await? {
        return Ok(Some(Fragment::Props(read_props(&table).await?)));
    }

    read_text(el).await
}

async fn read_text<E: DocElement>(el: &E) -> Result<Option<Fragment>> {
    let text = el.text().await?;
    Ok((!text.is_empty()).then_some(Fragment::Text(text)))
}

async fn read_props<E: DocElement>(table: &E) -> Result<Vec<PropRow>> {
    let mut rows = Vec::new();
    for row in table.query_all("tbody tr").await? {
        match read_prop_row(&row).await {
            Ok(Some(r)) => rows.push(r),
            Ok(None) => debug!("Skipping props row with fewer than four cells"),
            Err(e) => debug!("Skipping unreadable props row: {}", e),
        }
    }
    Ok(rows)
}

/// Cells: name, description, default, control. Only `select` controls carry options.
async fn read_prop_row<E: DocElement>(row: &E) -> Result<Option<PropRow>> {
    let cells = row.query_all("td").await?;
    if cells.len() < 4 {
        return Ok(None);
    }

    let name = cells[0].text().await?;
    let description = cells[1].text().await?;
    let default = cells[2].text().await?;

    let mut options = Vec::new();
    if let Some(select) = cells[3].query("select").await? {
        for option in select.query_all("option").await? {
            let text = option.text().await?;
            let disabled = option.attribute("disabled").await?.is_some();
            if text.is_empty() || disabled || text.starts_with(PLACEHOLDER_OPTION) {
                continue;
            }
            options.push(text);
        }
    }

    Ok(Some(PropRow::new(&name, &description, &default, options)))
}

/// Relaxed mode for pages without a content container: first `h1` as the
/// title, every paragraph as the body. Missing pieces become empty strings.
pub async fn extract_fallback<E: DocElement>(root: &E) -> ExtractedDocument {
    let title = match root.query("h1").await {
        Ok(Some(h1)) => h1.text().await.unwrap_or_default(),
        _ => String::new(),
    };

    let mut paragraphs = Vec::new();
    for p in root.query_all("p").await.unwrap_or_default() {
        if let Ok(text) = p.text().await {
            if !text.is_empty() {
                paragraphs.push(text);
            }
        }
    }

    ExtractedDocument {
        title,
        markdown: assemble(&paragraphs),
    }
}
