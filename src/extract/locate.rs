use tracing::{debug, warn};

use super::driver::{DocElement, DocPage};
use super::ExtractConfig;
use crate::error::{Error, Result};

pub enum Located<E> {
    /// The content container, ready for the structured walk.
    Container(E),
    /// The docs root rendered without a content container.
    Fallback(E),
}

/// Wait for the docs root, then find the content container inside it.
///
/// The container is probed up to `probe_depth` levels deep (each level is the
/// first `div` child of the previous one); the first level with a direct `h1`
/// child wins, otherwise the shallowest one is used.
pub async fn locate_container<P: DocPage>(
    page: &P,
    cfg: &ExtractConfig,
) -> Result<Located<P::Element>> {
    let Some(root) = page.wait_for(&cfg.root_selector, cfg.wait_timeout()).await? else {
        return Err(Error::ContainerNotFound {
            url: page.url().to_string(),
            selector: cfg.root_selector.clone(),
        });
    };

    let Some(content) = root.query(&cfg.content_selector).await? else {
        warn!(
            "No '{}' under '{}' at {}, falling back to headings and paragraphs",
            cfg.content_selector,
            cfg.root_selector,
            page.url()
        );
        return Ok(Located::Fallback(root));
    };

    let mut levels = vec![content];
    while levels.len() < cfg.probe_depth.max(1) {
        let Some(last) = levels.last() else { break };
        let next = first_div_child(last).await?;
        match next {
            Some(next) => levels.push(next),
            None => break,
        }
    }

    let mut pick = 0;
    for (depth, level) in levels.iter().enumerate() {
        if has_h1_child(level).await? {
            pick = depth;
            break;
        }
    }
    debug!("Docs container at depth {} of {}", pick, levels.len());
    Ok(Located::Container(levels.swap_remove(pick)))
}

async fn first_div_child<E: DocElement>(el: &E) -> Result<Option<E>> {
    for child in el.children().await? {
        if child.tag_name().await? == "div" {
            return Ok(Some(child));
        }
    }
    Ok(None)
}

async fn has_h1_child<E: DocElement>(el: &E) -> Result<bool> {
    for child in el.children().await? {
        if child.tag_name().await? == "h1" {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::snapshot::{el, SnapshotPage};

    fn page(content: impl Into<crate::extract::snapshot::SnapshotNode>) -> SnapshotPage {
        SnapshotPage::new(
            "https://x/sb/iframe.html?id=button--docs",
            el("body")
                .child(el("div").attr("id", "storybook-docs").child(content))
                .build(),
        )
    }

    async fn first_text(located: Located<crate::extract::snapshot::SnapshotNode>) -> String {
        match located {
            Located::Container(c) => c.children().await.unwrap()[0].text().await.unwrap(),
            Located::Fallback(_) => panic!("expected a container"),
        }
    }

    #[tokio::test]
    async fn missing_root_is_fatal_and_names_the_url() {
        let p = SnapshotPage::new("https://x/sb/page", el("body").child(el("p").text("hi")).build());
        let err = locate_container(&p, &ExtractConfig::default()).await.err().unwrap();
        match err {
            Error::ContainerNotFound { url, selector } => {
                assert_eq!(url, "https://x/sb/page");
                assert_eq!(selector, "#storybook-docs");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn root_without_content_falls_back() {
        let p = page(el("h1").text("Loose"));
        let located = locate_container(&p, &ExtractConfig::default()).await.unwrap();
        assert!(matches!(located, Located::Fallback(_)));
    }

    #[tokio::test]
    async fn probes_nested_levels_for_an_h1() {
        let content = el("div").class("sbdocs sbdocs-content").child(
            el("div").child(el("div").child(el("h1").text("Deep")).child(el("p").text("x"))),
        );
        let located = locate_container(&page(content), &ExtractConfig::default()).await.unwrap();
        assert_eq!(first_text(located).await, "Deep");
    }

    #[tokio::test]
    async fn shallowest_level_when_no_h1_anywhere() {
        let content = el("div")
            .class("sbdocs sbdocs-content")
            .child(el("p").text("Top"))
            .child(el("div").child(el("p").text("Nested")));
        let located = locate_container(&page(content), &ExtractConfig::default()).await.unwrap();
        assert_eq!(first_text(located).await, "Top");
    }

    #[tokio::test]
    async fn probe_depth_is_configurable() {
        let content = el("div").class("sbdocs sbdocs-content").child(
            el("div").child(el("div").child(el("h1").text("Deep"))),
        );
        let cfg = ExtractConfig {
            probe_depth: 2,
            ..Default::default()
        };
        let located = locate_container(&page(content), &cfg).await.unwrap();
        match located {
            Located::Container(c) => assert_eq!(c.children().await.unwrap()[0].tag_name().await.unwrap(), "div"),
            Located::Fallback(_) => panic!("expected a container"),
        }
    }
}
