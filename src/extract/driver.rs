use std::time::Duration;

use crate::error::Result;

/// What the extractor needs from an element handle of a live (or captured) page.
pub trait DocElement: Sized {
    /// Lowercase tag name.
    async fn tag_name(&self) -> Result<String>;

    /// Text content of the element and its descendants, trimmed.
    async fn text(&self) -> Result<String>;

    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    async fn has_class(&self, class: &str) -> Result<bool> {
        Ok(self
            .attribute("class")
            .await?
            .is_some_and(|c| c.split_whitespace().any(|c| c == class)))
    }

    /// Direct element children in document order.
    async fn children(&self) -> Result<Vec<Self>>;

    /// First descendant matching `selector`.
    async fn query(&self, selector: &str) -> Result<Option<Self>>;

    /// All descendants matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<Self>>;

    async fn click(&self) -> Result<()>;
}

/// A loaded page. Navigation and session lifetime belong to the caller.
pub trait DocPage {
    type Element: DocElement;

    fn url(&self) -> &str;

    /// Wait up to `timeout` for `selector` to appear. `None` when it never does.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<Option<Self::Element>>;

    async fn query(&self, selector: &str) -> Result<Option<Self::Element>>;

    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>>;
}
