use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::utils::{is_documentation_path, normalize_base_url};

/// Storybook `index.json`. Entries keep the order the server sent them in.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Manifest {
    pub v: u32,
    pub entries: IndexMap<String, Entry>,
}

impl Manifest {
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    Docs(DocEntry),
    Story(StoryEntry),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocEntry {
    pub id: String,
    pub title: String,
    pub name: String,
    pub import_path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories_imports: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryEntry {
    pub id: String,
    pub title: String,
    pub name: String,
    pub import_path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_path: Option<String>,
}

impl Entry {
    pub fn id(&self) -> &str {
        match self {
            Entry::Docs(d) => &d.id,
            Entry::Story(s) => &s.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Entry::Docs(d) => &d.title,
            Entry::Story(s) => &s.title,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::Docs(d) => &d.name,
            Entry::Story(s) => &s.name,
        }
    }

    pub fn import_path(&self) -> &str {
        match self {
            Entry::Docs(d) => &d.import_path,
            Entry::Story(s) => &s.import_path,
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            Entry::Docs(d) => &d.tags,
            Entry::Story(s) => &s.tags,
        }
    }

    pub fn is_docs_type(&self) -> bool {
        matches!(self, Entry::Docs(_))
    }

    /// A docs page either by type or because it is backed by an `.mdx` file.
    /// Story-typed MDX entries show up in real manifests and are not components.
    pub fn is_documentation(&self) -> bool {
        self.is_docs_type() || is_documentation_path(self.import_path())
    }
}

pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Single GET; implemented by `reqwest::Client` and by test doubles.
pub trait HttpFetch {
    async fn fetch(&self, url: &str) -> Result<HttpResponse>;
}

impl HttpFetch for reqwest::Client {
    async fn fetch(&self, url: &str) -> Result<HttpResponse> {
        let transport = |source| Error::Transport {
            url: url.to_string(),
            source,
        };
        let res = self.get(url).send().await.map_err(transport)?;
        let status = res.status();
        let body = res.text().await.map_err(transport)?;
        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

/// Fetch `<base>/index.json`. No retries; a non-2xx answer fails immediately.
pub async fn fetch_manifest(http: &impl HttpFetch, base_url: &str) -> Result<Manifest> {
    let base = normalize_base_url(base_url)?;
    let url = format!("{}index.json", base);

    info!("Fetching Storybook index: {}", url);
    let res = http.fetch(&url).await?;
    if !res.is_success() {
        error!("Failed to fetch {}: {} {}", url, res.status, res.reason);
        return Err(Error::Fetch {
            url,
            status: res.status,
            reason: res.reason,
        });
    }

    let manifest: Manifest =
        serde_json::from_str(&res.body).map_err(|source| Error::Decode { url, source })?;
    debug!(
        "Fetched Storybook index v={} with {} entries",
        manifest.v,
        manifest.entries.len()
    );
    Ok(manifest)
}
