/// Language label for story source panels.
const CODE_LANG: &str = "tsx";

/// A recognised piece of a docs page, already read out of the DOM.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Heading { level: u8, text: String },
    Bullets(Vec<String>),
    Numbered(Vec<String>),
    CodePanel { title: Option<String>, code: String },
    Props(Vec<PropRow>),
    Text(String),
}

/// One row of an args table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropRow {
    pub name: String,
    pub description: String,
    pub default: Option<String>,
    pub options: Vec<String>,
}

impl PropRow {
    /// `default` is dropped when the cell is empty or a bare `-`.
    pub fn new(name: &str, description: &str, default: &str, options: Vec<String>) -> Self {
        let default = default.trim();
        PropRow {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            default: (!default.is_empty() && default != "-").then(|| default.to_string()),
            options,
        }
    }

    fn to_bullet(&self) -> String {
        let mut parts = vec![if self.description.is_empty() {
            self.name.clone()
        } else {
            format!("{}: {}", self.name, self.description)
        }];
        if let Some(default) = &self.default {
            parts.push(format!("default: {}", default));
        }
        if !self.options.is_empty() {
            parts.push(format!("options: {}", self.options.join(" | ")));
        }
        format!("- {}", parts.join(" — "))
    }
}

impl Fragment {
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            Fragment::Heading { level, text } => {
                vec![format!("{} {}", "#".repeat((*level).clamp(1, 6) as usize), text)]
            }
            Fragment::Bullets(items) => items
                .iter()
                .filter(|i| !i.is_empty())
                .map(|i| format!("- {}", i))
                .collect(),
            Fragment::Numbered(items) => items
                .iter()
                .filter(|i| !i.is_empty())
                .enumerate()
                .map(|(n, i)| format!("{}. {}", n + 1, i))
                .collect(),
            Fragment::CodePanel { title, code } => {
                if code.is_empty() {
                    return Vec::new();
                }
                let mut lines = Vec::new();
                if let Some(title) = title.as_deref().filter(|t| !t.is_empty()) {
                    lines.push(format!("#### {}", title));
                }
                lines.push(format!("```{}\n{}\n```", CODE_LANG, code));
                lines
            }
            Fragment::Props(rows) => std::iter::once("**Props**".to_string())
                .chain(rows.iter().map(PropRow::to_bullet))
                .collect(),
            Fragment::Text(t) if t.is_empty() => Vec::new(),
            Fragment::Text(t) => vec![t.clone()],
        }
    }
}

/// Heading level for `h1`..`h6`.
pub fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Markdown body: every emitted line separated by a blank line.
pub fn assemble(lines: &[String]) -> String {
    lines.join("\n\n")
}
