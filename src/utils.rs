use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_]+").unwrap());

const DOCUMENTATION_EXT: &str = ".mdx";

/// Trim the base URL and make sure it ends with exactly one `/`.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if raw.trim().is_empty() {
        return Err(Error::Configuration("storybook base URL is empty".into()));
    }
    Ok(format!("{}/", trimmed))
}

/// "UI-Library/Code/CodeBlockWithTabs" → "ui-library-code-codeblockwithtabs".
/// Only `/`, whitespace and underscores separate words; camelCase stays intact.
pub fn base_id_from_title(title: &str) -> String {
    title
        .split('/')
        .map(normalize_segment)
        .collect::<Vec<_>>()
        .join("-")
}

fn normalize_segment(segment: &str) -> String {
    SEPARATOR_RE
        .replace_all(segment.trim(), "-")
        .to_lowercase()
}

/// Group part of a `<group>--<variant>` entry id.
pub fn component_id_from_entry_id(id: &str) -> &str {
    id.split_once("--").map(|(group, _)| group).unwrap_or(id)
}

pub fn is_documentation_path(import_path: &str) -> bool {
    import_path.to_lowercase().ends_with(DOCUMENTATION_EXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_id_dash_cases_segments() {
        assert_eq!(
            base_id_from_title("UI-Library/Code/CodeBlockWithTabs"),
            "ui-library-code-codeblockwithtabs"
        );
        assert_eq!(base_id_from_title("Design Tokens/Icons"), "design-tokens-icons");
    }

    #[test]
    fn base_id_collapses_whitespace_and_underscores() {
        assert_eq!(base_id_from_title("  Forms /Text__Input  Field"), "forms-text-input-field");
        assert_eq!(base_id_from_title("a _ b"), "a-b");
    }

    #[test]
    fn base_id_is_stable_when_rederived() {
        for title in ["UI-Library/Code/CodeBlockWithTabs", "Design Tokens/Icons", "My_Thing/Sub Part"] {
            let once = base_id_from_title(title);
            assert_eq!(base_id_from_title(&once), once);
            assert_eq!(base_id_from_title(&title.to_uppercase()), once);
        }
    }

    #[test]
    fn base_url_gets_one_trailing_slash() {
        assert_eq!(normalize_base_url("https://x/sb").unwrap(), "https://x/sb/");
        assert_eq!(normalize_base_url(" https://x/sb/ ").unwrap(), "https://x/sb/");
        assert_eq!(normalize_base_url("https://x/sb//").unwrap(), "https://x/sb/");
    }

    #[test]
    fn empty_base_url_is_a_configuration_error() {
        assert!(matches!(normalize_base_url("   "), Err(Error::Configuration(_))));
    }

    #[test]
    fn entry_id_group_prefix() {
        assert_eq!(component_id_from_entry_id("components-button--primary"), "components-button");
        assert_eq!(component_id_from_entry_id("standalone"), "standalone");
    }

    #[test]
    fn documentation_suffix_is_case_insensitive() {
        assert!(is_documentation_path("./src/Intro.MDX"));
        assert!(!is_documentation_path("./src/Button.stories.tsx"));
    }
}
