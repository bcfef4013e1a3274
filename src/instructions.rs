use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructions {
    #[serde(rename = "storybookCSF3")]
    pub storybook_csf3: Csf3,
    pub component_best_practices: Vec<&'static str>,
    pub story_linking: StoryLinking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_building_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Csf3 {
    pub format: &'static str,
    pub example: &'static str,
    pub notes: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryLinking {
    pub requirement: &'static str,
    pub pattern: &'static str,
    pub example: &'static str,
}

/// House rules for building components and stories, plus whatever the
/// deployment adds on top.
pub fn ui_building_instructions(extra: Option<&str>) -> Instructions {
    Instructions {
        storybook_csf3: Csf3 {
            format: "Use CSF3 with default export meta and named stories.",
            example: "export default { title: 'Components/Button', component: Button }; export const Primary = { args: { variant: 'primary' } };",
            notes: vec![
                "Name stories with PascalCase matching export names.",
                "Prefer args for state; avoid decorators unless necessary.",
            ],
        },
        component_best_practices: vec![
            "Keep components pure; move side-effects outside.",
            "Type props with clear interfaces and sensible defaults.",
            "Document props via JSDoc or TSDoc annotations.",
        ],
        story_linking: StoryLinking {
            requirement: "Every story must be linkable via Storybook URL.",
            pattern: "?path=/story/<group>--<story-name>",
            example: "https://apify.github.io/apify-core/storybook-shared/?path=/story/components-button--primary",
        },
        additional_building_instructions: extra
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    }
}

impl Instructions {
    pub fn to_markdown(&self) -> String {
        let csf = &self.storybook_csf3;
        let link = &self.story_linking;

        let mut lines = vec![
            "# UI Building Instructions".to_string(),
            String::new(),
            "**Storybook CSF3**".to_string(),
            format!("- **Format:** {}", csf.format),
            "- **Example:**".to_string(),
            "```ts".to_string(),
            csf.example.to_string(),
            "```".to_string(),
            "- **Notes:**".to_string(),
        ];
        lines.extend(csf.notes.iter().map(|n| format!("  - {}", n)));
        lines.push(String::new());
        lines.push("**Component Best Practices**".to_string());
        lines.extend(self.component_best_practices.iter().map(|p| format!("- {}", p)));
        lines.push(String::new());
        lines.push("**Story Linking**".to_string());
        lines.push(format!("- **Requirement:** {}", link.requirement));
        lines.push(format!("- **Pattern:** `{}`", link.pattern));
        lines.push(format!("- **Example:** [components-button--primary]({})", link.example));
        if let Some(extra) = &self.additional_building_instructions {
            lines.push(String::new());
            lines.push("**Additional Instructions**".to_string());
            lines.push(extra.clone());
        }
        lines.push(String::new());
        lines.join("\n")
    }
}
