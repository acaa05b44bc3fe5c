//! Derives the lead "create new" intent from what the user has typed

use super::types::{Intent, extname};

/// Map typed input onto the lead intent. Input is trimmed first.
pub(crate) fn plan(input: &str, default_extension: &str) -> Intent {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Intent::CreateRandomDefaultExt;
    }
    if is_extension_token(trimmed) {
        return Intent::CreateRandomWithExt(trimmed.to_string());
    }
    Intent::CreateNamed(with_default_extension(trimmed, default_extension))
}

/// `.md`, `.tar.gz` and the like: a bare extension asking for a random name
pub(crate) fn is_extension_token(trimmed: &str) -> bool {
    trimmed.starts_with('.') && trimmed.len() > 1
}

/// Append `default_extension` unless the name already carries one
pub(crate) fn with_default_extension(name: &str, default_extension: &str) -> String {
    if extname(name).is_empty() {
        format!("{name}{default_extension}")
    } else {
        name.to_string()
    }
}

/// Display label of the lead candidate for an intent
pub(crate) fn lead_label(intent: &Intent, default_extension: &str) -> (String, Option<String>) {
    match intent {
        Intent::CreateRandomDefaultExt => (
            "New file with random name".to_string(),
            Some(format!("Extension: {default_extension}")),
        ),
        Intent::CreateRandomWithExt(ext) => {
            (format!("New random file with extension: {ext}"), None)
        }
        Intent::CreateNamed(name) => (format!("Create file: {name}"), None),
        Intent::OpenOrRecreate { path, .. } => (path.clone(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_empty_input() {
        assert_eq!(plan("", ".txt"), Intent::CreateRandomDefaultExt);
        assert_eq!(plan("   ", ".txt"), Intent::CreateRandomDefaultExt);
    }

    #[test]
    fn test_plan_extension_token() {
        assert_eq!(plan(".md", ".txt"), Intent::CreateRandomWithExt(".md".into()));
        assert_eq!(plan("  .rs ", ".txt"), Intent::CreateRandomWithExt(".rs".into()));
    }

    #[test]
    fn test_plan_single_dot_is_a_name() {
        assert_eq!(plan(".", ".txt"), Intent::CreateNamed("..txt".into()));
    }

    #[test]
    fn test_plan_named_without_extension() {
        assert_eq!(plan("notes", ".txt"), Intent::CreateNamed("notes.txt".into()));
    }

    #[test]
    fn test_plan_named_keeps_existing_extension() {
        assert_eq!(plan("notes.md", ".txt"), Intent::CreateNamed("notes.md".into()));
    }

    #[test]
    fn test_lead_labels() {
        let (label, desc) = lead_label(&Intent::CreateRandomDefaultExt, ".txt");
        assert_eq!(label, "New file with random name");
        assert_eq!(desc.as_deref(), Some("Extension: .txt"));

        let (label, _) = lead_label(&plan("notes", ".md"), ".md");
        assert_eq!(label, "Create file: notes.md");

        let (label, _) = lead_label(&plan(".json", ".txt"), ".txt");
        assert_eq!(label, "New random file with extension: .json");
    }
}
