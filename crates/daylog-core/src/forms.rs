//! Field validation for template and log-entry form submissions.
//!
//! The routing layer hands over raw named fields; validation either produces
//! a typed draft ready for persistence or a rejection carrying the per-field
//! messages AND the original submitted values, so the form can be
//! re-presented with the user's input intact. Rejection is a value, not an
//! error: no partial write happens and the caller keeps serving requests.

use serde::{Deserialize, Serialize};

use crate::repeat::{RepeatSet, Weekday};

/// Raw template form fields, pre-split by the routing collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateForm {
    /// Submitted title, if the field was present.
    pub title: Option<String>,
    /// Submitted description, if the field was present.
    pub description: Option<String>,
    /// One token per checked repeat checkbox.
    pub repeat: Vec<String>,
    /// Submitted sequence, still a string.
    pub sequence: Option<String>,
}

/// Per-field validation messages for a template form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TemplateFieldErrors {
    /// Message for the title field, if invalid.
    pub title: Option<String>,
    /// Message for the repeat fieldset, if invalid.
    pub repeat: Option<String>,
    /// Message for the sequence field, if invalid.
    pub sequence: Option<String>,
}

impl TemplateFieldErrors {
    /// Whether every field passed.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.repeat.is_none() && self.sequence.is_none()
    }
}

/// A validated template ready to be persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplateDraft {
    /// Non-blank title.
    pub title: String,
    /// Description, blank input normalized to `None`.
    pub description: Option<String>,
    /// Weekday recurrence set.
    pub repeat: RepeatSet,
    /// Manual sort key. Need not be contiguous.
    pub sequence: i64,
}

/// Outcome of validating a template submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum TemplateSubmission {
    /// All fields valid.
    Accepted(TemplateDraft),
    /// At least one field invalid; the original input is echoed back.
    Rejected {
        /// The fields exactly as submitted.
        fields: TemplateForm,
        /// Per-field messages.
        errors: TemplateFieldErrors,
    },
}

/// Validate a template form.
pub fn validate_template(form: TemplateForm) -> TemplateSubmission {
    let errors = TemplateFieldErrors {
        title: validate_title(form.title.as_deref()),
        repeat: validate_repeat(&form.repeat),
        sequence: validate_sequence(form.sequence.as_deref()),
    };

    if !errors.is_empty() {
        return TemplateSubmission::Rejected {
            fields: form,
            errors,
        };
    }

    // Checked above; the unwraps cannot fire.
    let title = form.title.map(|t| t.trim().to_owned()).unwrap_or_default();
    let repeat: RepeatSet = form
        .repeat
        .iter()
        .filter_map(|token| Weekday::from_token(token))
        .collect();
    let sequence = form
        .sequence
        .as_deref()
        .map(str::trim)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    TemplateSubmission::Accepted(TemplateDraft {
        title,
        description: normalize_description(form.description),
        repeat,
        sequence,
    })
}

/// Raw log-entry form fields. Entries have no repeat pattern.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryForm {
    /// Submitted title, if the field was present.
    pub title: Option<String>,
    /// Submitted description, if the field was present.
    pub description: Option<String>,
    /// Submitted sequence, still a string.
    pub sequence: Option<String>,
}

/// Per-field validation messages for an entry form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EntryFieldErrors {
    /// Message for the title field, if invalid.
    pub title: Option<String>,
    /// Message for the sequence field, if invalid.
    pub sequence: Option<String>,
}

impl EntryFieldErrors {
    /// Whether every field passed.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.sequence.is_none()
    }
}

/// A validated log entry ready to be persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryDraft {
    /// Non-blank title.
    pub title: String,
    /// Description, blank input normalized to `None`.
    pub description: Option<String>,
    /// Manual sort key within the daily log.
    pub sequence: i64,
}

/// Outcome of validating an entry submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum EntrySubmission {
    /// All fields valid.
    Accepted(EntryDraft),
    /// At least one field invalid; the original input is echoed back.
    Rejected {
        /// The fields exactly as submitted.
        fields: EntryForm,
        /// Per-field messages.
        errors: EntryFieldErrors,
    },
}

/// Validate a log-entry form.
pub fn validate_entry(form: EntryForm) -> EntrySubmission {
    let errors = EntryFieldErrors {
        title: validate_title(form.title.as_deref()),
        sequence: validate_sequence(form.sequence.as_deref()),
    };

    if !errors.is_empty() {
        return EntrySubmission::Rejected {
            fields: form,
            errors,
        };
    }

    let title = form.title.map(|t| t.trim().to_owned()).unwrap_or_default();
    let sequence = form
        .sequence
        .as_deref()
        .map(str::trim)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    EntrySubmission::Accepted(EntryDraft {
        title,
        description: normalize_description(form.description),
        sequence,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Field rules
// ─────────────────────────────────────────────────────────────────────────────

fn validate_title(title: Option<&str>) -> Option<String> {
    match title {
        Some(t) if !t.trim().is_empty() => None,
        _ => Some("Title is too short".to_owned()),
    }
}

fn validate_repeat(tokens: &[String]) -> Option<String> {
    if tokens.iter().all(|t| Weekday::from_token(t).is_some()) {
        None
    } else {
        Some("Invalid value for \"repeat\"".to_owned())
    }
}

fn validate_sequence(sequence: Option<&str>) -> Option<String> {
    match sequence {
        Some(s) if s.trim().parse::<i64>().is_ok() => None,
        _ => Some("Sequence must be a valid number".to_owned()),
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_owned())
        .filter(|d| !d.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> TemplateForm {
        TemplateForm {
            title: Some("Plan the day".to_owned()),
            description: Some("Over breakfast".to_owned()),
            repeat: vec!["mo".to_owned(), "we".to_owned()],
            sequence: Some("10".to_owned()),
        }
    }

    // ── template acceptance ──────────────────────────────────────────────

    #[test]
    fn accepts_valid_template() {
        let TemplateSubmission::Accepted(draft) = validate_template(valid_form()) else {
            panic!("expected acceptance");
        };
        assert_eq!(draft.title, "Plan the day");
        assert_eq!(draft.description.as_deref(), Some("Over breakfast"));
        assert_eq!(draft.repeat.encode(), "mo,we");
        assert_eq!(draft.sequence, 10);
    }

    #[test]
    fn accepts_empty_repeat_selection() {
        let form = TemplateForm {
            repeat: vec![],
            ..valid_form()
        };
        let TemplateSubmission::Accepted(draft) = validate_template(form) else {
            panic!("expected acceptance");
        };
        assert!(draft.repeat.is_empty());
    }

    #[test]
    fn trims_title_whitespace() {
        let form = TemplateForm {
            title: Some("  Padded  ".to_owned()),
            ..valid_form()
        };
        let TemplateSubmission::Accepted(draft) = validate_template(form) else {
            panic!("expected acceptance");
        };
        assert_eq!(draft.title, "Padded");
    }

    #[test]
    fn blank_description_becomes_none() {
        let form = TemplateForm {
            description: Some("   ".to_owned()),
            ..valid_form()
        };
        let TemplateSubmission::Accepted(draft) = validate_template(form) else {
            panic!("expected acceptance");
        };
        assert!(draft.description.is_none());
    }

    #[test]
    fn duplicate_repeat_tokens_collapse() {
        let form = TemplateForm {
            repeat: vec!["mo".to_owned(), "mo".to_owned()],
            ..valid_form()
        };
        let TemplateSubmission::Accepted(draft) = validate_template(form) else {
            panic!("expected acceptance");
        };
        assert_eq!(draft.repeat.len(), 1);
    }

    #[test]
    fn negative_sequence_is_numeric() {
        let form = TemplateForm {
            sequence: Some("-5".to_owned()),
            ..valid_form()
        };
        let TemplateSubmission::Accepted(draft) = validate_template(form) else {
            panic!("expected acceptance");
        };
        assert_eq!(draft.sequence, -5);
    }

    // ── template rejection ───────────────────────────────────────────────

    #[test]
    fn rejects_missing_title() {
        let form = TemplateForm {
            title: None,
            ..valid_form()
        };
        let TemplateSubmission::Rejected { errors, .. } = validate_template(form) else {
            panic!("expected rejection");
        };
        assert_eq!(errors.title.as_deref(), Some("Title is too short"));
        assert!(errors.repeat.is_none());
        assert!(errors.sequence.is_none());
    }

    #[test]
    fn rejects_blank_title() {
        let form = TemplateForm {
            title: Some("   ".to_owned()),
            ..valid_form()
        };
        let TemplateSubmission::Rejected { errors, .. } = validate_template(form) else {
            panic!("expected rejection");
        };
        assert!(errors.title.is_some());
    }

    #[test]
    fn rejects_invalid_repeat_token() {
        let form = TemplateForm {
            repeat: vec!["mo".to_owned(), "xx".to_owned()],
            ..valid_form()
        };
        let TemplateSubmission::Rejected { errors, .. } = validate_template(form) else {
            panic!("expected rejection");
        };
        assert_eq!(errors.repeat.as_deref(), Some("Invalid value for \"repeat\""));
    }

    #[test]
    fn rejects_non_numeric_sequence() {
        let form = TemplateForm {
            sequence: Some("ten".to_owned()),
            ..valid_form()
        };
        let TemplateSubmission::Rejected { errors, .. } = validate_template(form) else {
            panic!("expected rejection");
        };
        assert_eq!(
            errors.sequence.as_deref(),
            Some("Sequence must be a valid number")
        );
    }

    #[test]
    fn rejects_missing_sequence() {
        let form = TemplateForm {
            sequence: None,
            ..valid_form()
        };
        assert!(matches!(
            validate_template(form),
            TemplateSubmission::Rejected { .. }
        ));
    }

    #[test]
    fn rejection_echoes_submitted_fields() {
        let form = TemplateForm {
            title: Some("".to_owned()),
            description: Some("keep me".to_owned()),
            repeat: vec!["we".to_owned()],
            sequence: Some("abc".to_owned()),
        };
        let TemplateSubmission::Rejected { fields, errors } = validate_template(form.clone())
        else {
            panic!("expected rejection");
        };
        assert_eq!(fields, form);
        assert!(errors.title.is_some());
        assert!(errors.sequence.is_some());
    }

    #[test]
    fn collects_all_field_errors_at_once() {
        let form = TemplateForm {
            title: None,
            description: None,
            repeat: vec!["bogus".to_owned()],
            sequence: Some("NaN".to_owned()),
        };
        let TemplateSubmission::Rejected { errors, .. } = validate_template(form) else {
            panic!("expected rejection");
        };
        assert!(errors.title.is_some());
        assert!(errors.repeat.is_some());
        assert!(errors.sequence.is_some());
    }

    // ── entries ──────────────────────────────────────────────────────────

    #[test]
    fn accepts_valid_entry() {
        let form = EntryForm {
            title: Some("One-off errand".to_owned()),
            description: None,
            sequence: Some("30".to_owned()),
        };
        let EntrySubmission::Accepted(draft) = validate_entry(form) else {
            panic!("expected acceptance");
        };
        assert_eq!(draft.title, "One-off errand");
        assert!(draft.description.is_none());
        assert_eq!(draft.sequence, 30);
    }

    #[test]
    fn entry_rejection_echoes_fields() {
        let form = EntryForm {
            title: None,
            description: Some("still here".to_owned()),
            sequence: Some("0".to_owned()),
        };
        let EntrySubmission::Rejected { fields, errors } = validate_entry(form.clone()) else {
            panic!("expected rejection");
        };
        assert_eq!(fields, form);
        assert!(errors.title.is_some());
        assert!(errors.sequence.is_none());
    }
}
