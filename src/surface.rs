//! Seam to the form controls the orchestrator manipulates: focus, the
//! submit control's Idle/Loading flag, field reset, and the chosen-file
//! label.

use crate::validation::FieldId;

/// Label of the file picker when nothing is selected.
pub const NO_FILE_CHOSEN: &str = "Nenhum arquivo escolhido";

pub trait FormSurface: Send + Sync {
    /// Move focus to a field after its validation failed.
    fn focus_field(&self, field: FieldId);

    /// Toggle the submit control between Idle and Loading. While Loading the
    /// control is disabled, which is what prevents concurrent submissions.
    fn set_submitting(&self, submitting: bool);

    /// Clear every field after a successful submission.
    fn reset_fields(&self);

    /// Update the chosen-file label.
    fn set_file_label(&self, label: &str);
}

/// Terminal rendition of the form surface.
#[derive(Default)]
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        Self
    }
}

impl FormSurface for TerminalSurface {
    fn focus_field(&self, field: FieldId) {
        tracing::debug!(field = field.as_str(), "focus moved to failing field");
    }

    fn set_submitting(&self, submitting: bool) {
        if submitting {
            eprintln!("ENVIANDO...");
        }
    }

    fn reset_fields(&self) {
        tracing::debug!("form fields cleared");
    }

    fn set_file_label(&self, label: &str) {
        eprintln!("Arquivo: {label}");
    }
}
