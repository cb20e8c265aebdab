//! Pure field validators and the phone formatter.
//!
//! Each validator checks one field and reports the first violated rule with
//! its user-facing message; `validate_form` runs them in fixed order and
//! short-circuits. None of them touch the notifier or the form surface;
//! the orchestrator owns that side effect.

use crate::models::draft::{FileAttachment, SubmissionDraft};
use regex::Regex;
use std::sync::LazyLock;

/// Accepted MIME types for the utility bill.
pub const ALLOWED_TYPES: [&str; 4] = [
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
];

/// Narrower whitelist re-checked for anything labeled `image/*`.
const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// Upload size ceiling.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

// Permissive local@domain.tld shape; full RFC validation is not the goal.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Form fields a validation failure can point at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldId {
    Name,
    Email,
    Phone,
    FileUpload,
}

impl FieldId {
    /// Control identifier on the form.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldId::Name => "name",
            FieldId::Email => "email",
            FieldId::Phone => "phone",
            FieldId::FileUpload => "file-upload",
        }
    }
}

/// First violated rule for a field, with its user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldId,
    pub message: &'static str,
}

fn fail(field: FieldId, message: &'static str) -> Result<(), FieldError> {
    Err(FieldError { field, message })
}

pub fn validate_name(name: &str) -> Result<(), FieldError> {
    if name.trim().chars().count() < 2 {
        return fail(
            FieldId::Name,
            "Nome completo é obrigatório (mínimo 2 caracteres).",
        );
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), FieldError> {
    if email.is_empty() {
        return fail(FieldId::Email, "E-mail é obrigatório.");
    }
    if !EMAIL_RE.is_match(email) {
        return fail(FieldId::Email, "Por favor, insira um e-mail válido.");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), FieldError> {
    if phone.is_empty() {
        return fail(FieldId::Phone, "WhatsApp é obrigatório.");
    }
    if digits_of(phone).len() < 10 {
        return fail(
            FieldId::Phone,
            "Por favor, insira um número de WhatsApp válido.",
        );
    }
    Ok(())
}

pub fn validate_file(file: Option<&FileAttachment>) -> Result<(), FieldError> {
    let Some(file) = file else {
        return fail(
            FieldId::FileUpload,
            "A conta de luz é obrigatória! Precisamos da sua fatura para calcular a economia.",
        );
    };
    if !ALLOWED_TYPES.contains(&file.content_type.as_str()) {
        return fail(
            FieldId::FileUpload,
            "Tipo de arquivo inválido. Use apenas PDF, JPG ou PNG para sua conta de luz.",
        );
    }
    if file.size_bytes() > MAX_FILE_BYTES {
        return fail(
            FieldId::FileUpload,
            "Arquivo muito grande. O tamanho máximo é 10MB.",
        );
    }
    if file.content_type.starts_with("image/")
        && !ALLOWED_IMAGE_TYPES.contains(&file.content_type.as_str())
    {
        return fail(
            FieldId::FileUpload,
            "Formato de imagem inválido. Use JPG ou PNG.",
        );
    }
    Ok(())
}

/// Run all field checks in fixed order (name, email, phone, file) and stop
/// at the first failure.
pub fn validate_form(draft: &SubmissionDraft) -> Result<(), FieldError> {
    validate_name(&draft.name)?;
    validate_email(&draft.email)?;
    validate_phone(&draft.phone)?;
    validate_file(draft.file.as_ref())?;
    Ok(())
}

fn digits_of(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize free-form input to the `(xx) xxxx-xxxx` (up to 10 digits) or
/// `(xx) xxxxx-xxxx` (11 digits) mask, progressively for partial input.
/// Digits beyond the eleventh are cut. Idempotent on formatted numbers.
pub fn format_phone(value: &str) -> String {
    let digits: String = digits_of(value).chars().take(11).collect();
    if digits.len() <= 2 {
        return digits;
    }
    let (area, rest) = digits.split_at(2);
    let split = if digits.len() == 11 { 5 } else { 4 };
    if rest.len() <= split {
        format!("({area}) {rest}")
    } else {
        format!("({area}) {}-{}", &rest[..split], &rest[split..])
    }
}
