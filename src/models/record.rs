//! Wire rows for the hosted `formulario_contatos` table.
//!
//! Two shapes exist: the full row with attribution columns, and the base
//! fallback used when the hosted table predates the attribution migration.
//! Column names are the table's own (pt-BR).

use crate::attribution::AttributionContext;
use crate::models::draft::SubmissionDraft;
use crate::models::upload::UploadResult;
use serde::Serialize;
use serde_json::{Value, json};

/// A submission ready for insertion.
///
/// Serializing the struct yields the full row; `base_row` derives the
/// reduced fallback shape from the same data.
#[derive(Clone, Debug, Serialize)]
pub struct FormRecord {
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub arquivo_nome: String,
    pub arquivo_url: String,
    pub arquivo_path: String,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
    pub referrer: Option<String>,
}

impl FormRecord {
    pub fn from_parts(
        draft: &SubmissionDraft,
        upload: &UploadResult,
        attribution: &AttributionContext,
    ) -> Self {
        Self {
            nome: draft.name.clone(),
            email: draft.email.clone(),
            telefone: draft.phone.clone(),
            arquivo_nome: upload.original_file_name.clone(),
            arquivo_url: upload.public_url.clone(),
            arquivo_path: upload.storage_path.clone(),
            utm_source: attribution.utm_source.clone(),
            utm_medium: attribution.utm_medium.clone(),
            utm_campaign: attribution.utm_campaign.clone(),
            utm_term: attribution.utm_term.clone(),
            utm_content: attribution.utm_content.clone(),
            referrer: attribution.referrer.clone(),
        }
    }

    /// Full row: every column, absent attribution values as explicit nulls.
    pub fn full_row(&self) -> Value {
        json!({
            "nome": self.nome,
            "email": self.email,
            "telefone": self.telefone,
            "arquivo_nome": self.arquivo_nome,
            "arquivo_url": self.arquivo_url,
            "arquivo_path": self.arquivo_path,
            "utm_source": self.utm_source,
            "utm_medium": self.utm_medium,
            "utm_campaign": self.utm_campaign,
            "utm_term": self.utm_term,
            "utm_content": self.utm_content,
            "referrer": self.referrer,
        })
    }

    /// Fallback row for tables without the attribution migration. The
    /// storage path column shipped in that same migration, so it is dropped
    /// here as well.
    pub fn base_row(&self) -> Value {
        json!({
            "nome": self.nome,
            "email": self.email,
            "telefone": self.telefone,
            "arquivo_nome": self.arquivo_nome,
            "arquivo_url": self.arquivo_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FormRecord {
        FormRecord {
            nome: "Maria Silva".into(),
            email: "maria@example.com".into(),
            telefone: "(11) 98765-4321".into(),
            arquivo_nome: "conta.pdf".into(),
            arquivo_url: "https://proj.supabase.co/storage/v1/object/public/contas-de-luz/1-a.pdf"
                .into(),
            arquivo_path: "1-a.pdf".into(),
            utm_source: Some("fb".into()),
            utm_medium: None,
            utm_campaign: Some("x".into()),
            utm_term: None,
            utm_content: None,
            referrer: None,
        }
    }

    #[test]
    fn test_full_row_matches_serialized_record() {
        let record = sample();
        assert_eq!(serde_json::to_value(&record).unwrap(), record.full_row());
    }

    #[test]
    fn test_full_row_keeps_absent_attribution_as_null() {
        let row = sample().full_row();
        assert_eq!(row["utm_source"], "fb");
        assert!(row["utm_medium"].is_null());
        assert!(row["referrer"].is_null());
    }

    #[test]
    fn test_base_row_has_no_attribution_columns() {
        let row = sample().base_row();
        let obj = row.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        assert!(!obj.contains_key("utm_source"));
        assert!(!obj.contains_key("arquivo_path"));
        assert_eq!(row["nome"], "Maria Silva");
        assert_eq!(row["arquivo_nome"], "conta.pdf");
    }
}
