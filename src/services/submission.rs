//! The submission orchestrator.
//!
//! Coordinates guard → validation → upload → insert (with the
//! schema-fallback retry) → user feedback, and keeps the submit control's
//! Idle/Loading flag honest on every exit path. All collaborators come in
//! as injected capabilities so the pipeline can run against the hosted
//! backend or against doubles.

use crate::attribution::AttributionContext;
use crate::backend::{KeyValueStore, ObjectStorage, RecordStore, UploadOptions};
use crate::errors::{self, ErrorKind, SubmitError, SubmitResult};
use crate::guard::{GuardVerdict, SubmitGuard};
use crate::models::draft::{FileAttachment, SubmissionDraft};
use crate::models::record::FormRecord;
use crate::models::upload::{UploadResult, generate_object_key};
use crate::notify::{NotificationKind, Notifier};
use crate::session::FormSession;
use crate::surface::{FormSurface, NO_FILE_CHOSEN};
use crate::validation::{self, FieldId};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bucket holding uploaded utility bills.
pub const UPLOAD_BUCKET: &str = "contas-de-luz";

/// Hosted table receiving submissions.
pub const CONTACTS_TABLE: &str = "formulario_contatos";

pub const SUCCESS_MESSAGE: &str = "Dados enviados com sucesso! Nossa equipe analisará sua conta \
                                   de luz e entrará em contato em até 1 dia útil.";

pub const DEGRADED_MESSAGE: &str = "Aviso: dados de atribuição não foram salvos. Rode as \
                                    migrações pendentes para ativá-los.";

/// Final state of one submit attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Full record persisted.
    Submitted,
    /// Base record persisted after the schema-fallback retry.
    SubmittedWithoutAttribution,
    /// A field failed validation; nothing was sent.
    Rejected(FieldId),
    /// Bot heuristics dropped the attempt. Deliberately silent.
    Dropped,
    /// The pipeline aborted.
    Failed(ErrorKind),
}

/// The hosted-backend halves the pipeline needs. Absent when credentials
/// were not provided; validation and attribution capture still work.
#[derive(Clone)]
pub struct Backend {
    pub storage: Arc<dyn ObjectStorage>,
    pub records: Arc<dyn RecordStore>,
}

enum Persisted {
    Full,
    Base,
}

pub struct SubmissionService {
    backend: Option<Backend>,
    attribution: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    surface: Arc<dyn FormSurface>,
    guard: SubmitGuard,
    bucket: String,
    table: String,
}

impl SubmissionService {
    pub fn new(
        backend: Option<Backend>,
        attribution: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        surface: Arc<dyn FormSurface>,
    ) -> Self {
        Self {
            backend,
            attribution,
            notifier,
            surface,
            guard: SubmitGuard::default(),
            bucket: UPLOAD_BUCKET.to_string(),
            table: CONTACTS_TABLE.to_string(),
        }
    }

    /// Handle one submit event end to end.
    pub async fn submit(
        &self,
        session: &FormSession,
        draft: &SubmissionDraft,
        honeypot_value: &str,
    ) -> SubmitOutcome {
        if let GuardVerdict::Drop(reason) = self.guard.evaluate(session, honeypot_value) {
            debug!(?reason, "submission dropped");
            return SubmitOutcome::Dropped;
        }

        if let Err(err) = validation::validate_form(draft) {
            self.notifier.notify(NotificationKind::Error, err.message);
            self.surface.focus_field(err.field);
            return SubmitOutcome::Rejected(err.field);
        }
        let Some(file) = draft.file.as_ref() else {
            // validate_form rejects a missing file before this point
            return SubmitOutcome::Rejected(FieldId::FileUpload);
        };

        self.surface.set_submitting(true);
        let result = self.run_pipeline(draft, file).await;
        self.surface.set_submitting(false);

        match result {
            Ok(Persisted::Full) => {
                info!("submission persisted");
                self.notifier.notify(NotificationKind::Success, SUCCESS_MESSAGE);
                self.reset_form();
                SubmitOutcome::Submitted
            }
            Ok(Persisted::Base) => {
                warn!("attribution columns missing; base record persisted");
                self.notifier.notify(NotificationKind::Warning, DEGRADED_MESSAGE);
                self.reset_form();
                SubmitOutcome::SubmittedWithoutAttribution
            }
            Err(err) => {
                let kind = errors::classify(&err);
                warn!(error = %err, ?kind, "submission failed");
                self.notifier.notify(NotificationKind::Error, kind.user_message());
                SubmitOutcome::Failed(kind)
            }
        }
    }

    async fn run_pipeline(
        &self,
        draft: &SubmissionDraft,
        file: &FileAttachment,
    ) -> SubmitResult<Persisted> {
        let Some(backend) = &self.backend else {
            return Err(SubmitError::NotConfigured);
        };

        let key = generate_object_key(&file.file_name);
        debug!(bucket = %self.bucket, key = %key, size = file.size_bytes(), "uploading attachment");
        backend
            .storage
            .upload(&self.bucket, &key, file, &UploadOptions::default())
            .await
            .map_err(SubmitError::Upload)?;

        let upload = UploadResult {
            original_file_name: file.file_name.clone(),
            storage_path: key.clone(),
            public_url: backend.storage.public_url(&self.bucket, &key),
        };
        debug!(url = %upload.public_url, "upload complete");

        let attribution = AttributionContext::load(self.attribution.as_ref());
        let record = FormRecord::from_parts(draft, &upload, &attribution);

        match backend.records.insert(&self.table, &[record.full_row()]).await {
            Ok(()) => Ok(Persisted::Full),
            Err(err) if errors::is_schema_mismatch(&err) => {
                debug!(error = %err, "retrying with base record shape");
                backend
                    .records
                    .insert(&self.table, &[record.base_row()])
                    .await
                    .map_err(SubmitError::Persistence)?;
                Ok(Persisted::Base)
            }
            Err(err) => Err(SubmitError::Persistence(err)),
        }
    }

    fn reset_form(&self) {
        self.surface.reset_fields();
        self.surface.set_file_label(NO_FILE_CHOSEN);
    }
}
