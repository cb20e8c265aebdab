//! The in-flight submission draft, assembled from the form at submit time.

use bytes::Bytes;

/// A file attached to the form (the utility bill).
#[derive(Clone, Debug)]
pub struct FileAttachment {
    /// Original file name as chosen by the user.
    pub file_name: String,

    /// MIME type reported for the file.
    pub content_type: String,

    /// Raw content.
    pub bytes: Bytes,
}

impl FileAttachment {
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Form fields captured at submit time.
///
/// Never persisted directly. The orchestrator turns a draft into a
/// `FormRecord` once the upload has succeeded.
#[derive(Clone, Debug, Default)]
pub struct SubmissionDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub file: Option<FileAttachment>,
}
