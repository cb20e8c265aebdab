use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod attribution;
mod backend;
mod config;
mod errors;
mod guard;
mod models;
mod notify;
mod services;
mod session;
mod surface;
mod validation;

use backend::file_store::FileStore;
use backend::supabase::SupabaseClient;
use models::draft::{FileAttachment, SubmissionDraft};
use notify::NotificationCenter;
use services::submission::{Backend, SubmissionService, SubmitOutcome};
use surface::{FormSurface, TerminalSurface};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config ---
    let cfg = config::AppConfig::from_env_and_args();
    tracing::info!(url = %cfg.supabase_url, data_dir = %cfg.data_dir, "starting lead-intake");

    // --- Durable client storage ---
    let store = Arc::new(FileStore::open(
        Path::new(&cfg.data_dir).join("attribution.json"),
    )?);

    // --- Capture attribution for this page load ---
    let page = attribution::PageContext {
        url: cfg.page_url.clone().unwrap_or_default(),
        referrer: cfg.referrer.clone(),
    };
    let changed = attribution::capture_and_persist(&page, store.as_ref());
    tracing::debug!(changed, "attribution capture complete");

    // --- Session starts when the form opens ---
    let session = session::FormSession::start();

    // --- Hosted backend client ---
    let backend = SupabaseClient::from_config(&cfg).map(|client| {
        let client = Arc::new(client);
        Backend {
            storage: client.clone(),
            records: client,
        }
    });
    if backend.is_none() {
        tracing::warn!("supabase credentials missing; submissions will fail until configured");
    }

    let notifier = Arc::new(NotificationCenter::new());
    let surface = Arc::new(TerminalSurface::new());
    let service = SubmissionService::new(backend, store, notifier, surface.clone());

    // --- Interactive form ---
    let draft = read_draft(surface.as_ref()).await?;
    let outcome = service.submit(&session, &draft, "").await;

    match outcome {
        SubmitOutcome::Submitted | SubmitOutcome::SubmittedWithoutAttribution => Ok(()),
        // Dropped attempts are indistinguishable from success by design.
        SubmitOutcome::Dropped => Ok(()),
        SubmitOutcome::Rejected(_) | SubmitOutcome::Failed(_) => std::process::exit(1),
    }
}

/// Prompt the submission fields on the terminal, mirroring the page form.
async fn read_draft(surface: &TerminalSurface) -> Result<SubmissionDraft> {
    let name = prompt("Nome completo")?;
    let email = prompt("E-mail")?;
    let phone = validation::format_phone(&prompt("WhatsApp")?);
    if !phone.is_empty() {
        println!("WhatsApp: {phone}");
    }

    let path = prompt("Conta de luz (caminho do arquivo)")?;
    let file = if path.is_empty() {
        None
    } else {
        Some(read_attachment(&path).await?)
    };
    surface.set_file_label(
        file.as_ref()
            .map(|f| f.file_name.as_str())
            .unwrap_or(surface::NO_FILE_CHOSEN),
    );

    Ok(SubmissionDraft {
        name,
        email,
        phone,
        file,
    })
}

async fn read_attachment(path: &str) -> Result<FileAttachment> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {path}"))?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_string();
    Ok(FileAttachment {
        content_type: content_type_for(&file_name),
        file_name,
        bytes: bytes.into(),
    })
}

/// MIME type from the file extension, the way a browser would label it.
fn content_type_for(name: &str) -> String {
    let ext = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
    .to_string()
}

fn prompt(label: &str) -> Result<String> {
    use std::io::{self, Write};

    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
