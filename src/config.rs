//! Centralized application configuration.
//! Combines environment variables (and a `.env` file, loaded by `main`)
//! with CLI arguments; arguments win.

use clap::Parser;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub data_dir: String,
    pub page_url: Option<String>,
    pub referrer: Option<String>,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Lead-capture submission form")]
pub struct Args {
    /// Supabase project URL (overrides SUPABASE_URL)
    #[arg(long)]
    pub supabase_url: Option<String>,

    /// Supabase anon key (overrides SUPABASE_ANON_KEY)
    #[arg(long)]
    pub supabase_anon_key: Option<String>,

    /// Directory for durable client state (overrides LEAD_INTAKE_DATA_DIR)
    #[arg(long)]
    pub data_dir: Option<String>,

    /// URL of the page this session originated from, query string included;
    /// UTM parameters are captured from it
    #[arg(long)]
    pub page_url: Option<String>,

    /// Referrer of the browsing context
    #[arg(long)]
    pub referrer: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into an AppConfig.
    pub fn from_env_and_args() -> Self {
        Self::merge(Args::parse())
    }

    fn merge(args: Args) -> Self {
        let env_url = env::var("SUPABASE_URL").unwrap_or_default();
        let env_key = env::var("SUPABASE_ANON_KEY").unwrap_or_default();
        let env_data_dir = env::var("LEAD_INTAKE_DATA_DIR").unwrap_or_else(|_| "./data".into());

        Self {
            supabase_url: args.supabase_url.unwrap_or(env_url),
            supabase_anon_key: args.supabase_anon_key.unwrap_or(env_key),
            data_dir: args.data_dir.unwrap_or(env_data_dir),
            page_url: args.page_url,
            referrer: args.referrer,
        }
    }

    /// Whether enough credentials are present to talk to the backend.
    pub fn is_backend_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override() {
        let cfg = AppConfig::merge(Args {
            supabase_url: Some("https://proj.supabase.co".into()),
            supabase_anon_key: Some("anon".into()),
            data_dir: Some("/tmp/lead-intake".into()),
            page_url: Some("https://example.com/?utm_source=fb".into()),
            referrer: None,
        });
        assert_eq!(cfg.supabase_url, "https://proj.supabase.co");
        assert_eq!(cfg.data_dir, "/tmp/lead-intake");
        assert!(cfg.is_backend_configured());
    }

    #[test]
    fn test_backend_unconfigured_without_credentials() {
        let cfg = AppConfig {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            data_dir: "./data".into(),
            page_url: None,
            referrer: None,
        };
        assert!(!cfg.is_backend_configured());
    }
}
