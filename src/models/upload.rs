//! Upload results and storage key generation.

use chrono::Utc;
use rand::Rng;

/// Outcome of a successful storage upload.
#[derive(Clone, Debug)]
pub struct UploadResult {
    /// File name as chosen by the user.
    pub original_file_name: String,

    /// Generated key the object lives under in the bucket.
    pub storage_path: String,

    /// Publicly accessible URL of the stored object.
    pub public_url: String,
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 12;

/// Random base36 string, `len` characters.
pub(crate) fn base36_token(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

/// Generate a storage key for an uploaded file:
/// `<unix-ms-timestamp>-<random-base36-token>.<original-extension>`.
///
/// Uniqueness comes from the token width, not from collision checks against
/// the bucket. A dot-free file name contributes itself as the suffix.
pub fn generate_object_key(original_name: &str) -> String {
    let ext = original_name.rsplit('.').next().unwrap_or(original_name);
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        base36_token(TOKEN_LEN),
        ext
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_preserves_extension() {
        let key = generate_object_key("conta-marco.pdf");
        assert!(key.ends_with(".pdf"));
        let key = generate_object_key("fatura.2024.jpeg");
        assert!(key.ends_with(".jpeg"));
    }

    #[test]
    fn test_key_shape() {
        let key = generate_object_key("conta.png");
        let (timestamp, rest) = key.split_once('-').unwrap();
        assert!(timestamp.parse::<i64>().is_ok());
        let (token, ext) = rest.split_once('.').unwrap();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_eq!(ext, "png");
    }

    #[test]
    fn test_dotless_name_becomes_suffix() {
        let key = generate_object_key("fatura");
        assert!(key.ends_with(".fatura"));
    }

    #[test]
    fn test_keys_unique_across_many_uploads() {
        // Far more keys than a single millisecond could ever see; the token
        // alone must keep them distinct.
        let keys: HashSet<String> = (0..10_000)
            .map(|_| generate_object_key("conta.pdf"))
            .collect();
        assert_eq!(keys.len(), 10_000);
    }
}
