//! Campaign attribution: capture UTM parameters and the referrer at page
//! load, persist them in durable client storage, read them back at submit
//! time.
//!
//! Values survive reloads and have no expiry. A stored key is only
//! overwritten when the same parameter shows up again in a later page load;
//! absent parameters never clear anything.

use crate::backend::KeyValueStore;

/// The five recognized UTM query parameters, in capture order.
pub const UTM_KEYS: [&str; 5] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
];

/// Storage key for the captured referrer.
pub const REFERRER_KEY: &str = "referrer";

/// Context of the page load a form session originates from.
#[derive(Clone, Debug, Default)]
pub struct PageContext {
    /// Full URL of the current page, query string included.
    pub url: String,

    /// Referrer of the browsing context, when known.
    pub referrer: Option<String>,
}

/// Attribution values as read back from durable storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributionContext {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
    pub referrer: Option<String>,
}

impl AttributionContext {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            utm_source: store.get("utm_source"),
            utm_medium: store.get("utm_medium"),
            utm_campaign: store.get("utm_campaign"),
            utm_term: store.get("utm_term"),
            utm_content: store.get("utm_content"),
            referrer: store.get(REFERRER_KEY),
        }
    }
}

/// Parse the page's query string and persist any recognized UTM values,
/// plus the referrer when one is available. Returns whether anything was
/// written. Missing or empty parameters are simply skipped.
pub fn capture_and_persist(page: &PageContext, store: &dyn KeyValueStore) -> bool {
    let params = query_pairs(&page.url);
    let mut changed = false;

    for key in UTM_KEYS {
        // Last occurrence wins when a parameter repeats.
        let value = params
            .iter()
            .rev()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str());
        if let Some(value) = value
            && !value.is_empty()
        {
            store.set(key, value);
            changed = true;
        }
    }

    if let Some(referrer) = page.referrer.as_deref()
        && !referrer.is_empty()
    {
        store.set(REFERRER_KEY, referrer);
        changed = true;
    }

    changed
}

/// Split a URL's query string into decoded key/value pairs. Fragments are
/// dropped; a key without `=` maps to an empty value.
fn query_pairs(url: &str) -> Vec<(String, String)> {
    let Some(query) = url.splitn(2, '?').nth(1) else {
        return Vec::new();
    };
    let query = query.split('#').next().unwrap_or(query);

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.clone())
}
