//! Header name translation.
//!
//! # Responsibilities
//! - Convert natural header names (`X-Forwarded-For`) into gateway-style
//!   metadata keys (`HTTP_X_FORWARDED_FOR`)
//! - Build the per-request metadata map handed to the resolver
//!
//! # Design Decisions
//! - One transform for both the precedence list and incoming headers, so
//!   both sides always agree on key names
//! - ASCII-only upper-casing; names outside the HTTP token alphabet pass
//!   through unchanged

use crate::ipware::resolver::HeaderMeta;
use crate::ipware::source::HeaderSource;

/// Prefix carried by every header key in gateway-style metadata.
pub const LEGACY_PREFIX: &str = "HTTP_";

/// Translate a natural header name into its gateway-style key.
pub fn to_legacy_name(name: &str) -> String {
    let mut key = String::with_capacity(LEGACY_PREFIX.len() + name.len());
    key.push_str(LEGACY_PREFIX);
    key.extend(name.chars().map(|c| match c {
        '-' => '_',
        c => c.to_ascii_uppercase(),
    }));
    key
}

/// Translate every name of a precedence list, keeping its order.
pub fn to_legacy_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| to_legacy_name(name.as_ref()))
        .collect()
}

/// Build gateway-style metadata from a request's headers.
///
/// Repeated headers are joined with `", "` in arrival order.
pub fn to_legacy_meta<S: HeaderSource + ?Sized>(headers: &S) -> HeaderMeta {
    let mut meta = HeaderMeta::new();
    for (name, value) in headers.header_pairs() {
        meta.entry(to_legacy_name(name))
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    meta
}
