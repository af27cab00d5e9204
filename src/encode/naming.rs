//! Output naming: file stems, certificate member names and the archive name.

use chrono::{DateTime, Utc};

/// Longest stem [`sanitize_stem`] produces.
pub const MAX_STEM_LEN: usize = 50;

/// Stem used when nothing usable survives sanitization.
pub const FALLBACK_STEM: &str = "certificate";

/// Map arbitrary row text to a lowercase `[a-z0-9_]` stem of at most [`MAX_STEM_LEN`] chars.
///
/// Characters other than ASCII alphanumerics, whitespace and `_` are dropped, each whitespace run
/// becomes a single `_`, the result is lower-cased and truncated. Never empty, and applying it
/// twice gives the same result as applying it once.
pub fn sanitize_stem(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len().min(MAX_STEM_LEN));
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
                in_space = true;
            }
            continue;
        }
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c.to_ascii_lowercase());
            in_space = false;
        }
    }

    // Only ASCII survives the filter, so byte truncation is char-safe.
    out.truncate(MAX_STEM_LEN);

    if out.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        out
    }
}

/// `cert_{seq:03}_{stem}.png`; `seq` is the 1-based index among rendered rows.
pub fn certificate_file_name(seq: usize, name: &str) -> String {
    format!("cert_{seq:03}_{}.png", sanitize_stem(name))
}

/// `certificates_{YYYYMMDDTHHMMSS}.zip` for the given UTC instant.
pub fn archive_file_name(at: DateTime<Utc>) -> String {
    format!("certificates_{}.zip", at.format("%Y%m%dT%H%M%S"))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/naming.rs"]
mod tests;
