//! URL-safe slug derivation with collision-probe candidates.
//!
//! Slugs are computed once, at entity creation, and never recomputed on
//! update: the exact slug value is part of external URLs. Uniqueness is
//! the caller's concern; this module only produces the deterministic
//! candidate sequence `base`, `base-2`, `base-3`, … that the caller
//! probes against its store until a free one is found.

/// Maximum slug length, matching the database column.
pub const MAX_SLUG_LEN: usize = 50;

/// Derive a slug from a human-readable name.
///
/// Lowercases ASCII alphanumerics, keeps underscores, collapses every
/// other run of characters to a single hyphen, and strips leading and
/// trailing hyphens. May return an empty string (e.g. for all-emoji
/// input); `candidates` handles that case by going straight to the
/// numbered suffixes.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_sep = false;
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Truncate to `max_len` and strip separator characters left dangling
/// at either end by the cut.
fn truncate_and_strip(slug: &str, max_len: usize) -> String {
    let cut: String = slug.chars().take(max_len).collect();
    cut.trim_matches('-').to_string()
}

/// Iterator over slug candidates for a name: the plain slug first, then
/// `-2`, `-3`, … suffixed variants. The base is re-truncated before each
/// suffix is appended so every candidate fits in `max_len`.
///
/// The iterator is infinite; callers bound the probe loop themselves.
pub fn candidates(name: &str, max_len: usize) -> Candidates {
    let base = truncate_and_strip(&slugify(name), max_len);
    Candidates {
        base,
        max_len,
        next: 0,
    }
}

pub struct Candidates {
    base: String,
    max_len: usize,
    next: u64,
}

impl Iterator for Candidates {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next += 1;
        if self.next == 1 {
            if self.base.is_empty() {
                // Nothing usable in the name; fall through to "-2".
                self.next = 2;
            } else {
                return Some(self.base.clone());
            }
        }
        let suffix = format!("-{}", self.next);
        let room = self.max_len.saturating_sub(suffix.len());
        let head = truncate_and_strip(&self.base, room);
        Some(format!("{head}{suffix}"))
    }
}
