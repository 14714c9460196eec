use rand::Rng;
use rand::distributions::Alphanumeric;

/// Attempts before slug minting gives up with a conflict.
pub const MAX_SLUG_ATTEMPTS: usize = 8;

const MAX_BASE_LEN: usize = 60;
const SUFFIX_LEN: usize = 5;
const FALLBACK_BASE: &str = "card";

/// Lowercase, hyphen-separated ASCII token derived from a display name.
/// Runs of anything that is not an ASCII letter or digit collapse into one
/// hyphen; an empty result falls back to `card`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_BASE_LEN {
        slug.truncate(MAX_BASE_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    if slug.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        slug
    }
}

/// Candidate for the given attempt: the bare base first, then the base
/// with a short random suffix.
pub fn slug_candidate(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        return base.to_string();
    }
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("{base}-{suffix}")
}
