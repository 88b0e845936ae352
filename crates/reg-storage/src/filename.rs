//! Stored-name derivation for uploads.
//!
//! A client filename becomes `<dir>/<sanitized name>`. When that name is
//! taken or too long, a `_<7 random alphanumerics>` suffix goes in front of
//! the extension and the stem is cut until the path fits.

use crate::error::StorageError;

/// Longest stored path, in characters. Matches the `marksheet_pdf` column.
pub const MAX_PATH_CHARS: usize = 100;

/// Length of the random disambiguation suffix (not counting the `_`).
pub const SUFFIX_LEN: usize = 7;

/// Name used when nothing printable survives sanitizing.
const FALLBACK_NAME: &str = "upload";

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Reduce a client filename to a safe single path segment.
///
/// Drops directory components, turns spaces into `_`, and removes anything
/// that is not alphanumeric, `-`, `_` or `.`.
pub fn sanitize_filename(input: &str) -> String {
    let base = input.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    let cleaned: String = base
        .chars()
        .map(|ch| if ch == ' ' { '_' } else { ch })
        .filter(|ch| ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.'))
        .collect();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return FALLBACK_NAME.to_string();
    }
    cleaned
}

/// Split `name` into stem and extension (with the dot).
///
/// A leading dot is part of the stem, so `.bashrc` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Draw a random alphanumeric suffix from the OS random source.
///
/// # Errors
///
/// Returns `StorageError::Random` if the OS source fails.
pub fn random_suffix() -> Result<String, StorageError> {
    let mut buf = [0u8; SUFFIX_LEN];
    getrandom::fill(&mut buf).map_err(|e| StorageError::Random(e.to_string()))?;
    Ok(buf
        .iter()
        .map(|b| char::from(SUFFIX_ALPHABET[usize::from(*b) % SUFFIX_ALPHABET.len()]))
        .collect())
}

/// Join `dir`, `stem`, optional suffix and `ext`, cutting the stem so the
/// whole path is at most `max_chars` characters.
///
/// # Errors
///
/// Returns `StorageError::NameTooLong` if even an empty stem would not fit.
pub fn fit_path(
    dir: &str,
    stem: &str,
    suffix: Option<&str>,
    ext: &str,
    max_chars: usize,
) -> Result<String, StorageError> {
    let tail = suffix.map(|s| format!("_{s}")).unwrap_or_default();
    let fixed = dir.chars().count() + 1 + tail.chars().count() + ext.chars().count();
    let stem_chars = stem.chars().count();

    if fixed + stem_chars <= max_chars {
        return Ok(format!("{dir}/{stem}{tail}{ext}"));
    }

    let room = max_chars.saturating_sub(fixed);
    if room == 0 {
        return Err(StorageError::NameTooLong {
            name: format!("{stem}{ext}"),
            max: max_chars,
        });
    }
    let cut: String = stem.chars().take(room).collect();
    Ok(format!("{dir}/{cut}{tail}{ext}"))
}
