//! Job naming: display-name sanitization, collision suffixing, and the
//! effective output base name.
//!
//! A job's filename is derived from its display name, so the mapping has to
//! reject names that cannot become a safe file stem.

use crate::error::CoreError;
use crate::job::JobRecord;

/// Maximum length of a sanitized job file stem.
const MAX_STEM_LEN: usize = 128;

/// Characters allowed through sanitization unchanged.
fn is_safe_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || c == '.' || c == ' '
}

/// Map a user-chosen display name to a safe file stem.
///
/// Rules:
/// - Leading/trailing whitespace is trimmed; inner spaces become `_`.
/// - Path separators and other unsafe characters become `_`.
/// - The result is truncated to `MAX_STEM_LEN` characters.
/// - A name that sanitizes to nothing (or to only dots) is rejected with
///   [`CoreError::InvalidName`].
pub fn sanitize_job_name(display_name: &str) -> Result<String, CoreError> {
    let trimmed = display_name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidName(
            "Job name must not be empty".to_string(),
        ));
    }

    let stem: String = trimmed
        .chars()
        .map(|c| if is_safe_char(c) { c } else { '_' })
        .map(|c| if c == ' ' { '_' } else { c })
        .take(MAX_STEM_LEN)
        .collect();

    if stem.chars().all(|c| c == '.' || c == '_') {
        return Err(CoreError::InvalidName(format!(
            "Job name \"{display_name}\" has no usable characters"
        )));
    }

    Ok(stem)
}

/// Append `_1`, `_2`, ... to `stem` until `taken` no longer reports a
/// collision. Returns `stem` unchanged if it is already free.
pub fn unique_stem(stem: &str, mut taken: impl FnMut(&str) -> bool) -> String {
    if !taken(stem) {
        return stem.to_string();
    }
    let mut n = 1u32;
    loop {
        let candidate = format!("{stem}_{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// The effective output base name for a job.
///
/// Precedence: an explicit non-empty `output_file_name` wins, then the
/// display name when `use_name_for_output` is set, otherwise `None` (the
/// pipeline's default naming rule applies).
pub fn output_base_name(record: &JobRecord) -> Option<&str> {
    if let Some(explicit) = record.output_file_name.as_deref() {
        if !explicit.trim().is_empty() {
            return Some(explicit);
        }
    }
    record
        .use_name_for_output
        .then_some(record.display_name.as_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
