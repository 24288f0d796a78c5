//! Logical identifiers and list-valued configuration fields

use crate::error::{CompileError, Result};

/// Turn a user-supplied resource name into a template logical id.
///
/// Any character outside `[A-Za-z0-9]` is a word separator and is dropped;
/// the first character of each word is uppercased and the rest keep their
/// case: `etl-job` -> `EtlJob`, `load_toS3` -> `LoadToS3`. Applying it to its
/// own output is a no-op.
///
/// Fails when nothing alphanumeric is left.
pub fn logical_id(name: &str) -> Result<String> {
    let mut out = String::with_capacity(name.len());
    let mut word_start = true;

    for c in name.chars() {
        if !c.is_ascii_alphanumeric() {
            word_start = true;
            continue;
        }
        if word_start {
            out.push(c.to_ascii_uppercase());
            word_start = false;
        } else {
            out.push(c);
        }
    }

    if out.is_empty() {
        return Err(CompileError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(out)
}

/// Split a comma-joined configuration value, keeping order and duplicates.
pub fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.to_string()).collect()
}
