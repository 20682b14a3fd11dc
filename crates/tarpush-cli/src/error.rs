//! Error conversion utilities for CLI.
//!
//! Converts tarpush-core's typed errors (thiserror) into contextual errors
//! (anyhow) with actionable guidance.

use anyhow::anyhow;
use tarpush_core::PushError;
use tarpush_core::Stage;

/// Converts `PushError` to an anyhow error, appending a hint when one applies.
///
/// The stage message and the full cause chain are kept, so `{:#}` renders
/// e.g. `failed to upload tar file: upload resulted in status code 404`.
pub fn convert_push_error(err: PushError, endpoint: &str) -> anyhow::Error {
    let hint = hint_for(&err, endpoint);
    let err = anyhow::Error::from(err);
    match hint {
        Some(hint) => anyhow!("{err:#}\nHINT: {hint}"),
        None => err,
    }
}

fn hint_for(err: &PushError, endpoint: &str) -> Option<String> {
    if err.is_transport() {
        return Some(format!("is the service running on {endpoint}?"));
    }
    if let Some(status) = err.status_code() {
        return Some(format!(
            "the service at {endpoint} answered {status}; check the API identifier"
        ));
    }
    match (err.stage(), err.root_cause()) {
        (Some(Stage::CreateTempFile), _) => {
            Some("check that the system temporary directory is writable".to_string())
        }
        (_, PushError::Walk { .. } | PushError::ReadFile { .. }) => {
            Some("check read permissions in the current directory".to_string())
        }
        _ => None,
    }
}
