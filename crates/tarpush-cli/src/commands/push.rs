//! Push command implementation.

use crate::cli::PushArgs;
use crate::error::convert_push_error;
use anyhow::Context;
use anyhow::Result;
use tarpush_core::PushConfig;
use tarpush_core::tar_and_upload;
use tracing::debug;

pub fn execute(args: &PushArgs) -> Result<()> {
    let root = std::env::current_dir().context("failed to resolve current directory")?;
    let config = PushConfig::from_env();

    debug!(
        root = %root.display(),
        identifier = %args.identifier,
        endpoint = %config.upload.endpoint,
        "pushing directory"
    );

    let report = tar_and_upload(&root, &args.identifier, &config)
        .map_err(|err| convert_push_error(err, &config.upload.endpoint))?;

    debug!(
        files = report.archive.files_added,
        bytes = report.upload.bytes_sent,
        "push complete"
    );

    Ok(())
}
