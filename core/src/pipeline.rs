//! One processing pass over the share input directory.
//!
//! A pass runs `Idle → ProbingWriteAccess → Listing → Filtering →
//! PerFileLoop → Done` and keeps no state between invocations. Per-file
//! failures are logged and skipped; only the aggregate outcome reaches the
//! caller. The move to the output directory is an explicit write-then-delete
//! pair: a failed delete leaves the file in both directories rather than
//! losing it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::{debug, error, info, warn};

use crate::classify::is_image;
use crate::config::DirectoryConfig;
use crate::errors::RelayError;
use crate::share::{join_path, ShareSession};
use crate::upload::Uploader;

/// Name of the probe file written to verify write access.
const PROBE_FILE: &str = ".__write_probe__.txt";
/// Fixed probe content.
const PROBE_CONTENT: &[u8] = b"probe";

/// Aggregate result of one pass. Per-file failures are visible in logs
/// only; no per-file counts are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// The filtered listing was empty; nothing was attempted. A normal
    /// terminal state, not an error.
    NothingToProcess,
    /// Every eligible file was attempted (not necessarily moved).
    Completed,
}

impl PassOutcome {
    /// Human-readable summary for the trigger surface.
    pub fn message(self) -> &'static str {
        match self {
            PassOutcome::NothingToProcess => "no images to process",
            PassOutcome::Completed => "all images attempted",
        }
    }
}

/// Run one full processing pass: probe write access, list the input
/// directory, and relay each image to the upload endpoint, moving it to
/// the output directory on success.
///
/// Ordering is deliberate: upload happens before the move, and the move is
/// write-then-delete, so any mid-pass failure biases toward keeping the
/// file in the input location. Skipped files stay untouched for a future
/// pass; a failed delete after a successful output write leaves a
/// duplicate, never a loss.
pub fn run_pass(
    session: &mut ShareSession,
    uploader: &dyn Uploader,
    dirs: &DirectoryConfig,
) -> Result<PassOutcome, RelayError> {
    info!("starting processing pass over '{}'", dirs.input);

    probe_write_access(session, &dirs.input);

    let entries = session.list_files(&dirs.input);
    info!("found {} entries in '{}'", entries.len(), dirs.input);

    let images: Vec<String> = entries.into_iter().filter(|name| is_image(name)).collect();
    if images.is_empty() {
        info!("no images to process");
        return Ok(PassOutcome::NothingToProcess);
    }

    for name in &images {
        let input_path = join_path(&dirs.input, name);
        let output_path = join_path(&dirs.output, name);

        let Some(bytes) = session.read_file(&input_path) else {
            error!("failed to read '{input_path}', skipping");
            continue;
        };
        debug!("read '{input_path}' ({} bytes)", bytes.len());

        let encoded = BASE64.encode(&bytes);

        if let Err(e) = uploader.upload(name, &encoded) {
            error!("upload of '{name}' failed, leaving file in place: {e}");
            continue;
        }
        info!("uploaded '{name}'");

        if !session.write_file(&output_path, &bytes) {
            error!("failed to write '{output_path}', keeping input copy");
            continue;
        }
        if !session.delete_file(&input_path) {
            error!("failed to delete '{input_path}'; file now exists in both input and output");
            continue;
        }
        info!("moved '{name}' to '{}'", dirs.output);
    }

    Ok(PassOutcome::Completed)
}

/// Write and remove a fixed probe file in the input directory.
///
/// Diagnostic only: a failure of either step is logged and the pass
/// proceeds regardless.
fn probe_write_access(session: &mut ShareSession, input_dir: &str) {
    let probe_path = join_path(input_dir, PROBE_FILE);
    if !session.write_file(&probe_path, PROBE_CONTENT) {
        warn!("write probe failed for '{probe_path}'");
        return;
    }
    if !session.delete_file(&probe_path) {
        warn!("failed to remove write probe '{probe_path}'");
    }
}
