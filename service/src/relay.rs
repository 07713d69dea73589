//! Facade over the session, upload client and pipeline.

use imgrelay_core::config::DirectoryConfig;
use imgrelay_core::errors::RelayError;
use imgrelay_core::pipeline::{self, PassOutcome};
use imgrelay_core::share::ShareSession;
use imgrelay_core::upload::UploadClient;
use tracing::{error, info};

/// Owns the share session and upload client for the process lifetime.
///
/// The service wraps this in a mutex: that lock is the single-flight
/// guard, so concurrent triggers serialize into strictly sequential
/// passes against the one shared session.
pub struct Relay {
    session: ShareSession,
    uploader: UploadClient,
    dirs: DirectoryConfig,
}

impl Relay {
    pub fn new(session: ShareSession, uploader: UploadClient, dirs: DirectoryConfig) -> Self {
        Self {
            session,
            uploader,
            dirs,
        }
    }

    /// Connect the share session and log what the mount looks like.
    ///
    /// A connection failure is logged, not fatal: the trigger surface
    /// still comes up, and the operator re-triggers after fixing the
    /// share. There is no automatic reconnect.
    pub fn initialize(&mut self) {
        match self.session.connect() {
            Ok(dialect) => {
                let root = self.session.list_files("");
                info!("share mounted ({dialect}), root entries: {root:?}");
            }
            Err(e) => error!("initial share connection failed: {e}"),
        }
    }

    /// Run one processing pass.
    pub fn run_pass(&mut self) -> Result<PassOutcome, RelayError> {
        pipeline::run_pass(&mut self.session, &self.uploader, &self.dirs)
    }

    /// Release the share connection.
    pub fn shutdown(&mut self) {
        self.session.disconnect();
    }
}
