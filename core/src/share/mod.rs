//! Share session management and the protocol transport seam.
//!
//! [`ShareSession`] owns a [`ShareTransport`] (the protocol collaborator
//! library) and tracks connection state. File operations follow the relay
//! contract: failures are logged and collapsed to empty/absent/false
//! signals so a pass can skip the affected file and keep going. The
//! result-typed [`ShareSession::try_list_files`] is kept for callers that
//! need to tell a failed listing apart from a genuinely empty directory.

#[cfg(feature = "smb")]
pub mod smb;

use std::fmt;

use tracing::{error, info, warn};

use crate::errors::ShareError;

/// Separator for share-relative paths. The collaborator library addresses
/// files URL-style, so the native separator is `/`.
const SEPARATOR: char = '/';

/// Protocol dialects a transport may negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Smb2_0_2,
    Smb2_1,
    Smb3_0,
    Smb3_0_2,
    Smb3_1_1,
}

/// Dialects accepted by [`ShareSession::connect`]. Anything older is a
/// protocol downgrade and rejected outright.
pub const SUPPORTED_DIALECTS: [Dialect; 3] =
    [Dialect::Smb3_0, Dialect::Smb3_0_2, Dialect::Smb3_1_1];

impl Dialect {
    /// Whether this dialect is in the accepted set.
    pub fn is_supported(self) -> bool {
        SUPPORTED_DIALECTS.contains(&self)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::Smb2_0_2 => "SMB 2.0.2",
            Dialect::Smb2_1 => "SMB 2.1",
            Dialect::Smb3_0 => "SMB 3.0",
            Dialect::Smb3_0_2 => "SMB 3.0.2",
            Dialect::Smb3_1_1 => "SMB 3.1.1",
        };
        f.write_str(name)
    }
}

/// Connection state of a [`ShareSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected(Dialect),
}

/// Blocking share protocol operations exposed by a collaborator library.
///
/// Implementations handle negotiation, authentication and mounting inside
/// [`connect()`](ShareTransport::connect); the session layer on top adds
/// state tracking, the dialect floor, and failure collapsing. Every
/// operation is a single attempt — retry policy belongs to the caller.
pub trait ShareTransport: Send {
    /// Negotiate a connection, authenticate, and mount the share.
    /// Returns the negotiated dialect.
    fn connect(&mut self) -> Result<Dialect, ShareError>;

    /// Release mount, session and transport resources in reverse order of
    /// acquisition. Every release step is attempted even if an earlier one
    /// fails.
    fn disconnect(&mut self) -> Result<(), ShareError>;

    /// List entry names in a directory, in server order, excluding the
    /// `.`/`..` pseudo-entries.
    fn list_dir(&mut self, path: &str) -> Result<Vec<String>, ShareError>;

    /// Read a whole file.
    fn read_file(&mut self, path: &str) -> Result<Vec<u8>, ShareError>;

    /// Write the full buffer at offset 0, creating or overwriting the file
    /// unconditionally.
    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<(), ShareError>;

    /// Delete a file.
    fn delete_file(&mut self, path: &str) -> Result<(), ShareError>;
}

/// A connected share and the file operations the pipeline runs against it.
///
/// # Lifecycle
///
/// 1. Create with [`ShareSession::new()`] (disconnected state).
/// 2. Call [`connect()`](ShareSession::connect); a dialect outside
///    [`SUPPORTED_DIALECTS`] is rejected and the session stays disconnected.
/// 3. Use the file operations. While disconnected they fail with the
///    empty/absent/false signal without touching the network.
/// 4. Call [`disconnect()`](ShareSession::disconnect) on shutdown.
///
/// Not internally synchronized: callers that trigger passes concurrently
/// must serialize access with their own single-flight guard.
pub struct ShareSession {
    transport: Box<dyn ShareTransport>,
    state: ConnectionState,
}

impl ShareSession {
    pub fn new(transport: Box<dyn ShareTransport>) -> Self {
        Self {
            transport,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected(_))
    }

    /// Negotiate, authenticate and mount the share.
    ///
    /// A negotiated dialect outside [`SUPPORTED_DIALECTS`] disconnects the
    /// transport and fails with [`ShareError::DialectRejected`]; the
    /// session stays disconnected on every failure path.
    pub fn connect(&mut self) -> Result<Dialect, ShareError> {
        let dialect = self.transport.connect()?;

        if !dialect.is_supported() {
            error!("negotiated dialect {dialect} is below the supported floor, disconnecting");
            if let Err(e) = self.transport.disconnect() {
                warn!("transport release after dialect rejection failed: {e}");
            }
            self.state = ConnectionState::Disconnected;
            return Err(ShareError::DialectRejected(dialect));
        }

        info!("connected to share, negotiated dialect {dialect}");
        self.state = ConnectionState::Connected(dialect);
        Ok(dialect)
    }

    /// Release the share connection.
    ///
    /// Transport release errors are logged, never propagated; the session
    /// is marked disconnected on every exit path.
    pub fn disconnect(&mut self) {
        if let Err(e) = self.transport.disconnect() {
            warn!("error while disconnecting from share: {e}");
        }
        self.state = ConnectionState::Disconnected;
        info!("disconnected from share");
    }

    /// List entry names in a directory, keeping the failure distinction.
    ///
    /// Most callers want [`list_files()`](ShareSession::list_files); this
    /// variant exists so a failed listing and an empty directory remain
    /// distinguishable.
    pub fn try_list_files(&mut self, directory: &str) -> Result<Vec<String>, ShareError> {
        self.require_connected()?;
        self.transport.list_dir(&normalize_path(directory))
    }

    /// List entry names in a directory.
    ///
    /// Failure collapses to an empty list (logged): callers cannot tell a
    /// failed listing from an empty directory. Use
    /// [`try_list_files()`](ShareSession::try_list_files) to keep the
    /// distinction.
    pub fn list_files(&mut self, directory: &str) -> Vec<String> {
        match self.try_list_files(directory) {
            Ok(names) => names,
            Err(e) => {
                error!("listing '{directory}' failed: {e}");
                Vec::new()
            }
        }
    }

    /// Read a whole file. Absent on any failure (logged).
    pub fn read_file(&mut self, path: &str) -> Option<Vec<u8>> {
        match self.try_read_file(path) {
            Ok(data) => Some(data),
            Err(e) => {
                error!("reading '{path}' failed: {e}");
                None
            }
        }
    }

    /// Write the full buffer, creating or overwriting the file. `false` on
    /// any failure (logged).
    pub fn write_file(&mut self, path: &str, data: &[u8]) -> bool {
        match self.try_write_file(path, data) {
            Ok(()) => true,
            Err(e) => {
                error!("writing '{path}' failed: {e}");
                false
            }
        }
    }

    /// Delete a file. `false` on any failure (logged).
    pub fn delete_file(&mut self, path: &str) -> bool {
        match self.try_delete_file(path) {
            Ok(()) => true,
            Err(e) => {
                error!("deleting '{path}' failed: {e}");
                false
            }
        }
    }

    fn try_read_file(&mut self, path: &str) -> Result<Vec<u8>, ShareError> {
        self.require_connected()?;
        self.transport.read_file(&normalize_path(path))
    }

    fn try_write_file(&mut self, path: &str, data: &[u8]) -> Result<(), ShareError> {
        self.require_connected()?;
        self.transport.write_file(&normalize_path(path), data)
    }

    fn try_delete_file(&mut self, path: &str) -> Result<(), ShareError> {
        self.require_connected()?;
        self.transport.delete_file(&normalize_path(path))
    }

    fn require_connected(&self) -> Result<(), ShareError> {
        match self.state {
            ConnectionState::Connected(_) => Ok(()),
            ConnectionState::Disconnected => Err(ShareError::NotConnected),
        }
    }
}

/// Convert backslashes to the native separator and strip leading and
/// trailing separators from a path fragment.
pub fn normalize_path(fragment: &str) -> String {
    fragment
        .replace('\\', "/")
        .trim_matches(SEPARATOR)
        .to_string()
}

/// Compose a directory and a file name into a share-relative path.
pub fn join_path(directory: &str, name: &str) -> String {
    let dir = normalize_path(directory);
    let name = normalize_path(name);
    if dir.is_empty() {
        name
    } else {
        format!("{dir}{SEPARATOR}{name}")
    }
}
