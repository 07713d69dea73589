//! SMB transport implementing [`ShareTransport`] over `pavao`
//! (libsmbclient).
//!
//! The client handle is created on [`connect()`](ShareTransport::connect)
//! and dropped on disconnect; libsmbclient releases tree, session and
//! socket in reverse order when the handle is freed.

use std::io::{Read, Write};

use pavao::{SmbClient, SmbCredentials, SmbEncryptionLevel, SmbOpenOptions, SmbOptions};
use tracing::debug;

use crate::config::ShareConfig;
use crate::errors::ShareError;
use crate::share::{Dialect, ShareTransport};

/// SMB transport for a single share mount.
pub struct SmbTransport {
    config: ShareConfig,
    client: Option<SmbClient>,
}

impl SmbTransport {
    pub fn new(config: ShareConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    fn client(&self) -> Result<&SmbClient, ShareError> {
        self.client.as_ref().ok_or(ShareError::NotConnected)
    }

    /// libsmbclient addresses files relative to the share root with a
    /// leading slash.
    fn absolute(path: &str) -> String {
        format!("/{path}")
    }
}

impl ShareTransport for SmbTransport {
    fn connect(&mut self) -> Result<Dialect, ShareError> {
        let credentials = SmbCredentials::default()
            .server(format!("smb://{}:{}", self.config.host, self.config.port))
            .share(format!("/{}", self.config.share))
            .username(self.config.username.clone().unwrap_or_default())
            .password(self.config.password.clone().unwrap_or_default())
            .workgroup(self.config.domain.clone());

        let options = SmbOptions::default()
            .one_share_per_server(true)
            .encryption_level(SmbEncryptionLevel::Request);

        let client = SmbClient::new(credentials, options)
            .map_err(|e| ShareError::Negotiation(e.to_string()))?;

        // libsmbclient negotiates lazily; list the share root so
        // authentication and mount failures surface here instead of on the
        // first file operation.
        client
            .list_dir("/")
            .map_err(|e| ShareError::Mount(e.to_string()))?;

        debug!(
            "mounted \\\\{}\\{}",
            self.config.host, self.config.share
        );
        self.client = Some(client);

        // libsmbclient does not expose the negotiated dialect; it refuses
        // SMB1 in modern builds and picks the newest dialect both ends
        // support, so report the floor of the accepted set.
        Ok(Dialect::Smb3_0)
    }

    fn disconnect(&mut self) -> Result<(), ShareError> {
        // Dropping the handle frees tree, session and socket in reverse
        // order inside libsmbclient.
        self.client = None;
        Ok(())
    }

    fn list_dir(&mut self, path: &str) -> Result<Vec<String>, ShareError> {
        let client = self.client()?;
        let entries = client
            .list_dir(&Self::absolute(path))
            .map_err(|e| ShareError::OperationFailed(format!("list_dir failed: {e}")))?;

        Ok(entries
            .into_iter()
            .map(|entry| entry.name().to_string())
            .filter(|name| name != "." && name != "..")
            .collect())
    }

    fn read_file(&mut self, path: &str) -> Result<Vec<u8>, ShareError> {
        let client = self.client()?;
        let mut file = client
            .open_with(&Self::absolute(path), SmbOpenOptions::default().read(true))
            .map_err(|e| ShareError::OperationFailed(format!("open failed: {e}")))?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| ShareError::OperationFailed(format!("read failed: {e}")))?;
        Ok(data)
    }

    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<(), ShareError> {
        let client = self.client()?;
        let target = Self::absolute(path);

        // Overwrite is unconditional: drop any existing file first so a
        // shorter payload never leaves a stale tail behind.
        let _ = client.unlink(&target);

        let mut file = client
            .open_with(
                &target,
                SmbOpenOptions::default().create(true).write(true),
            )
            .map_err(|e| ShareError::OperationFailed(format!("create failed: {e}")))?;

        file.write_all(data)
            .map_err(|e| ShareError::OperationFailed(format!("write failed: {e}")))?;
        Ok(())
    }

    fn delete_file(&mut self, path: &str) -> Result<(), ShareError> {
        let client = self.client()?;
        client
            .unlink(&Self::absolute(path))
            .map_err(|e| ShareError::OperationFailed(format!("unlink failed: {e}")))
    }
}
