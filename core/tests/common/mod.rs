//! Shared test doubles for relay integration tests.
//!
//! [`MemoryTransport`] is an in-memory [`ShareTransport`] over a flat
//! path → bytes map with scriptable per-path failures;
//! [`ScriptedUploader`] records every upload and fails on request.

// Each integration test is compiled as its own crate, so not every test
// file uses every helper from this shared module.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use imgrelay_core::errors::{ShareError, UploadError};
use imgrelay_core::share::{Dialect, ShareSession, ShareTransport};
use imgrelay_core::upload::Uploader;

/// Backing state of a [`MemoryTransport`], shared with the test body so
/// it can inspect files and call counts after a pass.
pub struct MemoryShare {
    /// Flat map of normalized share-relative paths to file contents.
    pub files: BTreeMap<String, Vec<u8>>,
    /// Dialect reported by `connect()`.
    pub dialect: Dialect,
    pub fail_connect: bool,
    /// When set, every listing fails.
    pub fail_listings: bool,
    /// Paths whose read fails.
    pub fail_reads: HashSet<String>,
    /// Paths whose write fails.
    pub fail_writes: HashSet<String>,
    /// Paths whose delete fails.
    pub fail_deletes: HashSet<String>,
    pub list_calls: usize,
    /// Every path handed to `read_file`, in order.
    pub reads: Vec<String>,
}

impl MemoryShare {
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            dialect: Dialect::Smb3_1_1,
            fail_connect: false,
            fail_listings: false,
            fail_reads: HashSet::new(),
            fail_writes: HashSet::new(),
            fail_deletes: HashSet::new(),
            list_calls: 0,
            reads: Vec::new(),
        }
    }
}

/// In-memory share transport over a shared [`MemoryShare`].
pub struct MemoryTransport {
    pub state: Arc<Mutex<MemoryShare>>,
}

impl ShareTransport for MemoryTransport {
    fn connect(&mut self) -> Result<Dialect, ShareError> {
        let state = self.state.lock().unwrap();
        if state.fail_connect {
            return Err(ShareError::Negotiation("scripted failure".into()));
        }
        Ok(state.dialect)
    }

    fn disconnect(&mut self) -> Result<(), ShareError> {
        Ok(())
    }

    fn list_dir(&mut self, path: &str) -> Result<Vec<String>, ShareError> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if state.fail_listings {
            return Err(ShareError::OperationFailed("scripted failure".into()));
        }

        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        Ok(state
            .files
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(|rest| rest.to_string())
            .collect())
    }

    fn read_file(&mut self, path: &str) -> Result<Vec<u8>, ShareError> {
        let mut state = self.state.lock().unwrap();
        state.reads.push(path.to_string());
        if state.fail_reads.contains(path) {
            return Err(ShareError::OperationFailed("scripted failure".into()));
        }
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ShareError::NotFound(path.to_string()))
    }

    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<(), ShareError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes.contains(path) {
            return Err(ShareError::OperationFailed("scripted failure".into()));
        }
        state.files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn delete_file(&mut self, path: &str) -> Result<(), ShareError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_deletes.contains(path) {
            return Err(ShareError::OperationFailed("scripted failure".into()));
        }
        state
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| ShareError::NotFound(path.to_string()))
    }
}

/// Build a share populated with the given `(path, contents)` pairs.
pub fn share_with_files(files: &[(&str, &[u8])]) -> Arc<Mutex<MemoryShare>> {
    let mut state = MemoryShare::new();
    for (path, contents) in files {
        state.files.insert((*path).to_string(), contents.to_vec());
    }
    Arc::new(Mutex::new(state))
}

/// Open a connected session over the given share state.
pub fn connected_session(share: &Arc<Mutex<MemoryShare>>) -> ShareSession {
    let mut session = ShareSession::new(Box::new(MemoryTransport {
        state: share.clone(),
    }));
    session.connect().expect("stub connect should succeed");
    session
}

/// Uploader that records every attempt and fails for scripted file names.
pub struct ScriptedUploader {
    fail: HashSet<String>,
    /// `(filename, filedata)` pairs in attempt order.
    pub uploads: Mutex<Vec<(String, String)>>,
}

impl ScriptedUploader {
    pub fn new() -> Self {
        Self {
            fail: HashSet::new(),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Fail every upload whose file name is in `names`.
    pub fn failing(names: &[&str]) -> Self {
        Self {
            fail: names.iter().map(|n| n.to_string()).collect(),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn attempted_names(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl Uploader for ScriptedUploader {
    fn upload(&self, filename: &str, filedata: &str) -> Result<(), UploadError> {
        self.uploads
            .lock()
            .unwrap()
            .push((filename.to_string(), filedata.to_string()));
        if self.fail.contains(filename) {
            return Err(UploadError::Status(502));
        }
        Ok(())
    }
}
