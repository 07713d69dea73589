//! Configuration structs shared by the relay core and the service binary.
//!
//! Every struct deserializes with per-field defaults so partial
//! configurations fill in the conventional values (port 445, `WORKGROUP`
//! domain, `input`/`output` directories, 10 s upload timeout).

use serde::{Deserialize, Serialize};

/// Share endpoint and credentials.
///
/// `username`/`password` are optional; an unset username means guest
/// access. `domain` defaults to `WORKGROUP`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareConfig {
    pub host: String,
    #[serde(default = "default_share_port")]
    pub port: u16,
    pub share: String,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_domain")]
    pub domain: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_share_port(),
            share: String::new(),
            username: None,
            password: None,
            domain: default_domain(),
        }
    }
}

/// Upload endpoint settings.
///
/// The timeout bounds the single POST attempt per file; there is no retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfig {
    pub url: String,
    #[serde(default = "default_upload_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_upload_timeout_secs(),
        }
    }
}

/// Input and output directory names directly under the mounted share root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryConfig {
    #[serde(default = "default_input_dir")]
    pub input: String,
    #[serde(default = "default_output_dir")]
    pub output: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            input: default_input_dir(),
            output: default_output_dir(),
        }
    }
}

// --- Default value functions ---

fn default_share_port() -> u16 {
    445
}

fn default_domain() -> String {
    "WORKGROUP".to_string()
}

fn default_upload_timeout_secs() -> u64 {
    10
}

fn default_input_dir() -> String {
    "input".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}
