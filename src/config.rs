//! Command line and environment configuration.

use crate::domain::ResponseMode;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:7071";
const DEFAULT_LOG_FILE_NAME: &str = "symbis-scan.log";

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "symbis-scan",
    version,
    about = "Terminal intake for the Symbis AI scan report"
)]
pub struct Settings {
    /// Origin of the report service; the endpoint path is fixed
    #[arg(long, env = "SYMBIS_SCAN_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// What the service returns on success: informational or document
    #[arg(long, env = "SYMBIS_SCAN_MODE", default_value = "informational")]
    pub mode: ResponseMode,

    /// Directory downloaded reports are written to
    #[arg(long, value_name = "DIR", env = "SYMBIS_SCAN_DOWNLOAD_DIR", default_value = ".")]
    pub download_dir: PathBuf,

    /// Log file; the terminal itself is taken by the interface
    #[arg(long, value_name = "PATH", env = "SYMBIS_SCAN_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE_NAME))
    }
}
