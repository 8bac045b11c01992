//! Runtime settings shared by the CLI and the web server.

use std::net::SocketAddr;

use crate::schedule::SubjectTable;

pub const DEFAULT_SHEET: &str = "xls";
pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// What a single conversion produces and where it reads from.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Worksheet holding the schedule rows.
    pub sheet_name: String,
    /// Emit `_ClassIndex.html` and `_TeachIndex.html`.
    pub include_indexes: bool,
    pub subjects: SubjectTable,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET.to_string(),
            include_indexes: true,
            subjects: SubjectTable::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub open_browser: bool,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// The address a browser should visit; wildcard binds map to localhost.
    pub fn url(&self) -> String {
        if self.addr.ip().is_unspecified() {
            format!("http://localhost:{}", self.addr.port())
        } else {
            format!("http://{}", self.addr)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ConvertOptions::default();
        assert_eq!(options.sheet_name, "xls");
        assert!(options.include_indexes);
    }

    #[test]
    fn test_server_url() {
        let mut config = ServerConfig {
            addr: DEFAULT_ADDR.parse().unwrap(),
            open_browser: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        };
        assert_eq!(config.url(), "http://127.0.0.1:5000");

        config.addr = "0.0.0.0:8080".parse().unwrap();
        assert_eq!(config.url(), "http://localhost:8080");
    }
}
