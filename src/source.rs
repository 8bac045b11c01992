//! Loads an export from a local file or over HTTP.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Returns the raw bytes behind `source`, a path or an `http(s)` URL.
#[tracing::instrument]
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if is_url(source) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let response = client
            .get(source)
            .send()
            .await
            .with_context(|| format!("fetching {source}"))?
            .error_for_status()?;
        response.bytes().await?.to_vec()
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("reading {source}"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

/// File name used to guess the container format of `source`.
pub fn source_file_name(source: &str) -> &str {
    let path = if is_url(source) {
        source.split(['?', '#']).next().unwrap_or(source)
    } else {
        source
    };
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_name() {
        assert_eq!(source_file_name("exports/課表.xls"), "課表.xls");
        assert_eq!(source_file_name("C:\\data\\rows.csv"), "rows.csv");
        assert_eq!(
            source_file_name("https://example.org/files/schedule.xlsx?token=1"),
            "schedule.xlsx"
        );
        assert_eq!(source_file_name("plain"), "plain");
    }

    #[tokio::test]
    async fn test_load_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "a,b\n").unwrap();

        let bytes = load_source(path.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, b"a,b\n");
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        assert!(load_source("/nonexistent/rows.csv").await.is_err());
    }
}
