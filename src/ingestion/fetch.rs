//! Bounded download of a remote document into scoped temporary storage.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::types::QaError;

/// Streams the body behind `locator` into a fresh temporary file carrying
/// the resolved suffix.
///
/// `budget` bounds the whole transfer, from connect through the last body
/// byte. The returned handle owns the file: dropping it removes the artifact
/// on every exit path, including extraction failures downstream. Non-success
/// statuses and timeouts surface as transport errors; there is no
/// partial-file salvage.
pub async fn fetch_to_temp(
    client: &Client,
    locator: &str,
    suffix: &str,
    budget: Duration,
) -> Result<NamedTempFile, QaError> {
    let temp = tempfile::Builder::new()
        .prefix("askdoc-")
        .suffix(suffix)
        .tempfile()?;

    let response = client
        .get(locator)
        .timeout(budget)
        .send()
        .await?
        .error_for_status()?;

    let mut file = tokio::fs::File::create(temp.path()).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;

    Ok(temp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;

    #[tokio::test]
    async fn writes_the_body_into_a_suffixed_temp_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/doc.txt");
            then.status(200).body("hello from the document");
        });

        let client = Client::new();
        let temp = fetch_to_temp(
            &client,
            &server.url("/doc.txt"),
            ".txt",
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert!(temp.path().to_string_lossy().ends_with(".txt"));
        let contents = std::fs::read_to_string(temp.path()).unwrap();
        assert_eq!(contents, "hello from the document");
    }

    #[tokio::test]
    async fn temp_file_is_removed_when_the_handle_drops() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/doc.txt");
            then.status(200).body("payload");
        });

        let client = Client::new();
        let temp = fetch_to_temp(
            &client,
            &server.url("/doc.txt"),
            ".txt",
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        let path = temp.path().to_path_buf();
        assert!(path.exists());
        drop(temp);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/doc.txt");
            then.status(500);
        });

        let client = Client::new();
        let err = fetch_to_temp(
            &client,
            &server.url("/doc.txt"),
            ".txt",
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, QaError::Transport(_)));
    }
}
