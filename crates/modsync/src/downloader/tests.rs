//! Unit tests for the downloader module against a mock catalog

use super::*;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const VERSION_FILTER: &str = "2020709689%3A6756";
const MARKED_CLASSES: &str = "button tip fa-icon-download icon-only";

/// Helper struct to capture progress events during testing
#[derive(Debug, Default)]
struct ProgressCapture {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl ProgressCapture {
    fn new() -> Self {
        Self::default()
    }

    fn get_callback(&self) -> ProgressCallback {
        let events = self.events.clone();
        Arc::new(move |event| {
            events.lock().unwrap().push(event);
        })
    }

    fn get_events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

fn listing_page(href: &str) -> String {
    format!(
        r#"<html><body>
            <a class="button fa-icon-download" href="/projects/latest/download">Download latest</a>
            <table class="listing">
              <tr><td><a class="{}" href="{}"></a></td></tr>
            </table>
        </body></html>"#,
        MARKED_CLASSES, href
    )
}

fn downloader_for(server: &MockServer) -> Downloader {
    let config = DownloadConfig::builder().catalog_root(server.uri()).build();
    Downloader::new(config).unwrap()
}

/// Listing page for `artifact` whose marked link redirects to `/cdn/{filename}`
async fn mount_artifact(server: &MockServer, artifact: &str, filename: &str, body: &[u8]) {
    let download_path = format!("/projects/{}/files/1234/download", artifact);
    let cdn_path = format!("/cdn/files/1234/{}", filename);

    Mock::given(method("GET"))
        .and(path(format!("/projects/{}/files", artifact)))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&download_path)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(download_path))
        .respond_with(ResponseTemplate::new(302).insert_header("location", format!("{}{}", server.uri(), cdn_path)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(cdn_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

async fn fetch(downloader: &Downloader, artifact: &str, mods_dir: &Path) -> Result<DownloadOutcome> {
    downloader
        .fetch_artifact(&ArtifactRequest::new(artifact, VERSION_FILTER), mods_dir, None)
        .await
}

#[cfg(test)]
mod fetch_artifact_tests {
    use super::*;

    #[tokio::test]
    async fn test_download_uses_final_redirect_name() {
        let server = MockServer::start().await;
        mount_artifact(&server, "foo", "foo-2.3.jar", b"foo jar").await;
        let mods = tempdir().unwrap();

        let outcome = fetch(&downloader_for(&server), "foo", mods.path()).await.unwrap();

        match outcome {
            DownloadOutcome::Downloaded { filename, size } => {
                assert_eq!(filename, "foo-2.3.jar");
                assert_eq!(size, 7);
            }
            other => panic!("Expected Downloaded, got {:?}", other),
        }
        assert_eq!(tokio::fs::read(mods.path().join("foo-2.3.jar")).await.unwrap(), b"foo jar");
        assert!(!mods.path().join("download").exists());
    }

    #[tokio::test]
    async fn test_listing_request_carries_version_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/foo/files"))
            .and(query_param("filter-game-version", "2020709689:6756"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page("/dl/foo.jar")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dl/foo.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
            .mount(&server)
            .await;
        let mods = tempdir().unwrap();

        let outcome = fetch(&downloader_for(&server), "foo", mods.path()).await.unwrap();

        assert_eq!(outcome.filename(), Some("foo.jar"));
    }

    #[tokio::test]
    async fn test_percent_encoded_filename_is_decoded() {
        let server = MockServer::start().await;
        mount_artifact(&server, "baubles", "Baubles-1.12-1.5.2%2B%20fix.jar", b"b").await;
        let mods = tempdir().unwrap();

        let outcome = fetch(&downloader_for(&server), "baubles", mods.path()).await.unwrap();

        assert_eq!(outcome.filename(), Some("Baubles-1.12-1.5.2+ fix.jar"));
        assert!(mods.path().join("Baubles-1.12-1.5.2+ fix.jar").exists());
    }

    #[tokio::test]
    async fn test_page_failure_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/gone/files"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let mods = tempdir().unwrap();
        let progress = ProgressCapture::new();

        let outcome = downloader_for(&server)
            .fetch_artifact(
                &ArtifactRequest::new("gone", VERSION_FILTER),
                mods.path(),
                Some(progress.get_callback()),
            )
            .await
            .unwrap();

        match outcome {
            DownloadOutcome::Skipped { artifact, error } => {
                assert_eq!(artifact, "gone");
                assert!(matches!(error, DownloadError::PageUnavailable { status: 404, .. }));
            }
            other => panic!("Expected Skipped, got {:?}", other),
        }
        assert!(progress
            .get_events()
            .iter()
            .any(|e| matches!(e, ProgressEvent::Skipped { artifact, .. } if artifact == "gone")));
    }

    #[tokio::test]
    async fn test_missing_link_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/foo/files"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><a class="button fa-icon-download" href="/latest">Latest</a></body></html>"#,
            ))
            .mount(&server)
            .await;
        let mods = tempdir().unwrap();

        let err = fetch(&downloader_for(&server), "foo", mods.path()).await.unwrap_err();

        assert!(matches!(err, DownloadError::LinkNotFound { ref artifact, .. } if artifact == "foo"));
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn test_file_failure_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/foo/files"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page("/dl/foo.jar")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dl/foo.jar"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let mods = tempdir().unwrap();

        let outcome = fetch(&downloader_for(&server), "foo", mods.path()).await.unwrap();

        match outcome {
            DownloadOutcome::Skipped { error, .. } => {
                assert!(matches!(error, DownloadError::FileUnavailable { status: 503, .. }));
            }
            other => panic!("Expected Skipped, got {:?}", other),
        }
        assert!(!mods.path().join("foo.jar").exists());
    }

    #[tokio::test]
    async fn test_existing_file_is_left_alone() {
        let server = MockServer::start().await;
        mount_artifact(&server, "foo", "foo-2.3.jar", b"remote bytes").await;
        let mods = tempdir().unwrap();
        let downloader = downloader_for(&server);

        let first = fetch(&downloader, "foo", mods.path()).await.unwrap();
        assert!(matches!(first, DownloadOutcome::Downloaded { .. }));

        // Local edits survive: existence alone marks the artifact current
        let dest = mods.path().join("foo-2.3.jar");
        tokio::fs::write(&dest, b"local copy").await.unwrap();
        let progress = ProgressCapture::new();

        let second = downloader
            .fetch_artifact(
                &ArtifactRequest::new("foo", VERSION_FILTER),
                mods.path(),
                Some(progress.get_callback()),
            )
            .await
            .unwrap();

        assert!(matches!(second, DownloadOutcome::AlreadyPresent { ref filename } if filename == "foo-2.3.jar"));
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"local copy");
        let events = progress.get_events();
        assert!(!events.iter().any(|e| matches!(e, ProgressEvent::DownloadStarted { .. })));
        assert!(events.iter().any(|e| matches!(e, ProgressEvent::AlreadyPresent { .. })));
    }

    #[tokio::test]
    async fn test_progress_events_in_order() {
        let server = MockServer::start().await;
        mount_artifact(&server, "foo", "foo-2.3.jar", b"foo jar").await;
        let mods = tempdir().unwrap();
        let progress = ProgressCapture::new();

        downloader_for(&server)
            .fetch_artifact(
                &ArtifactRequest::new("foo", VERSION_FILTER),
                mods.path(),
                Some(progress.get_callback()),
            )
            .await
            .unwrap();

        let kinds: Vec<&str> = progress
            .get_events()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::PageRequested { .. } => Some("page"),
                ProgressEvent::LinkResolved { .. } => Some("link"),
                ProgressEvent::Redirected { .. } => Some("redirect"),
                ProgressEvent::DownloadStarted { .. } => Some("started"),
                ProgressEvent::DownloadComplete { .. } => Some("complete"),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec!["page", "link", "redirect", "started", "complete"]);
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_skipped() {
        let config = DownloadConfig::builder().catalog_root("http://127.0.0.1:9").build();
        let downloader = Downloader::new(config).unwrap();
        let mods = tempdir().unwrap();

        let outcome = fetch(&downloader, "foo", mods.path()).await.unwrap();

        assert!(outcome.is_skipped());
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_recoverability_split() {
        let page = DownloadError::PageUnavailable {
            artifact: "a".to_string(),
            url: "http://example.com".to_string(),
            status: 500,
        };
        let link = DownloadError::LinkNotFound {
            artifact: "a".to_string(),
            url: "http://example.com".to_string(),
        };
        let fs = DownloadError::FileSystem {
            path: PathBuf::from("/mods/a.jar"),
            operation: FileOperation::Write,
            source: std::io::Error::other("disk full"),
        };

        assert!(page.is_recoverable());
        assert!(!link.is_recoverable());
        assert!(!fs.is_recoverable());
    }

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Low < ErrorSeverity::Medium);
        assert!(ErrorSeverity::Medium < ErrorSeverity::High);
        assert!(ErrorSeverity::High < ErrorSeverity::Critical);
    }

    #[test]
    fn test_link_not_found_has_suggestion() {
        let err = DownloadError::LinkNotFound {
            artifact: "foo".to_string(),
            url: "http://example.com/projects/foo/files".to_string(),
        };
        assert_eq!(err.category(), "link_not_found");
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.suggestion().unwrap().contains("game_version"));
        assert!(err.to_string().contains("'foo'"));
    }

    #[test]
    fn test_filesystem_error_message() {
        let err = DownloadError::FileSystem {
            path: PathBuf::from("/mods/a.jar"),
            operation: FileOperation::CreateDir,
            source: std::io::Error::other("denied"),
        };
        assert_eq!(
            err.to_string(),
            "File operation failed on '/mods/a.jar' while creating directory"
        );
    }
}
