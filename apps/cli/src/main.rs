//! Command-line front end for modpack sync
//!
//! Reads a modpack file, brings the mods directory in line with it and
//! moves everything else into the trash directory.

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use modsync::downloader::config::DEFAULT_CATALOG_ROOT;
use modsync::integrations::{DEFAULT_MODS_DIR, DEFAULT_TRASH_DIR};
use modsync::{
    DEFAULT_CONFIG_FILE, DownloadConfig, IntoProgressCallback, ModpackSync, SyncError, SyncReport,
    TracingProgressReporter, load_modpack,
};

#[derive(Clone, Debug, Parser)]
#[command(name = "modsync", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
    /// Modpack definition file
    #[arg(short = 'c', long = "modpack-config", default_value = DEFAULT_CONFIG_FILE)]
    modpack_config: PathBuf,

    /// Directory holding the artifact files
    #[arg(short = 'd', long = "mods-dir", default_value = DEFAULT_MODS_DIR)]
    mods_dir: PathBuf,

    /// Where unexpected files are moved; relative paths are inside the mods dir
    #[arg(short = 't', long = "trash-dir", default_value = DEFAULT_TRASH_DIR)]
    trash_dir: PathBuf,

    /// Catalog serving the listing pages
    #[arg(long = "catalog-url", default_value = DEFAULT_CATALOG_ROOT)]
    catalog_url: String,

    /// Seconds a download may go without receiving data
    #[arg(long = "read-timeout", default_value_t = 120)]
    read_timeout: u64,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

async fn run(args: Args) -> Result<SyncReport, SyncError> {
    let modpack = load_modpack(&args.modpack_config).await?;
    let config = DownloadConfig::builder()
        .catalog_root(args.catalog_url)
        .read_timeout(Duration::from_secs(args.read_timeout))
        .build();

    let report = ModpackSync::new(modpack)
        .mods_dir(&args.mods_dir)
        .trash_dir(&args.trash_dir)
        .config(config)
        .progress(TracingProgressReporter::new(args.verbose).into_callback())
        .run()
        .await?;

    for skipped in &report.skipped {
        tracing::warn!("Not fetched: {} ({})", skipped.artifact, skipped.error);
    }
    Ok(report)
}

/// Log the outcome of a run and pick the process exit status
fn exit_status(result: &Result<SyncReport, SyncError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(error) => {
            match error {
                SyncError::Download(download) => {
                    tracing::error!(
                        category = error.category(),
                        severity = ?download.severity(),
                        "{}",
                        error
                    );
                    if let Some(suggestion) = download.suggestion() {
                        tracing::error!("{}", suggestion);
                    }
                }
                _ => tracing::error!(category = error.category(), "{}", error),
            }
            error.exit_code()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    logging::setup_logging(args.verbose).context("Failed to initialize logging")?;

    let result = run(args).await;
    Ok(ExitCode::from(exit_status(&result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODPACK: &str = "[mods]\nfoo\n\n[whitelist]\n\n[metadata]\ngame_version: 1.12.2\n";

    fn args_for(root: &Path, server: &MockServer) -> Args {
        let config = root.join("modpack.conf");
        let mods = root.join("mods");
        Args::parse_from([
            "modsync".to_string(),
            "-c".to_string(),
            config.display().to_string(),
            "-d".to_string(),
            mods.display().to_string(),
            "--catalog-url".to_string(),
            server.uri(),
        ])
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["modsync"]);
        assert_eq!(args.modpack_config, PathBuf::from("modpack.conf"));
        assert_eq!(args.mods_dir, PathBuf::from("mods"));
        assert_eq!(args.trash_dir, PathBuf::from("trash"));
        assert_eq!(args.catalog_url, DEFAULT_CATALOG_ROOT);
        assert_eq!(args.read_timeout, 120);
        assert!(!args.verbose);
    }

    #[tokio::test]
    async fn test_run_with_skipped_artifact_exits_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/foo/files"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let root = tempdir().unwrap();
        tokio::fs::write(root.path().join("modpack.conf"), MODPACK).await.unwrap();

        let result = run(args_for(root.path(), &server)).await;

        assert_eq!(result.as_ref().map(|r| r.skipped.len()).ok(), Some(1));
        assert_eq!(exit_status(&result), 0);
    }

    #[tokio::test]
    async fn test_config_error_exits_one() {
        let server = MockServer::start().await;
        let root = tempdir().unwrap();
        tokio::fs::write(root.path().join("modpack.conf"), "[mods]\nfoo\n").await.unwrap();

        let result = run(args_for(root.path(), &server)).await;

        assert!(matches!(result, Err(SyncError::Config(_))));
        assert_eq!(exit_status(&result), 1);
    }

    #[tokio::test]
    async fn test_missing_config_file_exits_one() {
        let server = MockServer::start().await;
        let root = tempdir().unwrap();

        let result = run(args_for(root.path(), &server)).await;

        assert!(matches!(result, Err(SyncError::ConfigRead { .. })));
        assert_eq!(exit_status(&result), 1);
    }

    #[tokio::test]
    async fn test_missing_download_link_exits_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/foo/files"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
            .mount(&server)
            .await;
        let root = tempdir().unwrap();
        tokio::fs::write(root.path().join("modpack.conf"), MODPACK).await.unwrap();

        let result = run(args_for(root.path(), &server)).await;

        assert!(matches!(result, Err(SyncError::Download(_))));
        assert_eq!(exit_status(&result), 1);
    }
}
