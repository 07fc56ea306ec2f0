//! Submit one image to a lookalike matching service and print the match.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lookalike_core::validate::{UNKNOWN_MIME_TYPE, mime_for_filename};
use lookalike_core::{ClientConfig, Session, SessionError, UploadFile};
use tracing_subscriber::EnvFilter;

mod driver;
mod transport;

use driver::TerminalView;
use transport::HttpTransport;

/// Find your doppelgänger from the command line.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Base URL of the matching service.
    #[arg(long, global = true, default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Endpoint path (or absolute URL), overriding the configured one.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Largest accepted upload in bytes, overriding the configured limit.
    #[arg(long, global = true, value_name = "BYTES")]
    max_upload_bytes: Option<u64>,

    /// JSON file with client settings; flags take precedence.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` wins.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload an image and print its closest match.
    Match {
        /// Image to upload.
        image: PathBuf,
    },
}

/// Failures that stop the CLI.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to set up HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to start runtime: {0}")]
    Runtime(std::io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Read settings: defaults, then the config file, then flags.
fn config_from_cli(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&text).map_err(|source| CliError::Config {
                path: path.clone(),
                source,
            })?
        }
        None => ClientConfig::default(),
    };
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint.clone_from(endpoint);
    }
    if let Some(limit) = cli.max_upload_bytes {
        config.max_upload_bytes = limit;
    }
    Ok(config)
}

/// Join the server base URL with the endpoint, unless the endpoint is
/// already absolute.
fn resolve_url(server: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_owned();
    }
    let base = server.trim_end_matches('/');
    let path = endpoint.trim_start_matches('/');
    format!("{base}/{path}")
}

/// MIME type from the image's magic bytes, else from its extension.
fn sniff_mime_type(name: &str, bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type())
        .or_else(|| mime_for_filename(name))
        .unwrap_or(UNKNOWN_MIME_TYPE)
}

fn load_image(path: &Path) -> Result<UploadFile, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let mime_type = sniff_mime_type(&name, &bytes);
    tracing::debug!(name = %name, mime_type, size = bytes.len(), "loaded image");
    Ok(UploadFile::new(name, mime_type, bytes))
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = config_from_cli(cli)?;
    let url = resolve_url(&cli.server, &config.endpoint);
    let Command::Match { image } = &cli.command;

    let file = load_image(image)?;
    let transport = HttpTransport::new(url)?;
    let mut session = Session::new(config);
    let mut view = TerminalView::new(std::io::stdout(), std::io::stderr());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(driver::run(&mut session, &transport, &mut view, file))?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        // Already printed by the view.
        Err(CliError::Session(_)) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_joined_to_server() {
        assert_eq!(
            resolve_url("http://127.0.0.1:5000/", "/find-match"),
            "http://127.0.0.1:5000/find-match"
        );
        assert_eq!(
            resolve_url("http://h", "https://other/api"),
            "https://other/api"
        );
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "lookalike-cli",
            "--endpoint",
            "/api/match",
            "--max-upload-bytes",
            "1024",
            "match",
            "me.jpg",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.endpoint, "/api/match");
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.share_notice, ClientConfig::DEFAULT_SHARE_NOTICE);
    }

    #[test]
    fn magic_bytes_beat_the_extension() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(sniff_mime_type("photo.jpg", &png), "image/png");
        assert_eq!(sniff_mime_type("photo.jpg", b"garbage"), "image/jpeg");
        assert_eq!(sniff_mime_type("notes.txt", b"hello"), UNKNOWN_MIME_TYPE);
    }
}
