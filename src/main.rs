//! CLI entry point for timetable_pages.
//!
//! `serve` runs the upload form; `convert` turns a single export into a zip of
//! timetable pages without the web server.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use timetable_pages::config::{
    ConvertOptions, DEFAULT_ADDR, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SHEET, ServerConfig,
};
use timetable_pages::convert::{TIMESTAMP_FORMAT, build_schedule, render_documents};
use timetable_pages::package::package;
use timetable_pages::reader::SourceFormat;
use timetable_pages::render::Renderer;
use timetable_pages::schedule::SubjectTable;
use timetable_pages::server::{AppState, serve};
use timetable_pages::source::{load_source, source_file_name};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "timetable_pages")]
#[command(about = "Turn a class-schedule export into static timetable pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the upload form and return archives over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "TIMETABLE_ADDR", default_value = DEFAULT_ADDR)]
        addr: SocketAddr,

        /// Do not open a browser window on start
        #[arg(long, default_value_t = false)]
        no_browser: bool,

        /// Largest accepted upload, in bytes
        #[arg(long, env = "TIMETABLE_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
        max_upload_bytes: usize,

        #[command(flatten)]
        pages: PageArgs,
    },
    /// Convert an export from a file or URL into a zip archive
    Convert {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Archive to write
        #[arg(short, long, default_value = "output.zip")]
        output: PathBuf,

        /// Also dump the aggregated schedule as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Input format; guessed from the file extension when omitted
        #[arg(long, value_enum)]
        format: Option<SourceFormat>,

        #[command(flatten)]
        pages: PageArgs,
    },
}

#[derive(Args)]
struct PageArgs {
    /// Worksheet holding the schedule rows
    #[arg(long, env = "TIMETABLE_SHEET", default_value = DEFAULT_SHEET)]
    sheet: String,

    /// JSON file replacing the built-in subject department table
    #[arg(long, env = "TIMETABLE_SUBJECTS")]
    subjects: Option<PathBuf>,

    /// School name shown in page titles
    #[arg(long, env = "TIMETABLE_SCHOOL", default_value = "")]
    school: String,

    /// Leave out the class and teacher index pages
    #[arg(long, default_value_t = false)]
    no_index: bool,
}

impl PageArgs {
    fn options(&self) -> Result<ConvertOptions> {
        let subjects = match &self.subjects {
            Some(path) => SubjectTable::load(path)?,
            None => SubjectTable::default(),
        };
        Ok(ConvertOptions {
            sheet_name: self.sheet.clone(),
            include_indexes: !self.no_index,
            subjects,
        })
    }

    fn renderer(&self) -> Renderer {
        Renderer::new(self.school.as_str())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/timetable_pages.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("timetable_pages.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            addr,
            no_browser,
            max_upload_bytes,
            pages,
        } => {
            let config = ServerConfig {
                addr,
                open_browser: !no_browser,
                max_upload_bytes,
            };
            let state = AppState::new(pages.options()?, pages.renderer());
            serve(config, state).await?;
        }
        Commands::Convert {
            source,
            output,
            json,
            format,
            pages,
        } => {
            convert_source(&source, &output, json.as_deref(), format, &pages).await?;
        }
    }

    Ok(())
}

/// Converts one export to an archive on disk, optionally dumping the
/// aggregated schedule as JSON next to it.
#[tracing::instrument(skip(pages), fields(output = %output.display()))]
async fn convert_source(
    source: &str,
    output: &Path,
    json: Option<&Path>,
    format: Option<SourceFormat>,
    pages: &PageArgs,
) -> Result<()> {
    let bytes = load_source(source).await?;
    let format = format.unwrap_or_else(|| SourceFormat::from_file_name(source_file_name(source)));
    let options = pages.options()?;
    let renderer = pages.renderer();

    let schedule = build_schedule(&bytes, format, &options)?;

    if let Some(json_path) = json {
        let file = std::fs::File::create(json_path)
            .with_context(|| format!("creating {}", json_path.display()))?;
        serde_json::to_writer_pretty(file, &schedule)?;
        info!(path = %json_path.display(), "Schedule JSON written");
    }

    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let documents = render_documents(&schedule, &options, &renderer, &timestamp);
    let archive = package(&documents)?;

    std::fs::write(output, &archive).with_context(|| format!("writing {}", output.display()))?;
    info!(
        documents = documents.len(),
        bytes = archive.len(),
        "Archive written"
    );
    Ok(())
}
