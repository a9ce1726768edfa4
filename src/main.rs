mod consent;
mod dom;
mod fetch;
mod output;
mod parser;
mod render;
mod settings;
mod walker;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use render::Renderer;
use settings::Settings;

#[derive(Parser)]
#[command(name = "betterdocs_faq", about = "BetterDocs FAQ scraper")]
struct Cli {
    /// Domain name of site containing BetterDocs FAQ content
    #[arg(short, long)]
    domain: String,
    /// Relative path to main FAQ page
    #[arg(short, long, value_parser = trim_slashes)]
    path: String,
    /// Output directory to write scraped FAQ content to as separate HTML files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    #[arg(long, value_enum, ignore_case = true, default_value = "WARNING")]
    log_level: LogLevel,
    /// Reuse an existing mirror instead of running wget
    #[arg(long)]
    no_fetch: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum LogLevel {
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "DEBUG")]
    Debug,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Debug => "debug",
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO.log",
            LogLevel::Warning => "WARNING.log",
            LogLevel::Debug => "DEBUG.log",
        }
    }
}

fn trim_slashes(s: &str) -> Result<String, String> {
    Ok(s.trim_matches('/').to_string())
}

fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = consent::require_consent(&settings.consent_dir, settings.accept_terms.as_deref()) {
        println!("{}", e);
        return ExitCode::from(e.exit_code());
    }

    let cli = Cli::parse();
    match run(&cli, &settings) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, settings: &Settings) -> anyhow::Result<ExitCode> {
    let output_dir = cli.output_dir.clone().unwrap_or_else(|| {
        PathBuf::from(format!("{}-faq", chrono::Local::now().format("%Y%m%d_%H%M%S")))
    });
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;
    init_tracing(cli.log_level, &output_dir)?;

    let renderer = Renderer::new().context("loading templates")?;

    if cli.no_fetch {
        info!("Skipping retrieval, using existing mirror");
    } else {
        fetch::retrieve(settings, &cli.domain, &cli.path, &output_dir)?;
    }

    let root = settings.mirror_dir.join(&cli.domain).join(&cli.path);
    let faq = walker::walk(&root, &renderer)?;
    if !faq.skipped.is_empty() {
        info!("Skipped {} non-article entries under {}", faq.skipped.len(), root.display());
    }
    if faq.is_empty() {
        println!("No FAQ found for {}/{}", cli.domain, cli.path);
        return Ok(ExitCode::FAILURE);
    }

    let written = output::write_collection(&faq, &output_dir)?;
    println!(
        "{} FAQ from {}/{} stored to {}",
        written,
        cli.domain,
        cli.path,
        output_dir.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Log to stdout and `<output_dir>/<LEVEL>.log`; `RUST_LOG` wins over `--log-level`.
fn init_tracing(level: LogLevel, output_dir: &std::path::Path) -> anyhow::Result<()> {
    let log_path = output_dir.join(level.file_name());
    let log_file = File::create(&log_path)
        .with_context(|| format!("creating {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.directive().into()),
        )
        .with_ansi(false)
        .with_writer(std::io::stdout.and(Mutex::new(log_file)))
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))
}
