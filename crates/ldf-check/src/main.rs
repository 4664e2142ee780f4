//! ldf-check: report corrupt lines in LDraw files and optionally rewrite them
//!
//! Usage: `ldf-check [--fix] [--config <file.ron>] <file.ldr>...`

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ldf_core::{
    ColorRegistry, CoreConfig, Document, DocumentLoader, LoadError, read_text, save_file,
};

const USAGE: &str = "Usage: ldf-check [--fix] [--config <file.ron>] <file.ldr>...";

/// Command line options
#[derive(Debug, Default, PartialEq)]
struct Options {
    fix: bool,
    config: Option<PathBuf>,
    files: Vec<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fix" => options.fix = true,
            "--config" => {
                let path = args.next().ok_or("--config needs a file argument")?;
                options.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option {}", flag)),
            file => options.files.push(PathBuf::from(file)),
        }
    }

    if options.files.is_empty() {
        return Err("No input files".to_string());
    }
    Ok(options)
}

/// Outcome of checking one file
#[derive(Debug, Default, PartialEq)]
struct FileReport {
    objects: usize,
    errors: usize,
    invalid_colors: usize,
}

fn check_file(
    path: &Path,
    config: &CoreConfig,
    colors: &ColorRegistry,
    fix: bool,
) -> Result<FileReport, LoadError> {
    let text = read_text(path)?;

    let mut loader = DocumentLoader::new(path.display().to_string(), &text, config.parse);
    while !loader.is_done() {
        let progress = loader.step(config.load_chunk_size.max(1));
        tracing::debug!(
            "{}: {}/{} lines",
            path.display(),
            progress.lines_done,
            progress.total_lines
        );
    }
    let document = loader.finish();

    let report = FileReport {
        objects: document.len(),
        errors: document.error_count(),
        invalid_colors: count_invalid_colors(&document, colors),
    };

    if fix {
        save_file(&document, path)?;
        tracing::info!("Rewrote {}", path.display());
    }
    Ok(report)
}

fn count_invalid_colors(document: &Document, colors: &ColorRegistry) -> usize {
    let mut count = 0;
    for (index, object) in document.iter().enumerate() {
        let Some(code) = object.color() else {
            continue;
        };
        if !colors.is_valid(code) {
            tracing::warn!(
                "{}:{}: unknown color {} on {}",
                document.name,
                index + 1,
                code,
                object.kind()
            );
            count += 1;
        }
    }
    count
}

fn load_config(path: Option<&Path>) -> CoreConfig {
    let Some(path) = path else {
        return CoreConfig::default();
    };
    match CoreConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load {}: {}; using defaults", path.display(), e);
            CoreConfig::default()
        }
    }
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ldf_check=info,ldf_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    let config = load_config(options.config.as_deref());
    let colors = config.color_registry();

    let mut failed = false;
    for path in &options.files {
        match check_file(path, &config, &colors, options.fix) {
            Ok(report) => {
                tracing::info!(
                    "{}: {} objects, {} errors, {} unknown colors",
                    path.display(),
                    report.objects,
                    report.errors,
                    report.invalid_colors
                );
                failed |= report.errors > 0;
            }
            Err(e) => {
                tracing::error!("{}", e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
