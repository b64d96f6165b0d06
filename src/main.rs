//! Sheetdesk - manage spreadsheets stored on a sheet backend from the terminal

mod backend;
mod config;
mod tui;

use anyhow::Context;
use sheetdesk_core::Editor;
use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use backend::HttpBackend;

fn print_usage() {
    eprintln!("Usage: sheetdesk [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <FILE>           Load settings from this TOML file");
    eprintln!("  --backend <URL>           Sheet backend base URL (default: http://localhost:5000)");
    eprintln!("  --import <FILE>           Start in the editor with this spreadsheet imported");
    eprintln!("  -o, --output <FILE>       With --import: export to this .xlsx file (non-interactive)");
    eprintln!("  -h, --help                Print help");
}

/// Send log records to `path`; the terminal belongs to the UI.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

/// Import `input` and export it as xlsx to `output`.
fn convert(input: &Path, output: &Path) -> anyhow::Result<()> {
    let mut editor = Editor::new();
    editor
        .import_file(input)
        .with_context(|| format!("Failed to import {}", input.display()))?;
    editor
        .export_to_path(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut config_file: Option<PathBuf> = None;
    let mut backend_url: Option<String> = None;
    let mut import_file: Option<PathBuf> = None;
    let mut output_file: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            "--backend" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --backend requires a URL");
                    std::process::exit(1);
                }
                backend_url = Some(args[i].to_string());
            }
            "--import" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --import requires a file path");
                    std::process::exit(1);
                }
                import_file = Some(PathBuf::from(&args[i]));
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a file path");
                    std::process::exit(1);
                }
                output_file = Some(PathBuf::from(&args[i]));
            }
            arg => {
                eprintln!("Error: Unknown argument: {}", arg);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let (mut config, warnings) = config::load_config(config_file.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    if let Some(url) = backend_url {
        config.backend_url = url.trim_end_matches('/').to_string();
    }
    if let Err(e) = init_logging(&config.log_file) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }
    log::info!("backend: {}", config.backend_url);

    if let Some(output_path) = output_file {
        let Some(input_path) = import_file else {
            eprintln!("Error: --output requires --import");
            std::process::exit(1);
        };
        if let Err(e) = convert(&input_path, &output_path) {
            log::error!("conversion failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        println!("Exported to {}", output_path.display());
        return;
    }

    let backend = match HttpBackend::new(&config.backend_url, config.request_timeout) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = tui::App::new(Box::new(backend), config.download_dir);
    if let Some(path) = import_file {
        app.open_editor();
        app.import_path(&path);
    }

    if let Err(e) = tui::run(&mut app) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
