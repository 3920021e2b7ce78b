//! npage CLI
//!
//! Page through a file's lines (or a JSON array) or flip between files as
//! tabs. Arrow keys, Home and End navigate; q, Esc or Ctrl+C quit.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;
use tracing_subscriber::EnvFilter;

use npage::{
    CancelToken, DisplaySurface, PagerConfig, SessionEnd, SwitchableTab, Tab, display_tabs,
    display_tabs_async, paginate, paginate_async, write_item,
};

#[derive(Parser)]
#[command(name = "npage")]
#[command(about = "Page through data or switch between tabs in the terminal")]
#[command(version)]
struct Cli {
    /// Write logs to this file (RUST_LOG selects the level)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Page through the lines of a file, or stdin
    Pages {
        /// File to read (default: stdin)
        path: Option<PathBuf>,

        /// Treat the input as a JSON array and page through its elements
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        options: SessionArgs,
    },

    /// Show each file as a tab
    Tabs {
        /// Files to show, one tab each
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        options: SessionArgs,
    },
}

#[derive(clap::Args)]
struct SessionArgs {
    /// Items per page
    #[arg(long, allow_negative_numbers = true)]
    page_size: Option<i64>,

    /// Milliseconds between redraws
    #[arg(long, allow_negative_numbers = true)]
    interval: Option<i64>,

    /// JSON file with `page_size` and/or `interval_ms`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wait between redraws on an async runtime instead of sleeping
    #[arg(long)]
    cooperative: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let result = match cli.command {
        Commands::Pages { path, json, options } => cmd_pages(path.as_deref(), json, &options),
        Commands::Tabs { paths, options } => cmd_tabs(&paths, &options),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// SETUP
// ============================================================================

/// Log to a file; the terminal belongs to the session while it runs.
fn init_logging(path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Config file first, then flags on top.
fn resolve_config(args: &SessionArgs) -> Result<PagerConfig, String> {
    let base = match &args.config {
        Some(path) => load_config(path)?,
        None => PagerConfig::default(),
    };
    base.with_overrides(args.page_size, args.interval).map_err(|e| e.to_string())
}

fn load_config(path: &Path) -> Result<PagerConfig, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Keys outside the navigation set: q, Esc and Ctrl+C end the session.
fn quit_keys(cancel: &CancelToken) -> impl FnMut(KeyEvent) + Send {
    let cancel = cancel.clone();
    move |key: KeyEvent| {
        let ctrl_c =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            cancel.cancel();
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())
}

// ============================================================================
// INPUT LOADING
// ============================================================================

fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(p) => fs::read_to_string(p).map_err(|e| format!("{}: {}", p.display(), e)),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| e.to_string())?;
            Ok(text)
        }
    }
}

/// Split input into pageable items: lines, or JSON array elements.
fn parse_items(text: &str, json: bool) -> Result<Vec<String>, String> {
    if !json {
        return Ok(text.lines().map(str::to_string).collect());
    }
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    match value {
        serde_json::Value::Array(elements) => {
            Ok(elements.iter().map(|v| v.to_string()).collect())
        }
        _ => Err("expected a JSON array at the top level".to_string()),
    }
}

/// One tab per file: header is the file name, body is its lines.
fn load_tabs(paths: &[PathBuf]) -> Result<SwitchableTab<'static>, String> {
    let mut tabs = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let header = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        tabs.push(Tab::new(header, move |surface: &mut dyn DisplaySurface| {
            for line in &lines {
                surface.write_line(line)?;
            }
            Ok(())
        }));
    }
    SwitchableTab::new(tabs).map_err(|e| e.to_string())
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_pages(path: Option<&Path>, json: bool, args: &SessionArgs) -> Result<(), String> {
    let config = resolve_config(args)?;
    let items = parse_items(&read_input(path)?, json)?;

    let cancel = CancelToken::new();
    let mut on_other_key = quit_keys(&cancel);

    let end = if args.cooperative {
        runtime()?.block_on(paginate_async(
            &items,
            write_item,
            &cancel,
            &config,
            Some(&mut on_other_key),
        ))
    } else {
        paginate(&items, write_item, &cancel, &config, Some(&mut on_other_key))
    }
    .map_err(|e| e.to_string())?;

    if end == SessionEnd::EmptyInput {
        println!("Nothing to page through.");
    }
    info!(?end, items = items.len(), "paging finished");
    Ok(())
}

fn cmd_tabs(paths: &[PathBuf], args: &SessionArgs) -> Result<(), String> {
    let config = resolve_config(args)?;
    let mut tabs = load_tabs(paths)?;

    let cancel = CancelToken::new();
    let mut on_other_key = quit_keys(&cancel);

    let end = if args.cooperative {
        runtime()?.block_on(display_tabs_async(
            &mut tabs,
            &cancel,
            &config,
            Some(&mut on_other_key),
        ))
    } else {
        display_tabs(&mut tabs, &cancel, &config, Some(&mut on_other_key))
    }
    .map_err(|e| e.to_string())?;

    info!(?end, last_tab = %tabs.current().header, "tabs finished");
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
