//! MOC Explorer CLI: Map-of-Content graph explorer for markdown vaults.
//!
//! Usage:
//!   moc-explorer scan [--json] [--vault DIR] [--folder PATH]
//!   moc-explorer render --out graph.svg [--filter TYPE] [--search TEXT]
//!   moc-explorer watch --out graph.svg
//!   moc-explorer open NAME
//!   moc-explorer config <show|path|set KEY VALUE>

use clap::{Parser, Subcommand};
use moc_explorer::render::svg;
use moc_explorer::{
    ExplorerView, LogNotifier, RefreshController, Settings, SettingsStore, TypeFilter,
    VaultStore, Viewport,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "moc-explorer",
    version,
    about = "Map-of-Content graph explorer for markdown vaults"
)]
struct Cli {
    /// Vault root directory
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,
    /// Settings file (default: <config dir>/moc-explorer/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// MOC folder, overriding the configured mocFolderPath
    #[arg(long, global = true)]
    folder: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the vault once and print the MOC graph
    Scan {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the diagram as SVG
    Render {
        /// Output file
        #[arg(long)]
        out: PathBuf,
        /// Show only one MOC type: all, main, sub or system
        #[arg(long, default_value = "all")]
        filter: TypeFilter,
        /// Highlight MOCs whose name or path contains this text
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
    },
    /// Keep an SVG diagram up to date as MOCs change (Ctrl-C to stop)
    Watch {
        /// Output file
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
    },
    /// Open a MOC by name or path
    Open {
        /// MOC name or vault-relative path
        name: String,
    },
    /// Inspect and edit settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Print the settings file location
    Path,
    /// Set one option, e.g. `set maxNodeSize 40`
    Set {
        /// Option name (mocFolderPath, showConnectionStrength, maxNodeSize,
        /// colorScheme, autoRefresh, minimumConnections, refreshDebounceMs)
        key: String,
        value: String,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("moc_explorer=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn settings_store(config: Option<PathBuf>) -> SettingsStore {
    match config {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::at_default_location(),
    }
}

fn load_settings(store: &SettingsStore, folder: Option<String>) -> Result<Settings, String> {
    let mut settings = store
        .load()
        .map_err(|e| format!("Failed to load settings: {}", e))?;
    if let Some(folder) = folder {
        settings.moc_folder_path = folder;
    }
    Ok(settings)
}

fn open_view(vault: &Path, settings: Settings, viewport: Viewport) -> Result<ExplorerView, String> {
    let store = VaultStore::open(vault)
        .map_err(|e| format!("Failed to open vault '{}': {}", vault.display(), e))?;
    let controller = RefreshController::new(Arc::new(store), settings.moc_folder_path.clone())
        .with_notifier(Arc::new(LogNotifier))
        .with_viewport(viewport);
    Ok(ExplorerView::new(Arc::new(controller), settings))
}

fn write_svg(view: &ExplorerView, out: &Path) -> Result<(), String> {
    std::fs::write(out, svg::render(&view.scene()))
        .map_err(|e| format!("Failed to write '{}': {}", out.display(), e))
}

async fn cmd_scan(view: &ExplorerView, json: bool) -> i32 {
    if let Err(e) = view.refresh().await {
        eprintln!("Error: {}", e);
        return 1;
    }
    let state = view.state();

    if json {
        return match serde_json::to_string_pretty(&state.snapshot) {
            Ok(out) => {
                println!("{}", out);
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        };
    }

    println!("{}", state.stats);
    if state.snapshot.is_empty() {
        println!("\nNo MOCs found.");
        return 0;
    }
    println!();
    println!("{:<32}  {:<6}  {:<9}  {:>5}  PATH", "NAME", "TYPE", "CATEGORY", "CONN");
    println!("{}", "-".repeat(80));
    for node in &state.snapshot.nodes {
        println!(
            "{:<32}  {:<6}  {:<9}  {:>5}  {}",
            node.name,
            node.moc_type.as_str(),
            node.category.as_str(),
            node.connections(),
            node.path
        );
    }
    if !state.snapshot.skipped.is_empty() {
        println!("\nSkipped {} unreadable MOC(s):", state.snapshot.skipped.len());
        for path in &state.snapshot.skipped {
            println!("  {}", path);
        }
    }
    0
}

async fn cmd_render(
    view: &mut ExplorerView,
    out: &Path,
    filter: TypeFilter,
    search: Option<&str>,
) -> i32 {
    if let Err(e) = view.refresh().await {
        eprintln!("Error: {}", e);
        return 1;
    }
    if filter != TypeFilter::All {
        view.filter_by_type(filter);
    }
    if let Some(query) = search {
        view.search(query);
    }
    match write_svg(view, out) {
        Ok(()) => {
            println!(
                "Wrote {} MOCs to {}",
                view.scene().markers.len(),
                out.display()
            );
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_watch(view: &mut ExplorerView, out: &Path) -> i32 {
    let mut updates = view.controller().subscribe();
    if let Err(e) = view.on_open().await {
        // The first scan failing is not fatal: a later change may fix it
        eprintln!("Error: {}", e);
        if !view.is_auto_refreshing() {
            return 1;
        }
    }
    if let Err(e) = write_svg(view, out) {
        eprintln!("Error: {}", e);
        return 1;
    }
    let _ = updates.borrow_and_update();
    println!("Watching for MOC changes, writing {} (Ctrl-C to stop)", out.display());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Err(e) = write_svg(view, out) {
                    eprintln!("Error: {}", e);
                }
            }
        }
    }
    view.on_close();
    0
}

async fn cmd_open(view: &ExplorerView, name: &str) -> i32 {
    if let Err(e) = view.refresh().await {
        eprintln!("Error: {}", e);
        return 1;
    }
    match view.open_by_name(name).await {
        Ok(()) => {
            println!("Opened '{}'", name);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_config(store: &SettingsStore, action: ConfigAction) -> i32 {
    match action {
        ConfigAction::Path => {
            println!("{}", store.path().display());
            0
        }
        ConfigAction::Show => match store.load().and_then(|s| s.to_json()) {
            Ok(json) => {
                println!("{}", json);
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        ConfigAction::Set { key, value } => {
            let result = store.load().and_then(|mut settings| {
                settings.set(&key, &value)?;
                store.save(&settings)
            });
            match result {
                Ok(()) => {
                    println!("Set {} = {}", key, value);
                    0
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            }
        }
    }
}

async fn run(command: Commands, vault: &Path, settings: Settings) -> i32 {
    let viewport = match &command {
        Commands::Render { width, height, .. } | Commands::Watch { width, height, .. } => {
            Viewport::new(*width, *height)
        }
        _ => Viewport::default(),
    };
    let mut view = match open_view(vault, settings, viewport) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match command {
        Commands::Scan { json } => cmd_scan(&view, json).await,
        Commands::Render {
            out,
            filter,
            search,
            ..
        } => cmd_render(&mut view, &out, filter, search.as_deref()).await,
        Commands::Watch { out, .. } => cmd_watch(&mut view, &out).await,
        Commands::Open { name } => cmd_open(&view, &name).await,
        Commands::Config { .. } => 0,
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let settings_store = settings_store(cli.config);

    let code = match cli.command {
        Commands::Config { action } => cmd_config(&settings_store, action),
        command => match load_settings(&settings_store, cli.folder) {
            Ok(mut settings) => {
                if matches!(command, Commands::Watch { .. }) {
                    settings.auto_refresh = true;
                }
                run(command, &cli.vault, settings).await
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
    };
    std::process::exit(code);
}
