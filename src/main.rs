mod app;
mod components;
mod config;
mod error;
mod event;
mod handler;
mod source;
mod theme;
mod tree;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::AppConfig;
use crate::event::{Event, EventHandler};
use crate::source::watcher::SourceWatcher;
use crate::source::{spawn_children_fetch, JsonFileSource, RecordSource};
use crate::theme::resolve_theme;
use crate::tui::{install_panic_hook, Tui};

/// A terminal viewer for flat dot-path records as a collapsible tree.
#[derive(Parser, Debug)]
#[command(name = "ctt", version, about)]
struct Cli {
    /// JSON file holding the flat records
    file: PathBuf,

    /// Fetch children on demand instead of building the full tree upfront
    #[arg(long)]
    lazy: bool,

    /// Path to a config file (overrides the default lookup)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color scheme: dark, light, custom
    #[arg(long)]
    theme: Option<String>,

    /// Disable the file watcher (auto-reload)
    #[arg(long)]
    no_watch: bool,

    /// Keep siblings in record order instead of sorting them
    #[arg(long)]
    no_sort: bool,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,
}

impl Cli {
    /// Partial config carrying only the flags that were actually set.
    fn overrides(&self) -> AppConfig {
        let mut overrides = AppConfig::default();
        if self.lazy {
            overrides.general.lazy = Some(true);
        }
        if self.no_mouse {
            overrides.general.mouse = Some(false);
        }
        if self.no_sort {
            overrides.tree.sorted = Some(false);
        }
        if self.no_watch {
            overrides.watcher.enabled = Some(false);
        }
        if let Some(theme) = &self.theme {
            overrides.theme.scheme = Some(theme.clone());
        }
        overrides
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let file = cli.file.canonicalize().map_err(|_| {
        error::AppError::InvalidSource(format!("{} does not exist", cli.file.display()))
    })?;

    let lazy = config.lazy();
    let source: Arc<dyn RecordSource> = Arc::new(JsonFileSource::new(file.clone(), lazy));

    // Initial load happens before entering the alternate screen so a
    // broken file fails with a plain error message.
    let records = source.fetch_roots()?;

    let theme = resolve_theme(config.theme_scheme(), config.theme.custom.as_ref());
    let source_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.display().to_string());

    install_panic_hook();

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut app = App::new(
        &records,
        source,
        theme,
        config.use_icons(),
        config.sorted(),
        lazy,
        config.watcher_enabled(),
        source_name,
    );
    let mut events = EventHandler::new(Duration::from_millis(16));
    let event_tx = events.sender();

    let watcher = if config.watcher_enabled() {
        match SourceWatcher::new(
            &file,
            Duration::from_millis(config.debounce_ms()),
            event_tx.clone(),
        ) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                app.watcher_active = false;
                app.set_error(format!("Watcher unavailable: {e}"));
                None
            }
        }
    } else {
        app.watcher_active = false;
        None
    };

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key, &event_tx),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::RecordsLoaded(records) => {
                let pending = app.handle_records_loaded(&records);
                app.set_status_message(format!("Loaded {} records", records.len()));
                for path in pending {
                    spawn_children_fetch(app.source.clone(), path, event_tx.clone());
                }
            }
            Event::ChildrenLoaded {
                parent_path,
                records,
            } => {
                let pending = app.handle_children_loaded(&parent_path, &records);
                for path in pending {
                    spawn_children_fetch(app.source.clone(), path, event_tx.clone());
                }
            }
            Event::LoadFailed {
                parent_path,
                message,
            } => app.handle_load_failed(parent_path.as_deref(), &message),
            Event::SourceChanged => {
                app.set_status_message("Source changed, reloading...".to_string());
                source::spawn_roots_fetch(app.source.clone(), event_tx.clone());
            }
        }

        // Sync the watcher with the in-app toggle.
        if let Some(ref watcher) = watcher {
            if app.watcher_active && !watcher.is_active() {
                watcher.resume();
            } else if !app.watcher_active && watcher.is_active() {
                watcher.pause();
            }
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
