//! Application state shared by the UI
//!
//! Owns the catalog, the filter state and the derived view. Ingestion runs on
//! a background thread and reports back over a channel; the UI calls
//! [`Session::poll`] once per frame. Every filter change recomputes the view
//! from one consistent `(catalog, state)` pair and persists the preferences.

use std::process::Child;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::filter::recompute;
use crate::ingest::{ingest, PlaylistFetcher};
use crate::models::{Catalog, Channel, FilterState, FilterView, LoadStatus};
use crate::player;
use crate::preferences::{PreferenceStore, Preferences};

const MAX_LOG_LINES: usize = 500;

/// Background task messages
pub enum TaskResult {
    CatalogLoaded { generation: u64, catalog: Catalog },
    CatalogFailed { generation: u64, error: String },
    PlayerLog(String),
}

pub struct Session {
    config: AppConfig,
    fetcher: Arc<dyn PlaylistFetcher>,
    prefs: PreferenceStore,
    saved: Preferences,

    catalog: Catalog,
    state: FilterState,
    view: FilterView,
    status: LoadStatus,
    selected: Option<Channel>,

    // Bumped on every ingestion so results of a superseded run are ignored
    generation: u64,
    task_sender: Sender<TaskResult>,
    task_receiver: Receiver<TaskResult>,
    player: Option<Child>,
    console_log: Vec<String>,
}

impl Session {
    /// Restores preferences immediately; the catalog starts empty until
    /// [`Session::start_ingest`] completes
    pub fn new(config: AppConfig, fetcher: Arc<dyn PlaylistFetcher>, prefs: PreferenceStore) -> Self {
        let saved = prefs.load();
        let state: FilterState = saved.clone().into();
        let catalog: Catalog = Vec::<Channel>::new().into();
        let view = recompute(&catalog, &state);
        let (task_sender, task_receiver) = channel();

        Self {
            config,
            fetcher,
            prefs,
            saved,
            catalog,
            state,
            view,
            status: LoadStatus::Loading,
            selected: None,
            generation: 0,
            task_sender,
            task_receiver,
            player: None,
            console_log: Vec::new(),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn view(&self) -> &FilterView {
        &self.view
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selected(&self) -> Option<&Channel> {
        self.selected.as_ref()
    }

    pub fn console_log(&self) -> &[String] {
        &self.console_log
    }

    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        self.console_log.push(format!("[{}] {}", timestamp, message));
        if self.console_log.len() > MAX_LOG_LINES {
            let excess = self.console_log.len() - MAX_LOG_LINES;
            self.console_log.drain(..excess);
        }
    }

    /// Fetch every configured source in the background. The current catalog
    /// stays published until the new one is complete.
    pub fn start_ingest(&mut self) {
        self.generation += 1;
        self.status = LoadStatus::Loading;

        let generation = self.generation;
        let sources = self.config.sources.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let sender = self.task_sender.clone();

        self.log(&format!("[INFO] Loading {} playlist sources", sources.len()));

        thread::spawn(move || {
            let message = match ingest(&sources, fetcher.as_ref()) {
                Ok(catalog) => TaskResult::CatalogLoaded { generation, catalog },
                Err(e) => TaskResult::CatalogFailed {
                    generation,
                    error: e.to_string(),
                },
            };
            let _ = sender.send(message);
        });
    }

    /// Manual retry after a failed load; always a full re-fetch
    pub fn retry(&mut self) {
        info!("Retrying playlist ingestion");
        self.start_ingest();
    }

    /// Drain background results. Returns true when anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        while let Ok(result) = self.task_receiver.try_recv() {
            match result {
                TaskResult::CatalogLoaded { generation, catalog } if generation == self.generation => {
                    self.log(&format!("[INFO] Loaded {} channels", catalog.len()));
                    self.publish_catalog(catalog);
                    changed = true;
                }
                TaskResult::CatalogFailed { generation, error: message } if generation == self.generation => {
                    error!(error = %message, "Catalog load failed");
                    self.log(&format!("[ERROR] {}", message));
                    self.status = LoadStatus::Failed(message);
                    changed = true;
                }
                // Superseded by a later ingestion
                TaskResult::CatalogLoaded { .. } | TaskResult::CatalogFailed { .. } => {}
                TaskResult::PlayerLog(line) => {
                    self.log(&format!("[PLAYER] {}", line));
                    changed = true;
                }
            }
        }

        if let Some(child) = self.player.as_mut() {
            if let Ok(Some(status)) = child.try_wait() {
                self.player = None;
                if !status.success() {
                    self.log(&format!("[ERROR] Player exited with {}", status));
                }
                changed = true;
            }
        }

        changed
    }

    fn publish_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.status = LoadStatus::Ready;
        if self.selected.is_none() {
            self.selected = self.catalog.first().cloned();
        }
        self.refresh();
    }

    /// Recompute the view and persist preferences if they differ from the
    /// last write
    fn refresh(&mut self) {
        self.view = recompute(&self.catalog, &self.state);

        let current = Preferences::from(&self.state);
        if current != self.saved {
            self.prefs.save(&current);
            self.saved = current;
        }
    }

    pub fn set_language(&mut self, language: &str) {
        self.state.set_language(language);
        self.refresh();
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.state.toggle_category(category);
        self.refresh();
    }

    pub fn clear_categories(&mut self) {
        self.state.clear_categories();
        self.refresh();
    }

    pub fn toggle_favorite(&mut self, id: &str) {
        self.state.toggle_favorite(id);
        self.refresh();
    }

    pub fn toggle_show_favorites(&mut self) {
        self.state.toggle_show_favorites();
        self.refresh();
    }

    pub fn set_search(&mut self, query: &str) {
        self.state.set_search(query);
        self.refresh();
    }

    pub fn select_channel(&mut self, channel: Channel) {
        self.selected = Some(channel);
    }

    /// Play the selected channel in the external player, replacing any
    /// player already running
    pub fn play_selected(&mut self) {
        let Some(channel) = self.selected.clone() else {
            return;
        };

        if let Some(mut previous) = self.player.take() {
            let _ = previous.kill();
            let _ = previous.wait();
        }

        self.log(&format!("[PLAY] {} | {}", channel.name, channel.url));
        match player::launch(&self.config, &channel, self.task_sender.clone()) {
            Ok(child) => {
                self.log(&format!("[PLAY] Player launched (PID: {})", child.id()));
                self.player = Some(child);
            }
            Err(e) => {
                warn!(player = %self.config.external_player, error = %e, "Failed to launch player");
                self.log(&format!(
                    "[ERROR] Failed to launch player '{}': {}",
                    self.config.external_player, e
                ));
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(mut child) = self.player.take() {
            let _ = child.kill();
        }
    }
}
