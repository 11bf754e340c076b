//! Channel Deck
//! Browse live TV channels merged from several M3U playlists and play them
//! in an external player

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use eframe::egui;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod filter;
mod ingest;
mod m3u_parser;
mod models;
mod player;
mod preferences;
mod session;

#[cfg(test)]
mod m3u_parser_tests;

use config::AppConfig;
use ingest::{HttpFetcher, PlaylistFetcher};
use models::{Channel, LoadStatus};
use preferences::{FileStore, PreferenceStore};
use session::Session;

/// User input collected while drawing, applied once the frame is laid out
enum UiAction {
    SetLanguage(String),
    ToggleCategory(String),
    ClearCategories,
    ToggleFavorite(String),
    ToggleShowFavorites,
    Search(String),
    Select(Channel),
    Play,
    Retry,
}

struct ChannelDeckApp {
    session: Session,
    search_input: String,
    show_console: bool,
}

impl ChannelDeckApp {
    fn new(session: Session) -> Self {
        let search_input = session.state().search_query.clone();
        Self {
            session,
            search_input,
            show_console: false,
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::SetLanguage(lang) => self.session.set_language(&lang),
            UiAction::ToggleCategory(category) => self.session.toggle_category(&category),
            UiAction::ClearCategories => self.session.clear_categories(),
            UiAction::ToggleFavorite(id) => self.session.toggle_favorite(&id),
            UiAction::ToggleShowFavorites => self.session.toggle_show_favorites(),
            UiAction::Search(query) => self.session.set_search(&query),
            UiAction::Select(channel) => self.session.select_channel(channel),
            UiAction::Play => self.session.play_selected(),
            UiAction::Retry => self.session.retry(),
        }
    }

    fn header(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            ui.heading("Channel Deck");
            ui.separator();

            match self.session.status() {
                LoadStatus::Loading => {
                    ui.spinner();
                    ui.label("Loading channels...");
                }
                LoadStatus::Ready => {
                    ui.label(format!("{} channels", self.session.catalog().len()));
                }
                LoadStatus::Failed(message) => {
                    ui.colored_label(egui::Color32::LIGHT_RED, "Failed to load channels. Please try again later.");
                    ui.label(message);
                    if ui.button("Retry").clicked() {
                        actions.push(UiAction::Retry);
                    }
                }
            }
        });
    }

    fn sidebar(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let state = self.session.state();
        let view = self.session.view();

        ui.horizontal(|ui| {
            ui.label("Language:");
            egui::ComboBox::from_id_salt("language")
                .selected_text(state.selected_language.as_str())
                .show_ui(ui, |ui| {
                    for lang in &view.languages {
                        if ui.selectable_label(*lang == state.selected_language, lang.as_str()).clicked()
                            && *lang != state.selected_language
                        {
                            actions.push(UiAction::SetLanguage(lang.clone()));
                        }
                    }
                });
        });

        ui.horizontal(|ui| {
            let hint = if state.show_favorites { "Search favorites..." } else { "Search channels..." };
            let response = ui.add(egui::TextEdit::singleline(&mut self.search_input).hint_text(hint));
            if response.changed() {
                actions.push(UiAction::Search(self.search_input.clone()));
            }
        });

        let favorites_label = format!("★ Favorites ({})", state.favorites.len());
        if ui.selectable_label(state.show_favorites, favorites_label).clicked() {
            actions.push(UiAction::ToggleShowFavorites);
        }

        ui.separator();
        egui::CollapsingHeader::new(format!("Categories ({} selected)", state.selected_categories.len()))
            .id_salt("categories")
            .show(ui, |ui| {
                if view.categories.is_empty() {
                    ui.label("No categories available for this language");
                }
                if !state.selected_categories.is_empty() && ui.small_button("Clear all").clicked() {
                    actions.push(UiAction::ClearCategories);
                }
                egui::ScrollArea::vertical()
                    .id_salt("category_scroll")
                    .max_height(180.0)
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            for category in &view.categories {
                                if ui.selectable_label(state.is_category_selected(category), category.as_str()).clicked() {
                                    actions.push(UiAction::ToggleCategory(category.clone()));
                                }
                            }
                        });
                    });
            });

        // Active filter chips in pick order
        if !state.selected_categories.is_empty() {
            ui.horizontal_wrapped(|ui| {
                for category in &state.selected_categories {
                    if ui.small_button(format!("{} ✕", category)).clicked() {
                        actions.push(UiAction::ToggleCategory(category.clone()));
                    }
                }
            });
        }

        ui.separator();
        ui.label(format!("{} channels", view.visible.len()));

        let selected_id = self.session.selected().map(|c| c.id.clone());
        let row_height = ui.spacing().interact_size.y * 2.0;
        egui::ScrollArea::vertical()
            .id_salt("channel_list")
            .auto_shrink([false; 2])
            .show_rows(ui, row_height, view.visible.len(), |ui, range| {
                for channel in &view.visible[range] {
                    ui.horizontal(|ui| {
                        let star = if state.is_favorite(&channel.id) { "★" } else { "☆" };
                        if ui.small_button(star).clicked() {
                            actions.push(UiAction::ToggleFavorite(channel.id.clone()));
                        }
                        let is_selected = selected_id.as_deref() == Some(channel.id.as_str());
                        let text = format!("{}\n{} • {}", channel.name, channel.group, channel.language);
                        let response = ui.selectable_label(is_selected, text);
                        if response.clicked() {
                            actions.push(UiAction::Select(channel.clone()));
                        }
                        if response.double_clicked() {
                            actions.push(UiAction::Play);
                        }
                    });
                }
            });
    }

    fn now_playing(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        match self.session.selected() {
            Some(channel) => {
                ui.horizontal(|ui| {
                    ui.heading(&channel.name);
                    ui.colored_label(egui::Color32::RED, "LIVE");
                    if self.session.state().is_favorite(&channel.id) {
                        ui.colored_label(egui::Color32::YELLOW, "★");
                    }
                });
                ui.label(format!("{} • {}", channel.language, channel.group));
                ui.hyperlink_to("Logo", &channel.logo);
                ui.monospace(&channel.url);
                if ui.button("▶ Play").clicked() {
                    actions.push(UiAction::Play);
                }
            }
            None => {
                ui.label("Select a channel to start watching");
            }
        }

        ui.separator();
        ui.checkbox(&mut self.show_console, "Show console");
        if self.show_console {
            egui::ScrollArea::vertical()
                .id_salt("console")
                .stick_to_bottom(true)
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    for line in self.session.console_log() {
                        ui.monospace(line);
                    }
                });
        }
    }
}

impl eframe::App for ChannelDeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.poll();

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.header(ui, &mut actions);
        });

        egui::SidePanel::left("channels_panel")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                self.sidebar(ui, &mut actions);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.now_playing(ui, &mut actions);
        });

        for action in actions {
            self.apply(action);
        }

        // Keep polling background tasks while idle
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load_or_create();

    let fetcher: Arc<dyn PlaylistFetcher> = Arc::new(HttpFetcher::new(&config));
    let prefs = PreferenceStore::new(Box::new(FileStore::new(config::app_dir())));
    let mut session = Session::new(config, fetcher, prefs);
    session.start_ingest();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 680.0])
            .with_min_inner_size([800.0, 480.0]),
        vsync: true,
        ..Default::default()
    };

    eframe::run_native(
        "Channel Deck",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(ChannelDeckApp::new(session)))
        }),
    )
}
