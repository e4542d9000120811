//! Application state: single-owner, main-thread only.
//!
//! Holds the table cache, the current dataset (or the error that replaced
//! it), both selection lists and the overlay toggles. Rendering reads this;
//! input mutates it. Nothing here touches the terminal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use smalens_core::{Dataset, PriceSeries, TableCache};

/// Which sidebar list receives j/k.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Categories,
    Instruments,
}

impl Focus {
    pub fn next(self) -> Focus {
        match self {
            Focus::Categories => Focus::Instruments,
            Focus::Instruments => Focus::Categories,
        }
    }

    // Two lists, so prev and next coincide.
    pub fn prev(self) -> Focus {
        self.next()
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
}

pub struct App {
    cache: TableCache,
    source: PathBuf,
    dataset: Option<Arc<Dataset>>,
    load_error: Option<String>,

    categories: Vec<String>,
    instruments: Vec<String>,
    category_idx: usize,
    instrument_idx: usize,

    pub focus: Focus,
    pub show_sma_50: bool,
    pub show_sma_200: bool,
    pub running: bool,
    pub status_message: Option<(String, StatusLevel)>,
}

impl App {
    /// Build the app and run the pipeline for `source` once.
    pub fn new(cache: TableCache, source: impl Into<PathBuf>) -> Self {
        let mut app = Self {
            cache,
            source: source.into(),
            dataset: None,
            load_error: None,
            categories: Vec::new(),
            instruments: Vec::new(),
            category_idx: 0,
            instrument_idx: 0,
            focus: Focus::default(),
            show_sma_50: true,
            show_sma_200: true,
            running: true,
            status_message: None,
        };
        let result = app.cache.get_or_load(&app.source);
        app.apply_load(result);
        app
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }

    /// Set when no dataset could be produced at all.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    pub fn category_index(&self) -> usize {
        self.category_idx
    }

    pub fn instrument_index(&self) -> usize {
        self.instrument_idx
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.categories.get(self.category_idx).map(String::as_str)
    }

    pub fn selected_instrument(&self) -> Option<&str> {
        self.instruments.get(self.instrument_idx).map(String::as_str)
    }

    /// Chart series for the current selection; empty when nothing matches.
    pub fn series(&self) -> PriceSeries {
        match (&self.dataset, self.selected_category(), self.selected_instrument()) {
            (Some(ds), Some(cat), Some(inst)) => ds.query().series_for(cat, inst),
            (_, _, inst) => PriceSeries {
                stock: inst.unwrap_or_default().to_string(),
                ..PriceSeries::default()
            },
        }
    }

    // ── Navigation ───────────────────────────────────────────────────

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::Categories => {
                if self.category_idx + 1 < self.categories.len() {
                    self.category_idx += 1;
                    self.refresh_instruments(None);
                }
            }
            Focus::Instruments => {
                if self.instrument_idx + 1 < self.instruments.len() {
                    self.instrument_idx += 1;
                }
            }
        }
    }

    pub fn select_previous(&mut self) {
        match self.focus {
            Focus::Categories => {
                if self.category_idx > 0 {
                    self.category_idx -= 1;
                    self.refresh_instruments(None);
                }
            }
            Focus::Instruments => {
                self.instrument_idx = self.instrument_idx.saturating_sub(1);
            }
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn toggle_sma_50(&mut self) {
        self.show_sma_50 = !self.show_sma_50;
    }

    pub fn toggle_sma_200(&mut self) {
        self.show_sma_200 = !self.show_sma_200;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Recompute the source, keeping the current selection where it still exists.
    ///
    /// A failed reload over a loaded dataset keeps the old data on screen.
    pub fn reload(&mut self) {
        let result = self.cache.reload(&self.source);
        match result {
            Err(e) if self.dataset.is_some() => {
                self.set_warning(format!("Reload failed: {e}"));
            }
            result => {
                let ok = result.is_ok();
                self.apply_load(result);
                if ok {
                    self.set_status(format!("Reloaded {}", self.source.display()));
                }
            }
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    fn apply_load(&mut self, result: Result<Arc<Dataset>, smalens_core::PipelineError>) {
        match result {
            Ok(dataset) => {
                let keep_category = self.selected_category().map(String::from);
                let keep_instrument = self.selected_instrument().map(String::from);

                self.categories = dataset
                    .catalog()
                    .categories()
                    .into_iter()
                    .map(String::from)
                    .collect();
                self.dataset = Some(dataset);
                self.load_error = None;

                self.category_idx = keep_category
                    .and_then(|c| self.categories.iter().position(|x| *x == c))
                    .unwrap_or(0);
                self.refresh_instruments(keep_instrument.as_deref());
            }
            Err(e) => {
                self.dataset = None;
                self.load_error = Some(e.to_string());
                self.categories.clear();
                self.instruments.clear();
                self.category_idx = 0;
                self.instrument_idx = 0;
            }
        }
    }

    fn refresh_instruments(&mut self, keep: Option<&str>) {
        self.instruments = match (&self.dataset, self.categories.get(self.category_idx)) {
            (Some(ds), Some(cat)) => ds
                .catalog()
                .instruments(cat)
                .into_iter()
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        };
        self.instrument_idx = keep
            .and_then(|i| self.instruments.iter().position(|x| x == i))
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICES: &str = "\
Date,Stock,Category,Close
2024-01-01,TCS,IT,10
2024-01-01,RELIANCE,Energy,20
2024-01-02,INFY,IT,30
2024-01-02,ONGC,Energy,40
2024-01-03,TCS,IT,50
";

    fn app_with(content: &str) -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        std::fs::write(&path, content).unwrap();
        let app = App::new(TableCache::default(), path);
        (dir, app)
    }

    // ── Initial state ────────────────────────────────────────────────

    #[test]
    fn starts_on_first_category_and_instrument() {
        let (_dir, app) = app_with(PRICES);
        assert!(app.load_error().is_none());
        assert_eq!(app.categories(), ["Energy", "IT"]);
        assert_eq!(app.instruments(), ["ONGC", "RELIANCE"]);
        assert_eq!(app.selected_category(), Some("Energy"));
        assert_eq!(app.selected_instrument(), Some("ONGC"));
        assert!(app.show_sma_50 && app.show_sma_200);
        assert_eq!(app.focus, Focus::Categories);
    }

    #[test]
    fn missing_source_sets_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(TableCache::default(), dir.path().join("nope.csv"));
        assert!(app.dataset().is_none());
        assert!(app.load_error().unwrap().contains("CSV file not found"));
        assert!(app.categories().is_empty());
        assert!(app.series().is_empty());
    }

    // ── Navigation ───────────────────────────────────────────────────

    #[test]
    fn moving_category_refreshes_instruments() {
        let (_dir, mut app) = app_with(PRICES);
        app.select_next();
        assert_eq!(app.selected_category(), Some("IT"));
        assert_eq!(app.instruments(), ["INFY", "TCS"]);
        assert_eq!(app.instrument_index(), 0);

        // Clamped at the end.
        app.select_next();
        assert_eq!(app.selected_category(), Some("IT"));

        app.select_previous();
        app.select_previous();
        assert_eq!(app.selected_category(), Some("Energy"));
    }

    #[test]
    fn instrument_focus_moves_instrument_only() {
        let (_dir, mut app) = app_with(PRICES);
        app.focus_next();
        assert_eq!(app.focus, Focus::Instruments);
        app.select_next();
        assert_eq!(app.selected_instrument(), Some("RELIANCE"));
        assert_eq!(app.selected_category(), Some("Energy"));
        app.select_next();
        assert_eq!(app.selected_instrument(), Some("RELIANCE"));
        app.focus_prev();
        assert_eq!(app.focus, Focus::Categories);
    }

    #[test]
    fn series_follows_selection() {
        let (_dir, mut app) = app_with(PRICES);
        app.select_next();
        app.focus_next();
        app.select_next();
        let series = app.series();
        assert_eq!(series.stock, "TCS");
        assert_eq!(series.len(), 2);
        assert_eq!(series.close, vec![Some(10.0), Some(50.0)]);
    }

    #[test]
    fn toggles_flip() {
        let (_dir, mut app) = app_with(PRICES);
        app.toggle_sma_50();
        assert!(!app.show_sma_50);
        assert!(app.show_sma_200);
        app.toggle_sma_200();
        app.toggle_sma_50();
        assert!(app.show_sma_50);
        assert!(!app.show_sma_200);
    }

    // ── Reload ───────────────────────────────────────────────────────

    #[test]
    fn reload_picks_up_changes_and_keeps_selection() {
        let (dir, mut app) = app_with(PRICES);
        app.select_next();
        app.focus_next();
        app.select_next();
        assert_eq!(app.selected_instrument(), Some("TCS"));

        let mut grown = PRICES.to_string();
        grown.push_str("2024-01-04,WIPRO,IT,60\n2024-01-04,MARUTI,Auto,70\n");
        std::fs::write(dir.path().join("prices.csv"), grown).unwrap();
        app.reload();

        assert_eq!(app.categories(), ["Auto", "Energy", "IT"]);
        assert_eq!(app.selected_category(), Some("IT"));
        assert_eq!(app.instruments(), ["INFY", "TCS", "WIPRO"]);
        assert_eq!(app.selected_instrument(), Some("TCS"));
        assert!(matches!(app.status_message, Some((_, StatusLevel::Info))));
    }

    #[test]
    fn failed_reload_keeps_data() {
        let (dir, mut app) = app_with(PRICES);
        std::fs::remove_file(dir.path().join("prices.csv")).unwrap();
        app.reload();

        assert!(app.load_error().is_none());
        assert_eq!(app.categories().len(), 2);
        assert!(matches!(app.status_message, Some((_, StatusLevel::Warning))));
    }

    #[test]
    fn reload_recovers_from_initial_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let mut app = App::new(TableCache::default(), &path);
        assert!(app.load_error().is_some());

        std::fs::write(&path, PRICES).unwrap();
        app.reload();
        assert!(app.load_error().is_none());
        assert_eq!(app.selected_category(), Some("Energy"));
    }

    #[test]
    fn quit_stops_running() {
        let (_dir, mut app) = app_with(PRICES);
        app.quit();
        assert!(!app.running);
    }
}
