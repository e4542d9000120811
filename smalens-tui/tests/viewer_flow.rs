//! Drive the viewer over the shared price fixture without a terminal.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use smalens_core::TableCache;
use smalens_tui::{input, ui, App, Theme};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../smalens-core/tests/fixtures/stocks_2024.csv")
}

fn key(app: &mut App, code: KeyCode) {
    input::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
    terminal
        .draw(|f| ui::draw(f, app, &Theme::default()))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn walk_to_tatamotors_and_chart_it() {
    let mut app = App::new(TableCache::default(), fixture());
    assert!(app.load_error().is_none());
    assert_eq!(app.categories(), ["Auto", "Energy", "IT"]);

    // Auto is first; its instruments merge both spellings of Tata Motors.
    assert_eq!(app.instruments(), ["MARUTI", "TATAMOTORS"]);
    key(&mut app, KeyCode::Tab);
    key(&mut app, KeyCode::Char('j'));
    assert_eq!(app.selected_instrument(), Some("TATAMOTORS"));

    let series = app.series();
    assert_eq!(series.len(), 250);
    assert!(series.sma_50.iter().all(Option::is_some));

    let rendered = screen(&app);
    assert!(rendered.contains("TATAMOTORS Price Chart with SMAs"));
    assert!(rendered.contains("SMA 200"));
}

#[test]
fn uncategorised_rows_are_not_listed() {
    let mut app = App::new(TableCache::default(), fixture());
    for _ in 0..app.categories().len() {
        assert!(!app.instruments().iter().any(|i| i == "HDFCBANK"));
        key(&mut app, KeyCode::Down);
    }
}

#[test]
fn toggles_and_quit_through_keys() {
    let mut app = App::new(TableCache::default(), fixture());
    key(&mut app, KeyCode::Char('2'));
    assert!(app.show_sma_50);
    assert!(!app.show_sma_200);

    key(&mut app, KeyCode::Char('r'));
    assert!(app.load_error().is_none());
    assert_eq!(app.categories().len(), 3);

    key(&mut app, KeyCode::Char('q'));
    assert!(!app.running);
}
