//! Frame layout: sidebar (categories, instruments, overlay toggles), price
//! chart, one-line status bar.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, List, ListItem, ListState,
    Paragraph, Wrap,
};
use ratatui::Frame;

use smalens_core::PriceSeries;

use crate::app::{App, Focus, StatusLevel};
use crate::input::key_bindings_help;
use crate::theme::Theme;

pub const NO_DATA: &str = "No data available for this stock.";

const SIDEBAR_WIDTH: u16 = 26;

pub fn draw(f: &mut Frame, app: &App, theme: &Theme) {
    // A failed load replaces the whole screen.
    if let Some(err) = app.load_error() {
        let para = Paragraph::new(Line::from(Span::styled(
            format!("Error loading data: {err}"),
            Style::default().fg(theme.error),
        )))
        .wrap(Wrap { trim: true });
        f.render_widget(para, f.area());
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(rows[0]);

    draw_sidebar(f, cols[0], app, theme);
    draw_chart(f, cols[1], app, theme);
    draw_status_bar(f, rows[1], app, theme);
}

fn draw_sidebar(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(area);

    draw_list(
        f,
        parts[0],
        " Category ",
        app.categories(),
        app.category_index(),
        app.focus == Focus::Categories,
        theme,
    );
    draw_list(
        f,
        parts[1],
        " Stock ",
        app.instruments(),
        app.instrument_index(),
        app.focus == Focus::Instruments,
        theme,
    );

    let check = |on: bool| if on { "[x]" } else { "[ ]" };
    let toggles = vec![
        Line::from(Span::styled(
            format!("{} 1 SMA 50", check(app.show_sma_50)),
            theme.toggle(app.show_sma_50, theme.sma_short),
        )),
        Line::from(Span::styled(
            format!("{} 2 SMA 200", check(app.show_sma_200)),
            theme.toggle(app.show_sma_200, theme.sma_long),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(false))
        .title(" Overlays ");
    f.render_widget(Paragraph::new(toggles).block(block), parts[2]);
}

fn draw_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    items: &[String],
    selected: usize,
    focused: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(focused))
        .title(title);

    let list = List::new(items.iter().map(|s| ListItem::new(s.as_str())))
        .block(block)
        .style(Style::default().fg(theme.text_primary))
        .highlight_style(theme.highlight(focused))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected((!items.is_empty()).then_some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_chart(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let series = app.series();
    let title = if series.stock.is_empty() {
        " Price Chart ".to_string()
    } else {
        format!(" {} Price Chart with SMAs ", series.stock)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(false))
        .title(title)
        .style(Style::default().bg(theme.background));

    let lines = [
        (&series.close, "Close", theme.close, true),
        (&series.sma_50, "SMA 50", theme.sma_short, app.show_sma_50),
        (&series.sma_200, "SMA 200", theme.sma_long, app.show_sma_200),
    ];
    let points: Vec<(&str, _, Vec<(f64, f64)>)> = lines
        .iter()
        .filter(|(_, _, _, visible)| *visible)
        .map(|(values, name, color, _)| (*name, *color, to_points(values)))
        .collect();

    let Some((y_min, y_max)) = bounds(points.iter().flat_map(|(_, _, p)| p.iter().map(|&(_, y)| y)))
    else {
        let msg = Paragraph::new(Line::from(Span::styled(NO_DATA, theme.muted_text()))).block(block);
        f.render_widget(msg, area);
        return;
    };

    let y_pad = if y_max > y_min { (y_max - y_min) * 0.05 } else { 1.0 };
    let (y_lower, y_upper) = (y_min - y_pad, y_max + y_pad);
    let x_max = series.len().saturating_sub(1).max(1) as f64;

    let datasets: Vec<Dataset> = points
        .iter()
        .map(|(name, color, data)| {
            Dataset::default()
                .name(*name)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(*color))
                .data(data)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .legend_position(Some(LegendPosition::TopLeft))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme.muted_text()))
                .style(theme.muted_text())
                .bounds([0.0, x_max])
                .labels(date_labels(&series)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Price", theme.muted_text()))
                .style(theme.muted_text())
                .bounds([y_lower, y_upper])
                .labels(vec![
                    format!("{y_lower:.0}"),
                    format!("{:.0}", (y_lower + y_upper) / 2.0),
                    format!("{y_upper:.0}"),
                ]),
        );

    f.render_widget(chart, area);
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mut spans: Vec<Span> = key_bindings_help()
        .into_iter()
        .map(|(key, action)| Span::styled(format!(" {key}:{action}"), theme.muted_text()))
        .collect();

    spans.push(Span::raw(" | "));
    match &app.status_message {
        Some((msg, level)) => {
            let color = match level {
                StatusLevel::Info => theme.accent,
                StatusLevel::Warning => theme.warning,
            };
            spans.push(Span::styled(msg.as_str(), Style::default().fg(color)));
        }
        None => spans.push(Span::styled(
            app.source().display().to_string(),
            theme.muted_text(),
        )),
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Present values only, x = position in the selection.
fn to_points(values: &[Option<f64>]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|y| (i as f64, y)))
        .collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// First, middle and last date of the selection.
fn date_labels(series: &PriceSeries) -> Vec<String> {
    let n = series.dates.len();
    let mut idx = vec![0, n / 2, n.saturating_sub(1)];
    idx.dedup();
    idx.into_iter()
        .filter_map(|i| series.dates.get(i))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use smalens_core::TableCache;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(f, app, &Theme::default())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn app_with(content: &str) -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.csv");
        std::fs::write(&path, content).unwrap();
        (dir, App::new(TableCache::default(), path))
    }

    #[test]
    fn renders_chart_title_and_lists() {
        let (_d, app) = app_with(
            "Date,Stock,Category,Close\n2024-01-01,TCS,IT,10\n2024-01-02,TCS,IT,12\n2024-01-03,TCS,IT,11\n",
        );
        let screen = render(&app);
        assert!(screen.contains("TCS Price Chart with SMAs"));
        assert!(screen.contains("Category"));
        assert!(screen.contains("2024-01-01"));
        assert!(!screen.contains(NO_DATA));
    }

    #[test]
    fn null_only_selection_shows_no_data() {
        let (_d, app) = app_with("Date,Stock,Category,Close\n2024-01-01,TCS,IT,n/a\n");
        let screen = render(&app);
        assert!(screen.contains(NO_DATA));
    }

    #[test]
    fn load_error_replaces_screen() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(TableCache::default(), dir.path().join("missing.csv"));
        let screen = render(&app);
        assert!(screen.contains("Error loading data:"));
        assert!(!screen.contains("Category"));
    }

    #[test]
    fn points_skip_nulls() {
        assert_eq!(
            to_points(&[Some(1.0), None, Some(3.0)]),
            vec![(0.0, 1.0), (2.0, 3.0)]
        );
        assert_eq!(bounds([2.0, -1.0, 5.0].into_iter()), Some((-1.0, 5.0)));
        assert_eq!(bounds(std::iter::empty()), None);
    }

    #[test]
    fn single_date_gives_one_label() {
        let series = PriceSeries {
            stock: "TCS".into(),
            dates: vec![NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()],
            close: vec![Some(1.0)],
            sma_50: vec![Some(1.0)],
            sma_200: vec![Some(1.0)],
        };
        assert_eq!(date_labels(&series), vec!["2024-03-01".to_string()]);
    }
}
