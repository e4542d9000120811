//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify, over arbitrary raw tables:
//! 1. Every cleaned row has a date, and no stock carries whitespace
//! 2. The cleaned table is sorted by date, with ties in source order
//! 3. Both SMAs are present on every row when closes are present
//! 4. Constant closes give constant SMAs
//! 5. Catalog listings are sorted, deduplicated and category-exact
//! 6. Queries return only matching rows, in table order
//! 7. The same input always yields the same table

use chrono::NaiveDate;
use proptest::prelude::*;
use smalens_core::aggregate::{aggregate, Aggregator};
use smalens_core::data::clean::clean;
use smalens_core::{CatalogIndex, NullPolicy, QueryFacade, RawTable, TableFingerprint, WindowScope};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_date_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => (0i64..400).prop_map(|d| {
            (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(d))
                .format("%Y-%m-%d")
                .to_string()
        }),
        1 => Just("not-a-date".to_string()),
        1 => Just(String::new()),
    ]
}

fn arb_stock_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("TATA MOTORS".to_string()),
        Just("TATAMOTORS".to_string()),
        Just(" RELIANCE ".to_string()),
        Just("HDFC\tBANK".to_string()),
        "[A-Z ]{1,8}",
    ]
}

fn arb_category_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Energy".to_string()),
        Just("IT".to_string()),
        Just("it".to_string()),
        Just(String::new()),
    ]
}

fn arb_close_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        9 => (1.0..5000.0_f64).prop_map(|v| format!("{:.2}", v)),
        1 => Just("abc".to_string()),
    ]
}

fn arb_row() -> impl Strategy<Value = Vec<String>> {
    (arb_date_cell(), arb_stock_cell(), arb_category_cell(), arb_close_cell())
        .prop_map(|(d, s, c, p)| vec![d, s, c, p])
}

fn raw_table(rows: Vec<Vec<String>>) -> RawTable {
    RawTable::from_rows(
        ["Date", "Stock", "Category", "Close"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        rows,
    )
}

fn arb_scope() -> impl Strategy<Value = WindowScope> {
    prop_oneof![Just(WindowScope::Global), Just(WindowScope::PerInstrument)]
}

// ── 1-2. Cleaning ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn cleaned_rows_have_dates_and_compact_stocks(rows in prop::collection::vec(arb_row(), 0..120)) {
        let expected_valid = rows
            .iter()
            .filter(|r| !r[0].is_empty() && r[0] != "not-a-date")
            .count();
        let table = clean(&raw_table(rows)).unwrap();

        prop_assert_eq!(table.len(), expected_valid);
        for row in table.rows() {
            prop_assert!(!row.stock.chars().any(char::is_whitespace));
        }
    }

    #[test]
    fn cleaned_rows_sorted_stably(rows in prop::collection::vec(arb_row(), 0..120)) {
        // Tag each row with its source position through the close column.
        let tagged: Vec<Vec<String>> = rows
            .into_iter()
            .enumerate()
            .map(|(i, mut r)| {
                r[3] = i.to_string();
                r
            })
            .collect();
        let table = clean(&raw_table(tagged)).unwrap();

        for pair in table.rows().windows(2) {
            prop_assert!(pair[0].date <= pair[1].date);
            if pair[0].date == pair[1].date {
                prop_assert!(pair[0].close.unwrap() < pair[1].close.unwrap());
            }
        }
    }
}

// ── 3-4. Aggregation ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn smas_present_on_every_row(
        rows in prop::collection::vec(arb_row(), 1..150),
        scope in arb_scope(),
    ) {
        // Present closes only: the skip policy never yields a null then.
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|mut r| {
                r[3] = "10.5".to_string();
                r
            })
            .collect();
        let agg = Aggregator::new(scope, NullPolicy::Skip).aggregate(clean(&raw_table(rows)).unwrap());
        for record in agg.records() {
            prop_assert!(record.sma_50.is_some());
            prop_assert!(record.sma_200.is_some());
        }
    }

    #[test]
    fn constant_close_gives_constant_smas(n in 50usize..260, cents in 1u32..500_000) {
        let cell = format!("{}.{:02}", cents / 100, cents % 100);
        let rows: Vec<Vec<String>> = (0..n)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64);
                vec![date.to_string(), "TCS".into(), "IT".into(), cell.clone()]
            })
            .collect();
        let agg = aggregate(clean(&raw_table(rows)).unwrap());
        let expected: f64 = cell.parse().unwrap();

        prop_assert_eq!(agg.len(), n);
        for record in agg.records() {
            prop_assert_eq!(record.sma_50, Some(expected));
            prop_assert_eq!(record.sma_200, Some(expected));
        }
    }
}

// ── 5-7. Catalog, query, determinism ─────────────────────────────────

proptest! {
    #[test]
    fn catalog_listings_sorted_and_exact(rows in prop::collection::vec(arb_row(), 0..120)) {
        let agg = aggregate(clean(&raw_table(rows)).unwrap());
        let catalog = CatalogIndex::build(&agg);

        let cats = catalog.categories();
        prop_assert!(cats.windows(2).all(|w| w[0] < w[1]));

        for cat in cats {
            let instruments = catalog.instruments(cat);
            prop_assert!(instruments.windows(2).all(|w| w[0] < w[1]));
            for inst in instruments {
                prop_assert!(agg
                    .iter()
                    .any(|r| r.category.as_deref() == Some(cat) && r.stock == inst));
            }
        }
    }

    #[test]
    fn queries_return_matching_rows_in_order(rows in prop::collection::vec(arb_row(), 0..120)) {
        let agg = aggregate(clean(&raw_table(rows)).unwrap());
        let catalog = CatalogIndex::build(&agg);
        let query = QueryFacade::new(&agg);

        for cat in catalog.categories() {
            for inst in catalog.instruments(cat) {
                let hits = query.rows_for(cat, inst);
                prop_assert!(!hits.is_empty());
                prop_assert!(hits.iter().all(|r| r.category.as_deref() == Some(cat) && r.stock == inst));
                prop_assert!(hits.windows(2).all(|w| w[0].date <= w[1].date));
            }
        }
        prop_assert!(query.rows_for("Energy", "NO SUCH STOCK").is_empty());
    }

    #[test]
    fn pipeline_is_deterministic(rows in prop::collection::vec(arb_row(), 0..120)) {
        let a = aggregate(clean(&raw_table(rows.clone())).unwrap());
        let b = aggregate(clean(&raw_table(rows)).unwrap());
        prop_assert_eq!(TableFingerprint::of(&a), TableFingerprint::of(&b));
        prop_assert_eq!(a, b);
    }
}
