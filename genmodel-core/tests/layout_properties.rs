use chrono::{Duration, NaiveDate};
use genmodel_core::{
    date_to_x, strip_layout, Button, Catalog, ChartConfig, ChartLayout, Explorer, InputEvent,
    Key, ModelRecord, SelectionState, UseCase,
};
use proptest::prelude::*;

fn text_record(index: usize, citations: u64) -> ModelRecord {
    ModelRecord {
        id: format!("m{index}"),
        model: format!("Model {index}"),
        year: 2000 + index as i32 % 20,
        primary_use_case: UseCase::Text,
        citations: Some(citations),
        ..ModelRecord::default()
    }
}

/// Ids of the four-record explorer catalog plus one unknown id.
fn event_id() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("m0".to_string()),
        Just("m1".to_string()),
        Just("m2".to_string()),
        Just("m3".to_string()),
        Just("ghost".to_string()),
    ]
}

fn explorer_event() -> impl Strategy<Value = InputEvent> {
    let button = prop_oneof![
        Just(Button::ToggleCompare),
        Just(Button::Reset),
        Just(Button::Compare),
        Just(Button::CloseDetail),
        Just(Button::CloseComparison),
        Just(Button::Help),
        Just(Button::CloseHelp),
    ];
    let key = prop_oneof![
        Just(Key::Char('c')),
        Just(Key::Char('r')),
        Just(Key::Escape),
    ];
    prop_oneof![
        event_id().prop_map(|id| InputEvent::NodeClick { id }),
        event_id().prop_map(|id| InputEvent::RowClick { id }),
        event_id().prop_map(|id| InputEvent::RowSelect { id }),
        button.prop_map(|button| InputEvent::Button { button }),
        key.prop_map(|key| InputEvent::Key {
            key,
            text_input_focused: false,
        }),
        Just(InputEvent::OpenImage {
            url: "flow.png".to_string(),
        }),
        Just(InputEvent::CloseImage),
        Just(InputEvent::Backdrop),
    ]
}

proptest! {
    #[test]
    fn selection_invariants_hold_for_any_event_sequence(
        events in prop::collection::vec(explorer_event(), 0..40),
    ) {
        let catalog = Catalog::new((0..4).map(|index| text_record(index, index as u64)).collect())
            .unwrap();
        let mut explorer = Explorer::new(catalog, ChartConfig::default()).unwrap();

        for event in events {
            explorer.handle(event);
            let view = explorer.view();
            let selection = &view.selection;
            if selection.open_record_id.is_some() {
                prop_assert!(!selection.compare_mode);
            }
            if selection.comparison_visible {
                prop_assert!(selection.compare_mode);
                prop_assert!(selection.selected_ids.len() >= 2);
            }
            if view.enlarged_image.is_some() {
                prop_assert!(explorer.open_record().is_some());
            }
            for id in &selection.selected_ids {
                prop_assert!(explorer.catalog().contains(id));
            }
        }
    }

    #[test]
    fn strips_partition_total_height(count in 1usize..12, total in 1.0f64..5000.0) {
        let categories: Vec<usize> = (0..count).collect();
        let bands = strip_layout(&categories, total);
        let tolerance = total * 1e-12;

        prop_assert_eq!(bands.len(), count);
        let sum: f64 = bands.iter().map(|band| band.height).sum();
        prop_assert!((sum - total).abs() <= tolerance);
        for (index, band) in bands.iter().enumerate() {
            prop_assert_eq!(band.top, index as f64 * (total / count as f64));
            prop_assert_eq!(band.category, index);
        }
        for pair in bands.windows(2) {
            prop_assert!((pair[0].bottom() - pair[1].top).abs() <= tolerance);
        }
        prop_assert!((bands[count - 1].bottom() - total).abs() <= tolerance);
    }

    #[test]
    fn date_mapping_is_monotonic_and_clamped(
        a in -20_000i64..40_000,
        b in -20_000i64..40_000,
        width in 1.0f64..20_000.0,
    ) {
        let min = NaiveDate::from_ymd_opt(1986, 1, 1).unwrap();
        let max = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let x_early = date_to_x(min + Duration::days(early), min, max, width);
        let x_late = date_to_x(min + Duration::days(late), min, max, width);

        prop_assert!(x_early <= x_late);
        prop_assert!((0.0..=width).contains(&x_early));
        prop_assert!((0.0..=width).contains(&x_late));
        prop_assert_eq!(date_to_x(min, min, max, width), 0.0);
        prop_assert_eq!(date_to_x(max, min, max, width), width);
    }

    #[test]
    fn vertical_order_follows_citations(citations in prop::collection::vec(0u64..1000, 1..25)) {
        let records: Vec<ModelRecord> = citations
            .iter()
            .enumerate()
            .map(|(index, &count)| text_record(index, count))
            .collect();
        let catalog = Catalog::new(records).unwrap();
        let layout = ChartLayout::new(ChartConfig::default()).unwrap();
        let band = *layout.strip(UseCase::Text).unwrap();

        let ys: Vec<f64> = catalog
            .records()
            .iter()
            .map(|record| layout.node_y(&catalog, record))
            .collect();

        for (i, &y) in ys.iter().enumerate() {
            prop_assert!(y >= band.top && y <= band.bottom());
            for (j, &other) in ys.iter().enumerate() {
                if citations[i] < citations[j] {
                    // Screen y grows downwards: more citations sit higher.
                    prop_assert!(y > other);
                }
                if i != j {
                    prop_assert!(y != other);
                }
            }
        }
        if citations.len() == 1 {
            prop_assert_eq!(ys[0], band.center());
        }
        if citations.len() == 2 {
            let spread = (ys[0] - ys[1]).abs();
            let expected = band.height - 2.0 * band.height * layout.config().strip_inset;
            prop_assert!((spread - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn toggling_an_id_twice_restores_selection(
        initial in prop::collection::btree_set("[a-e]", 0..5),
        id in "[a-g]",
        compare_mode in any::<bool>(),
    ) {
        let state = SelectionState {
            compare_mode,
            selected_ids: initial.clone(),
            ..SelectionState::default()
        };
        let round_trip = state.toggle_selected(&id).toggle_selected(&id);
        prop_assert_eq!(round_trip.selected_ids, initial);
    }
}

#[test]
fn toggling_compare_twice_returns_to_empty_browse() {
    let state = SelectionState::default();
    assert_eq!(state.toggle_compare().toggle_compare(), state);
}

#[test]
fn three_text_models_stack_by_citations() {
    let catalog = Catalog::new(vec![
        text_record(0, 10),
        text_record(1, 50),
        text_record(2, 30),
    ])
    .unwrap();
    let layout = ChartLayout::new(ChartConfig::default()).unwrap();

    let mut stacked: Vec<(f64, u64)> = catalog
        .records()
        .iter()
        .map(|record| (layout.node_y(&catalog, record), record.citation_metric()))
        .collect();
    stacked.sort_by(|a, b| a.0.total_cmp(&b.0));

    let top_to_bottom: Vec<u64> = stacked.into_iter().map(|(_, count)| count).collect();
    assert_eq!(top_to_bottom, vec![50, 30, 10]);
}

#[test]
fn compare_action_lists_selection_in_dataset_order() {
    let catalog = Catalog::new(vec![
        text_record(0, 1),
        text_record(1, 2),
        text_record(2, 3),
    ])
    .unwrap();
    let state = SelectionState::default()
        .toggle_compare()
        .activate(&catalog, "m2")
        .activate(&catalog, "m0")
        .show_comparison();

    assert!(state.comparison_visible);
    let rows: Vec<&str> = state
        .comparison_rows(&catalog)
        .into_iter()
        .map(|record| record.id.as_str())
        .collect();
    assert_eq!(rows, vec!["m0", "m2"]);
}

#[test]
fn reset_while_comparing_clears_everything() {
    let catalog = Catalog::new((0..4).map(|index| text_record(index, 0)).collect()).unwrap();
    let state = SelectionState::default()
        .toggle_compare()
        .activate(&catalog, "m0")
        .activate(&catalog, "m1")
        .activate(&catalog, "m3");
    assert_eq!(state.selected_ids.len(), 3);

    let state = state.reset();
    assert!(!state.compare_mode);
    assert!(state.selected_ids.is_empty());
    assert_eq!(state.open_record_id, None);
    assert!(!state.comparison_visible);
}
