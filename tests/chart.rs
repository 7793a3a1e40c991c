//! Row model tests: template × size reconciliation

mod common;

use common::{cell, template, value};
use qcgrid::config::GridConfig;
use qcgrid::messages::{ChartMsg, GridMsg, Msg};
use qcgrid::model::{AppModel, FormVariant, GroupKey, MeasurementRow};
use qcgrid::update::update;

fn pairs(model: &AppModel) -> Vec<(String, String)> {
    model
        .chart
        .rows()
        .iter()
        .map(|r| {
            let size = r
                .group_key
                .and_then(|k| model.chart.size_name(k))
                .unwrap_or("-")
                .to_string();
            (size, r.pom_name.clone())
        })
        .collect()
}

fn by_size_model() -> AppModel {
    let mut model = AppModel::new(FormVariant::FinalInspectionBySize, GridConfig::default());
    update(
        &mut model,
        Msg::Chart(ChartMsg::TemplateSelected(Some(template(&["A", "B"], 0.5, 10.0)))),
    );
    for name in ["S", "M"] {
        update(
            &mut model,
            Msg::Chart(ChartMsg::SizeAdded {
                name: name.to_string(),
                order_qty: 100,
                packed_qty: 100,
            }),
        );
    }
    model
}

fn key_of(model: &AppModel, name: &str) -> GroupKey {
    model.chart.size_key(name).unwrap()
}

#[test]
fn test_rows_are_sizes_times_poms() {
    let model = by_size_model();
    let expected: Vec<(String, String)> = [("S", "A"), ("S", "B"), ("M", "A"), ("M", "B")]
        .iter()
        .map(|(s, p)| (s.to_string(), p.to_string()))
        .collect();
    assert_eq!(pairs(&model), expected);
}

#[test]
fn test_removing_size_keeps_other_values() {
    let mut model = by_size_model();
    model.chart.set_cell(cell("s1:1"), "10.1");
    model.chart.set_cell(cell("s6:2"), "9.9");
    model.chart.set_cell(cell("s1:3"), "11");

    let m = key_of(&model, "M");
    update(&mut model, Msg::Chart(ChartMsg::SizeRemoved(m)));

    assert_eq!(model.chart.row_count(), 2);
    assert!(pairs(&model).iter().all(|(s, _)| s == "S"));
    assert_eq!(value(&model, "s1:1"), "10.1");
    assert_eq!(value(&model, "s6:2"), "9.9");
}

#[test]
fn test_template_change_keeps_persisting_pairs() {
    let mut model = by_size_model();
    // (M, B) is row 4
    model.chart.set_cell(cell("s2:4"), "10.4");
    // (S, A) is row 1
    model.chart.set_cell(cell("s1:1"), "9.8");

    update(
        &mut model,
        Msg::Chart(ChartMsg::TemplateSelected(Some(template(&["B", "C"], 0.3, 12.0)))),
    );

    let expected: Vec<(String, String)> = [("S", "B"), ("S", "C"), ("M", "B"), ("M", "C")]
        .iter()
        .map(|(s, p)| (s.to_string(), p.to_string()))
        .collect();
    assert_eq!(pairs(&model), expected);
    assert_eq!(value(&model, "s2:3"), "10.4");
    assert_eq!(model.chart.rows()[2].tolerance, Some(0.3));
    assert_eq!(model.chart.rows()[2].spec.raw(), "12");
    assert!(!model.chart.rows()[0].has_entries());
}

#[test]
fn test_rename_keeps_rows_attached() {
    let mut model = by_size_model();
    model.chart.set_cell(cell("s1:3"), "10");
    let m = key_of(&model, "M");

    update(
        &mut model,
        Msg::Chart(ChartMsg::SizeRenamed {
            key: m,
            name: "Medium".to_string(),
        }),
    );
    assert_eq!(model.chart.size_key("Medium"), Some(m));
    assert_eq!(pairs(&model)[2], ("Medium".to_string(), "A".to_string()));
    assert_eq!(value(&model, "s1:3"), "10");

    // Adding a size named like the old one does not steal the rows
    update(
        &mut model,
        Msg::Chart(ChartMsg::SizeAdded {
            name: "M".to_string(),
            order_qty: 0,
            packed_qty: 0,
        }),
    );
    assert_eq!(model.chart.row_count(), 6);
    assert_eq!(value(&model, "s1:3"), "10");
    assert_eq!(value(&model, "s1:5"), "");
}

#[test]
fn test_structural_change_resets_selection() {
    let mut model = by_size_model();
    update(&mut model, Msg::Grid(GridMsg::PointerDown(cell("s1:4"))));
    assert_eq!(model.grid.selection.len(), 1);

    let m = key_of(&model, "M");
    update(&mut model, Msg::Chart(ChartMsg::SizeRemoved(m)));
    assert!(model.grid.selection.is_empty());
    assert!(!model.grid.selection.is_in_progress());
}

#[test]
fn test_no_template_means_no_rows() {
    let mut model = by_size_model();
    update(&mut model, Msg::Chart(ChartMsg::TemplateSelected(None)));
    assert_eq!(model.chart.row_count(), 0);
    assert_eq!(model.chart.sizes().len(), 2);
}

#[test]
fn test_quantity_deviation_warns() {
    let mut model = by_size_model();
    let s = key_of(&model, "S");
    let cmd = update(
        &mut model,
        Msg::Chart(ChartMsg::SizeQuantitiesChanged {
            key: s,
            order_qty: 100,
            packed_qty: 110,
        }),
    )
    .unwrap();
    let messages: Vec<String> = cmd
        .flatten()
        .into_iter()
        .filter_map(|c| match c {
            qcgrid::Cmd::Notify { message, .. } => Some(message),
            _ => None,
        })
        .collect();
    assert_eq!(
        messages,
        vec!["Size S: packed quantity deviates 10.0% from order"]
    );

    let cmd = update(
        &mut model,
        Msg::Chart(ChartMsg::SizeQuantitiesChanged {
            key: s,
            order_qty: 100,
            packed_qty: 104,
        }),
    );
    assert_eq!(cmd, Some(qcgrid::Cmd::Redraw));
}

#[test]
fn test_rows_replaced_are_normalised() {
    let mut model = AppModel::new(FormVariant::FinalInspection, GridConfig::default());
    let rows = vec![MeasurementRow::new("Chest", Some(0.5), Some(50.0), 2)];
    update(&mut model, Msg::Chart(ChartMsg::RowsReplaced(rows)));
    assert_eq!(model.chart.rows()[0].samples.len(), 5);
}
