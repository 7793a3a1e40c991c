//! Row model update handlers
//!
//! Template and size changes rebuild the rows. Anything in the grid state
//! that refers to row indices is dropped whenever that happens.

use crate::commands::Cmd;
use crate::messages::ChartMsg;
use crate::model::AppModel;

/// Handle form-level changes to the chart
pub fn update_chart(model: &mut AppModel, msg: ChartMsg) -> Option<Cmd> {
    match msg {
        ChartMsg::TemplateSelected(template) => {
            let name = template.as_ref().map(|t| t.name.clone());
            model.chart.apply_template(template);
            tracing::info!(
                target: "chart",
                template = name.as_deref().unwrap_or("<none>"),
                rows = model.chart.row_count(),
                "template selected"
            );
            rows_changed(model)
        }

        ChartMsg::RecordLoaded {
            template,
            sizes,
            rows,
        } => {
            model.chart.load_record(template, sizes, rows);
            tracing::info!(target: "chart", rows = model.chart.row_count(), "record loaded");
            rows_changed(model)
        }

        ChartMsg::SizeAdded {
            name,
            order_qty,
            packed_qty,
        } => {
            let key = model.chart.add_size(name, order_qty, packed_qty);
            tracing::debug!(target: "chart", key = key.0, "size added");
            rows_changed(model)
        }

        ChartMsg::SizeRenamed { key, name } => {
            if model.chart.rename_size(key, name) {
                Some(Cmd::Redraw)
            } else {
                tracing::debug!(target: "chart", key = key.0, "rename of unknown size ignored");
                None
            }
        }

        ChartMsg::SizeQuantitiesChanged {
            key,
            order_qty,
            packed_qty,
        } => {
            if !model.chart.set_size_quantities(key, order_qty, packed_qty) {
                return None;
            }
            let size = model.chart.sizes().iter().find(|s| s.key == key)?;
            match size.deviation_percent() {
                Some(deviation) if size.is_high_deviation() => Some(Cmd::batch(vec![
                    Cmd::Redraw,
                    Cmd::warning(format!(
                        "Size {}: packed quantity deviates {:.1}% from order",
                        size.name, deviation
                    )),
                ])),
                _ => Some(Cmd::Redraw),
            }
        }

        ChartMsg::SizeRemoved(key) => {
            if !model.chart.remove_size(key) {
                return None;
            }
            rows_changed(model)
        }

        ChartMsg::RowsReplaced(rows) => {
            model.chart.replace_rows(rows);
            rows_changed(model)
        }
    }
}

fn rows_changed(model: &mut AppModel) -> Option<Cmd> {
    model.grid.reset_for_rows(model.chart.layout().clone());
    Some(Cmd::Redraw)
}
