//! Detail view: every field of the selected record

use egui::{Grid, RichText, ScrollArea, Ui};
use qv_core::Record;

use crate::{SpaceView, SpaceViewId, ViewerContext};

/// Label/value pairs shown for a record, typed fields first
pub fn detail_rows(record: &Record) -> Vec<(String, String)> {
    let mut rows = vec![
        ("id".to_string(), record.id.clone()),
        ("time".to_string(), record.time.clone()),
        ("place".to_string(), record.place.clone()),
        ("magnitude".to_string(), record.magnitude.to_string()),
        ("depth".to_string(), record.depth.to_string()),
        ("latitude".to_string(), record.latitude.to_string()),
        ("longitude".to_string(), record.longitude.to_string()),
    ];
    rows.extend(record.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    rows
}

pub struct DetailView {
    id: SpaceViewId,
    title: String,
}

impl DetailView {
    pub fn new(id: SpaceViewId, title: String) -> Self {
        Self { id, title }
    }
}

impl SpaceView for DetailView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "DetailView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let dataset = ctx.dataset();
        let record = ctx
            .selection
            .selected_id()
            .and_then(|id| dataset.find(&id).cloned());

        let Some(record) = record else {
            ui.centered_and_justified(|ui| {
                ui.label("No record selected");
            });
            return;
        };

        ScrollArea::vertical()
            .id_source(format!("detail_{:?}", self.id))
            .show(ui, |ui| {
                Grid::new(format!("detail_grid_{:?}", self.id))
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (label, value) in detail_rows(&record) {
                            ui.label(RichText::new(label).strong());
                            ui.label(value);
                            ui.end_row();
                        }
                    });
            });
    }
}
