use crate::library::widgets::{notice_label, to_color_image};
use crate::monitoring_page::core::{AlertRow, Event, State, View};
use eframe::egui;
use std::collections::HashMap;

#[derive(Default)]
pub struct Render {
    thumbnails: HashMap<u64, egui::TextureHandle>,
}

impl Render {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ctx: &egui::Context, state: &State) -> Vec<Event> {
        let mut events = vec![];

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Forest Department - Animal Detection Monitoring");
            ui.label("This dashboard monitors dangerous animal alerts detected by the system.");
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("Refresh Alerts").clicked() {
                    events.push(Event::RefreshClicked);
                }
                if ui.button("Clear Alerts").clicked() {
                    events.push(Event::ClearClicked);
                }
            });
            ui.add_space(8.0);

            match &state.view {
                View::Loading | View::Loaded { .. } => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading alerts...");
                    });
                }
                View::Failed { message } => {
                    ui.colored_label(egui::Color32::from_rgb(210, 50, 50), message);
                }
                View::RenderedEmpty { notices } => {
                    for notice in notices {
                        notice_label(ui, notice);
                    }
                    ui.label("No alerts yet.");
                }
                View::RenderedWithRows { rows, notices, .. } => {
                    for notice in notices {
                        notice_label(ui, notice);
                    }
                    ui.strong("Dangerous Animal Alerts");
                    self.alerts_table(ctx, ui, rows);
                }
            }
        });

        events
    }

    fn alerts_table(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, rows: &[AlertRow]) {
        self.thumbnails
            .retain(|id, _| rows.iter().any(|row| row.thumbnail.id == *id));

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("alerts")
                .num_columns(4)
                .striped(true)
                .spacing([24.0, 8.0])
                .show(ui, |ui| {
                    ui.strong("Image");
                    ui.strong("Time");
                    ui.strong("Animal");
                    ui.strong("Confidence");
                    ui.end_row();

                    for row in rows {
                        let texture = self
                            .thumbnails
                            .entry(row.thumbnail.id)
                            .or_insert_with(|| {
                                ctx.load_texture(
                                    row.image_path.clone(),
                                    to_color_image(&row.thumbnail),
                                    egui::TextureOptions::default(),
                                )
                            });
                        ui.image((texture.id(), texture.size_vec2()))
                            .on_hover_text(&row.image_path);
                        ui.label(&row.time);
                        ui.label(&row.animal);
                        ui.label(&row.confidence);
                        ui.end_row();
                    }
                });
        });
    }
}
