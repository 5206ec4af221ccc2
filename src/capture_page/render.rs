use crate::capture_page::core::{Event, Phase, State};
use crate::library::shared_image::SharedImage;
use crate::library::widgets::{fit_width, notice_label, to_color_image};
use eframe::egui;

const PREVIEW_MAX_WIDTH: f32 = 640.0;

#[derive(Default)]
pub struct Render {
    frame_texture: Option<(u64, egui::TextureHandle)>,
}

impl Render {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws the page and returns the events triggered by the operator.
    pub fn render(&mut self, ctx: &egui::Context, state: &State) -> Vec<Event> {
        let mut events = vec![];

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Forest Department Animal Classifier");
            ui.label("Click the button to capture an image of the animal using your webcam.");
            ui.add_space(8.0);

            let capture = ui.add_enabled(!state.is_busy(), egui::Button::new("Capture Image"));
            if capture.clicked() {
                events.push(Event::CaptureClicked);
            }
            ui.add_space(8.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                match &state.phase {
                    Phase::Observing { remaining_secs } => {
                        ui.label("Webcam Feed");
                        ui.label(format!("Time remaining: {} seconds", remaining_secs));
                    }
                    Phase::Classifying { .. } => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Classifying...");
                        });
                    }
                    Phase::Logging { .. } => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Logging alert...");
                        });
                    }
                    Phase::Idle => {}
                }

                if let Some(frame) = &state.frame {
                    let texture = self.texture_for(ctx, frame);
                    let size = fit_width(texture.size_vec2(), PREVIEW_MAX_WIDTH);
                    ui.image((texture.id(), size));
                }

                for notice in &state.notices {
                    notice_label(ui, notice);
                }
            });
        });

        events
    }

    fn texture_for(&mut self, ctx: &egui::Context, frame: &SharedImage) -> egui::TextureHandle {
        if let Some((id, texture)) = &mut self.frame_texture {
            if *id != frame.id {
                texture.set(to_color_image(frame), egui::TextureOptions::default());
                *id = frame.id;
            }
            return texture.clone();
        }

        let texture = ctx.load_texture(
            "capture_frame",
            to_color_image(frame),
            egui::TextureOptions::default(),
        );
        self.frame_texture = Some((frame.id, texture.clone()));
        texture
    }
}
