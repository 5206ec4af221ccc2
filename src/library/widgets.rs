use crate::library::notice::{Notice, NoticeLevel};
use crate::library::shared_image::SharedImage;
use eframe::egui;

pub fn notice_label(ui: &mut egui::Ui, notice: &Notice) {
    let color = match notice.level {
        NoticeLevel::Success => egui::Color32::from_rgb(40, 160, 70),
        NoticeLevel::Info => egui::Color32::from_rgb(60, 120, 200),
        NoticeLevel::Warning => egui::Color32::from_rgb(220, 150, 20),
        NoticeLevel::Error => egui::Color32::from_rgb(210, 50, 50),
    };
    ui.colored_label(color, &notice.text);
}

pub fn to_color_image(image: &SharedImage) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied(
        [image.width() as usize, image.height() as usize],
        image.image.as_raw(),
    )
}

/// Scales `size` down, never up, so its width fits `max_width`.
pub fn fit_width(size: egui::Vec2, max_width: f32) -> egui::Vec2 {
    if size.x <= max_width || size.x == 0.0 {
        return size;
    }
    size * (max_width / size.x)
}
