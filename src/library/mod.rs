pub mod logger;
pub mod notice;
pub mod shared_image;
pub mod widgets;
