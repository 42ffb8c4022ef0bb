mod ai_image_handler;

pub use ai_image_handler::*;
