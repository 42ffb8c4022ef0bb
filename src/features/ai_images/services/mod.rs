mod ai_image_service;

pub use ai_image_service::AiImageService;
