mod ai_image_dto;

pub use ai_image_dto::{AiImageResponseDto, GenerateImageDto, ReviewImageDto};
