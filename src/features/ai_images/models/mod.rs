mod ai_image;

pub use ai_image::{plan_review, AiImage, AiImageStatus, ImageDecision, NewAiImage};
