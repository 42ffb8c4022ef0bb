//! Outbound message templates (webhook notifications, image prompts).

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::Value;
use std::collections::HashMap;

use crate::features::submissions::models::Category;
use crate::shared::constants::WEBHOOK_PREVIEW_CHARS;

/// Shorten `content` to the webhook preview length, marking the cut with "…"
pub fn preview(content: &str) -> String {
    if content.chars().count() <= WEBHOOK_PREVIEW_CHARS {
        return content.to_string();
    }
    let cut: String = content.chars().take(WEBHOOK_PREVIEW_CHARS).collect();
    format!("{}…", cut.trim_end())
}

/// Render the Discord message announcing a new submission
pub fn render_new_submission_message(
    category: Category,
    title: &str,
    content: &str,
    barrio: Option<&str>,
) -> Result<String, TemplateError> {
    let icon = match category {
        Category::Rumor => "📰 Rumor",
        Category::Reporte => "📮 Buzón",
    };

    let mut ctx: HashMap<&str, Value> = HashMap::new();
    ctx.insert("icon", Value::from(icon));
    ctx.insert("title", Value::from(title));
    ctx.insert("preview", Value::from(preview(content)));
    ctx.insert("barrio", Value::from(barrio));

    render_template("discord/new_submission.jinja", &ctx)
}

/// Render the webhook connectivity test message
pub fn render_ping_message(path: &str) -> Result<String, TemplateError> {
    let mut ctx: HashMap<&str, Value> = HashMap::new();
    ctx.insert("path", Value::from(path));

    render_template("discord/ping.jinja", &ctx)
}

/// Render the illustration prompt used for the daily top submission
pub fn render_top_of_day_prompt(category: Category, title: &str) -> Result<String, TemplateError> {
    let mut ctx: HashMap<&str, Value> = HashMap::new();
    ctx.insert("title", Value::from(title));
    ctx.insert("category", Value::from(category.as_str()));

    render_template("ai_images/top_of_day.jinja", &ctx)
}
