use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationErrors;

use crate::core::error::{AppError, Result};
use crate::shared::constants::VOTER_MAX_CHARS;

lazy_static! {
    /// Phone-number-like digit runs: ten or more digits, optionally separated
    /// by single spaces, dots or dashes, with an optional leading `+`
    /// - Matches: "5512345678", "+52 55 1234 5678", "55-1234-5678"
    /// - Ignores: "12-05-2024", "calle 5 de mayo 123"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"\+?\d(?:[\s.\-]?\d){9,}").unwrap();
}

/// Trim and turn empty strings into `None`
pub fn trim_to_option(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Collapse validator output into the single message shown to the end user.
///
/// Fields are visited in name order so the chosen message is stable.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Datos inválidos".to_string())
}

/// Map validator output onto `AppError::Validation`
pub fn validation_error(errors: ValidationErrors) -> AppError {
    AppError::Validation(first_validation_message(&errors))
}

/// Voter ids are opaque client-chosen strings. They are trimmed and bounded,
/// never verified.
pub fn normalize_voter(voter: &str) -> Result<String> {
    let voter = voter.trim();
    if voter.is_empty() {
        return Err(AppError::Validation(
            "Falta el identificador del votante".to_string(),
        ));
    }
    if voter.chars().count() > VOTER_MAX_CHARS {
        return Err(AppError::Validation(
            "Identificador de votante inválido".to_string(),
        ));
    }
    Ok(voter.to_string())
}

/// Rejects banned words and personal phone numbers in user text
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    blocklist: Vec<String>,
}

impl ContentFilter {
    pub fn new(blocklist: Vec<String>) -> Self {
        let blocklist = blocklist
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { blocklist }
    }

    pub fn check(&self, text: &str) -> Result<()> {
        let lowered = text.to_lowercase();
        if self.blocklist.iter().any(|bad| lowered.contains(bad)) {
            return Err(AppError::Validation("Lenguaje no permitido.".to_string()));
        }
        if PHONE_REGEX.is_match(text) {
            return Err(AppError::Validation(
                "No publiques teléfonos ni datos personales.".to_string(),
            ));
        }
        Ok(())
    }

    pub fn check_all<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Result<()> {
        texts.into_iter().try_for_each(|t| self.check(t))
    }
}
