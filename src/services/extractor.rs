// src/services/extractor.rs
use log::debug;
use regex::Regex;
use scraper::{Html, Selector};

use crate::error::ExtractError;
use crate::models::Target;

/// Pull the price for `target` out of a page.
///
/// `Ok(None)` means the selector matched nothing. Malformed selectors or
/// patterns and text that does not yield a number are errors.
pub fn extract_price(html: &str, target: &Target) -> Result<Option<f64>, ExtractError> {
    let text = match price_text(html, &target.selector)? {
        Some(text) => text,
        None => return Ok(None),
    };
    parse_price(&text, target.regex.as_deref()).map(Some)
}

/// Trimmed text of the first element matching `selector`.
pub fn price_text(html: &str, selector: &str) -> Result<Option<String>, ExtractError> {
    let selector_parsed = Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })?;

    let document = Html::parse_document(html);
    let text = document
        .select(&selector_parsed)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string());
    Ok(text)
}

/// Turn element text into a price, via the capture group of `pattern` when it
/// matches, otherwise by dropping everything except digits and '.'.
pub fn parse_price(text: &str, pattern: Option<&str>) -> Result<f64, ExtractError> {
    if text.is_empty() {
        return Err(ExtractError::EmptyText);
    }

    if let Some(pattern) = pattern {
        let re = Regex::new(pattern)?;
        if re.captures_len() < 2 {
            return Err(ExtractError::MissingCaptureGroup(pattern.to_string()));
        }
        if let Some(caps) = re.captures(text) {
            // An optional group that did not take part counts as a miss.
            let group = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            debug!("Pattern matched {:?} in {:?}", group, text);
            return to_number(group);
        }
        debug!("Pattern {:?} did not match {:?}, stripping non-digits", pattern, text);
    }

    let digits = strip_non_numeric(text);
    if digits.is_empty() {
        return Err(ExtractError::InvalidNumber(text.to_string()));
    }
    to_number(&digits)
}

/// Keep ASCII digits and '.'; everything else, thousands separators
/// included, is dropped.
pub fn strip_non_numeric(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

fn to_number(raw: &str) -> Result<f64, ExtractError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ExtractError::InvalidNumber(trimmed.to_string())),
    }
}
