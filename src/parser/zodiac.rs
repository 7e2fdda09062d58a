//! JSON extraction for the zodiac feed
//!
//! The horoscope API answers with
//! `{"horoscope": {"YYYY/MM/DD": [ {record}, ... ]}}`, one record per sign.
//! Extraction is all-or-nothing: any bad record rejects the whole payload.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::models::{ZodiacEntry, ZodiacSign};
use crate::utils::date_key;
use crate::utils::error::ParseError;

/// Parse the records published for `date`
///
/// # Errors
///
/// - `ParseError::MalformedPayload` if the body is not the expected JSON shape
/// - `ParseError::MissingDate` if there is no array for `date`
/// - `ParseError::InvalidNumber` / `ParseError::MissingField` for bad records
/// - `ParseError::UnknownSign` / `ParseError::DuplicateSign` for bad sign names
pub fn parse_horoscope(json: &str, date: NaiveDate) -> Result<Vec<ZodiacEntry>, ParseError> {
    let root: Value =
        serde_json::from_str(json).map_err(|e| ParseError::MalformedPayload(e.to_string()))?;

    let horoscope = root
        .get("horoscope")
        .and_then(Value::as_object)
        .ok_or_else(|| ParseError::MalformedPayload("missing 'horoscope' object".to_string()))?;

    let key = date_key(date);
    let records = horoscope
        .get(&key)
        .ok_or_else(|| ParseError::MissingDate(key.clone()))?
        .as_array()
        .ok_or_else(|| ParseError::MalformedPayload(format!("'{key}' is not an array")))?;

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(records.len());

    for record in records {
        let record = record
            .as_object()
            .ok_or_else(|| ParseError::MalformedPayload("record is not an object".to_string()))?;

        let entry = parse_record(record)?;
        if !seen.insert(entry.sign) {
            return Err(ParseError::DuplicateSign(entry.sign_label));
        }
        entries.push(entry);
    }

    Ok(entries)
}

fn parse_record(record: &Map<String, Value>) -> Result<ZodiacEntry, ParseError> {
    let sign_label = text_field(record, "sign")?;
    let sign = ZodiacSign::from_japanese(&sign_label);
    if sign == ZodiacSign::Invalid {
        return Err(ParseError::UnknownSign(sign_label));
    }

    Ok(ZodiacEntry {
        sign,
        rank: number_field(record, "rank")?,
        content: text_field(record, "content")?,
        item: text_field(record, "item")?,
        color: text_field(record, "color")?,
        money: number_field(record, "money")?,
        total: number_field(record, "total")?,
        job: number_field(record, "job")?,
        love: number_field(record, "love")?,
        sign_label,
    })
}

fn text_field(record: &Map<String, Value>, field: &'static str) -> Result<String, ParseError> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(ParseError::MissingField(field)),
        Some(other) => Ok(other.to_string()),
    }
}

/// Numbers are accepted either as JSON numbers or numeric strings
fn number_field(record: &Map<String, Value>, field: &'static str) -> Result<u32, ParseError> {
    let value = record.get(field).ok_or(ParseError::MissingField(field))?;

    let parsed = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
