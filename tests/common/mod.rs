//! Common test utilities

#![allow(dead_code)]

use chrono::NaiveDate;
use fortune_cache::models::{FeedKey, ZodiacSign};
use fortune_cache::utils::date_key;
use serde_json::{json, Value};

/// Blood-type index page linking the four detail pages under `base`
pub fn index_page(base: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><body>
  <ul class="bloodtype">
    <li><a href="{base}/bloodtype_today_a.html"><p>A型</p></a></li>
    <li><a href="bloodtype_today_b.html"><p>B型</p></a></li>
    <li><a href="./bloodtype_today_ab.html"><p>AB型</p></a></li>
    <li><a href="/bloodtype_today_o.html"><p>O型</p></a></li>
  </ul>
</body></html>"#
    )
}

/// Blood-type detail page with rank `rank`; every text field starts with `text`
pub fn detail_page(rank: u32, text: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><body>
  <div class="mainbloodtype"><img src="/img/bloodtype/rank{rank:02}.png"></div>
  <div class="pink"><p>{text}の恋愛運</p></div>
  <div class="blue"><p>{text}の仕事運</p></div>
  <ul>
    <li><p>{text}の色</p></li>
    <li><p>{text}の言葉</p></li>
  </ul>
</body></html>"#
    )
}

/// Horoscope payload for `date` covering every sign
///
/// Ranks follow enumeration order reversed, so Pisces is first.
pub fn horoscope(date: NaiveDate, content: &str) -> String {
    let records: Vec<Value> = ZodiacSign::all()
        .iter()
        .enumerate()
        .map(|(i, sign)| {
            json!({
                "content": content,
                "item": "鍵",
                "money": 3,
                "total": 4,
                "job": "5",
                "color": "白",
                "love": 1,
                "rank": 12 - i,
                "sign": sign.japanese_name()
            })
        })
        .collect();

    let mut by_date = serde_json::Map::new();
    by_date.insert(date_key(date), Value::Array(records));
    json!({ "horoscope": by_date }).to_string()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
