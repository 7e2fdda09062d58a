//! Parser integration tests using fixture files
//!
//! - Blood-type index page (link discovery)
//! - Blood-type detail page (field extraction)
//! - Horoscope API payload (JSON extraction)

use chrono::NaiveDate;
use fortune_cache::models::{BloodType, FeedEntry, ZodiacSign};
use fortune_cache::parser::{parse_horoscope, BloodPageParser};
use fortune_cache::utils::error::ParseError;
use std::fs;

/// Test fixture paths
const FIXTURES_DIR: &str = "tests/fixtures";

fn load_fixture(filename: &str) -> String {
    let path = format!("{FIXTURES_DIR}/{filename}");
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to load fixture: {path}"))
}

// ============================================================================
// Blood-type Index Tests
// ============================================================================

#[test]
fn test_index_links() {
    let html = load_fixture("html/bloodtype_today.html");
    let links = BloodPageParser::new().discover_links(&html);

    let labels: Vec<&str> = links.iter().map(|(label, _)| label.as_str()).collect();
    assert_eq!(labels, vec!["A型", "B型", "AB型", "O型"]);
    assert_eq!(links[2].1, "bloodtype_today_ab.html");
}

#[test]
fn test_index_labels_map_to_every_type() {
    let html = load_fixture("html/bloodtype_today.html");
    let types: Vec<BloodType> = BloodPageParser::new()
        .discover_links(&html)
        .iter()
        .filter_map(|(label, _)| BloodType::from_label(label))
        .collect();

    assert_eq!(
        types,
        vec![BloodType::A, BloodType::B, BloodType::AB, BloodType::O]
    );
}

// ============================================================================
// Blood-type Detail Tests
// ============================================================================

#[test]
fn test_detail_page() {
    let html = load_fixture("html/bloodtype_today_ab.html");
    let url = "https://uranai.d-square.co.jp/bloodtype_today_ab.html";
    let entry = BloodPageParser::new().parse_detail(&html, BloodType::AB, url);

    assert_eq!(entry.rank, 2);
    assert_eq!(
        entry.love,
        "気になる人から連絡がありそう。素直な気持ちで応えると吉。"
    );
    assert_eq!(entry.total, entry.love);
    assert_eq!(
        entry.job,
        "集中力が高まる一日。後回しにしていた作業を片付けましょう。"
    );
    assert_eq!(entry.color, "ラベンダー");
    assert_eq!(entry.word, "深呼吸");
    assert_eq!(entry.url, url);
    assert!(entry.is_valid());
}

#[test]
fn test_maintenance_page_yields_invalid_entry() {
    let html = load_fixture("html/bloodtype_today_broken.html");
    let entry = BloodPageParser::new().parse_detail(&html, BloodType::O, "u");

    assert_eq!(entry.blood_type, BloodType::O);
    assert_eq!(entry.rank, 0);
    assert!(entry.love.is_empty());
    assert!(!entry.is_valid());
}

// ============================================================================
// Horoscope Payload Tests
// ============================================================================

#[test]
fn test_horoscope_payload() {
    let json = load_fixture("json/horoscope_2024_01_05.json");
    let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let entries = parse_horoscope(&json, date).unwrap();

    assert_eq!(entries.len(), 12);

    let cancer = entries
        .iter()
        .find(|e| e.sign == ZodiacSign::Cancer)
        .unwrap();
    assert_eq!(cancer.rank, 1);
    assert_eq!(cancer.money, 2);
    assert_eq!(cancer.item, "ハンカチ");
    assert_eq!(cancer.sign_label, "かに座");
    assert!(entries.iter().all(FeedEntry::is_valid));
}

#[test]
fn test_horoscope_other_date_is_missing() {
    let json = load_fixture("json/horoscope_2024_01_05.json");
    let date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();

    let result = parse_horoscope(&json, date);
    assert!(matches!(result, Err(ParseError::MissingDate(_))));
}
