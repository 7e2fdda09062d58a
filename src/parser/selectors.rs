//! CSS selectors for the blood-type fortune pages
//!
//! The index page lists one link per blood type; every detail page shares the
//! same layout (rank image, colored text boxes, lucky color/word list).

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    // Index page
    static ref INDEX_LINK: Selector = parse_selector!("ul.bloodtype li a");
    static ref INDEX_LABEL: Selector = parse_selector!("p");

    // Detail page: tried in order, first image whose src matches the rank pattern wins
    static ref DETAIL_RANK_IMAGE: Vec<Selector> = vec![
        parse_selector!("div.mainbloodtype > img"),
        parse_selector!("img"),
    ];

    // Overall luck shares the pink box with love luck on the live pages.
    static ref DETAIL_TOTAL: Selector = parse_selector!(".pink");
    static ref DETAIL_LOVE: Selector = parse_selector!(".pink");
    static ref DETAIL_JOB: Selector = parse_selector!(".blue");
    static ref DETAIL_LUCKY_ITEMS: Selector = parse_selector!("ul > li");
    static ref PARAGRAPH: Selector = parse_selector!("p");

    static ref RANK_IMAGE_RE: Regex =
        Regex::new(r"rank(\d{2})\.png").expect("Invalid rank image pattern");
}

/// Selectors for the blood-type index page
pub struct IndexSelectors {
    /// Anchors, one per blood type
    pub link: &'static Selector,
    /// Child element carrying the label text (`A型`, ...)
    pub label: &'static Selector,
}

impl IndexSelectors {
    pub fn new() -> Self {
        Self {
            link: &INDEX_LINK,
            label: &INDEX_LABEL,
        }
    }
}

impl Default for IndexSelectors {
    fn default() -> Self {
        Self::new()
    }
}

/// Selectors for a per-type detail page
pub struct DetailSelectors {
    pub rank_image: &'static [Selector],
    pub rank_pattern: &'static Regex,
    pub total: &'static Selector,
    pub love: &'static Selector,
    pub job: &'static Selector,
    /// List items holding lucky color (first) and lucky word (second)
    pub lucky_items: &'static Selector,
    /// Paragraph nested in any of the containers above
    pub paragraph: &'static Selector,
}

impl DetailSelectors {
    pub fn new() -> Self {
        Self {
            rank_image: &DETAIL_RANK_IMAGE,
            rank_pattern: &RANK_IMAGE_RE,
            total: &DETAIL_TOTAL,
            love: &DETAIL_LOVE,
            job: &DETAIL_JOB,
            lucky_items: &DETAIL_LUCKY_ITEMS,
            paragraph: &PARAGRAPH,
        }
    }
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_initialize() {
        let detail = DetailSelectors::new();
        assert_eq!(detail.rank_image.len(), 2);

        let _ = IndexSelectors::default();
    }

    #[test]
    fn test_rank_pattern() {
        let detail = DetailSelectors::new();
        let caps = detail
            .rank_pattern
            .captures("/img/bloodtype/rank07.png")
            .unwrap();
        assert_eq!(&caps[1], "07");
        assert!(detail.rank_pattern.captures("/img/rank7.png").is_none());
    }
}
