//! HTML extraction for the blood-type feed
//!
//! Extraction never fails: an element that is missing from the page yields an
//! empty string or a zero rank, which marks the resulting entry invalid so the
//! coordinator retries it later.

use scraper::{ElementRef, Html, Selector};

use crate::models::{BloodEntry, BloodType};
use crate::parser::selectors::{DetailSelectors, IndexSelectors};
use crate::utils::normalize_whitespace;

/// Parser for the blood-type index and detail pages
pub struct BloodPageParser {
    index: IndexSelectors,
    detail: DetailSelectors,
}

impl BloodPageParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: IndexSelectors::new(),
            detail: DetailSelectors::new(),
        }
    }

    /// Collect `(label, href)` pairs from the index page, in page order
    ///
    /// Anchors without an `href` are skipped. When a label appears twice the
    /// first link wins.
    pub fn discover_links(&self, html: &str) -> Vec<(String, String)> {
        let document = Html::parse_document(html);
        let mut links: Vec<(String, String)> = Vec::new();

        for anchor in document.select(self.index.link) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let label = anchor
                .select(self.index.label)
                .next()
                .map(|el| normalize_whitespace(&element_text(el)))
                .unwrap_or_default();

            if links.iter().any(|(existing, _)| *existing == label) {
                continue;
            }
            links.push((label, href.trim().to_string()));
        }

        links
    }

    /// Build an entry from one detail page
    pub fn parse_detail(&self, html: &str, blood_type: BloodType, url: &str) -> BloodEntry {
        let document = Html::parse_document(html);
        let (color, word) = self.extract_lucky(&document);

        BloodEntry {
            blood_type,
            rank: self.extract_rank(&document),
            total: self.extract_total(&document),
            color,
            word,
            love: self.extract_love(&document),
            job: self.extract_job(&document),
            url: url.to_string(),
        }
    }

    /// Rank from the `rankNN.png` image, `0` when absent
    pub fn extract_rank(&self, document: &Html) -> u32 {
        self.detail
            .rank_image
            .iter()
            .flat_map(|selector| document.select(selector))
            .filter_map(|img| img.value().attr("src"))
            .map(|src| rank_from_src(&self.detail, src))
            .find(|rank| *rank != 0)
            .unwrap_or(0)
    }

    pub fn extract_total(&self, document: &Html) -> String {
        self.container_paragraph(document, self.detail.total)
    }

    pub fn extract_love(&self, document: &Html) -> String {
        self.container_paragraph(document, self.detail.love)
    }

    pub fn extract_job(&self, document: &Html) -> String {
        self.container_paragraph(document, self.detail.job)
    }

    /// Lucky color and lucky word; both empty unless the list has two items
    pub fn extract_lucky(&self, document: &Html) -> (String, String) {
        let items: Vec<ElementRef<'_>> = document.select(self.detail.lucky_items).collect();
        if items.len() < 2 {
            return (String::new(), String::new());
        }

        (
            self.first_paragraph(items[0]),
            self.first_paragraph(items[1]),
        )
    }

    fn container_paragraph(&self, document: &Html, container: &Selector) -> String {
        document
            .select(container)
            .next()
            .map(|div| self.first_paragraph(div))
            .unwrap_or_default()
    }

    fn first_paragraph(&self, element: ElementRef<'_>) -> String {
        element
            .select(self.detail.paragraph)
            .next()
            .map(|p| element_text(p).trim().to_string())
            .unwrap_or_default()
    }
}

impl Default for BloodPageParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the two-digit rank out of an image path such as `img/rank07.png`
///
/// Returns `0` when the path does not match.
pub fn parse_rank(src: &str) -> u32 {
    rank_from_src(&DetailSelectors::new(), src)
}

fn rank_from_src(selectors: &DetailSelectors, src: &str) -> u32 {
    selectors
        .rank_pattern
        .captures(src)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
        .unwrap_or(0)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedEntry;

    const INDEX_HTML: &str = r#"
        <html><body>
          <ul class="bloodtype">
            <li><a href="bloodtype_today_a.html"><p> A型 </p></a></li>
            <li><a href="bloodtype_today_b.html"><p>B型</p></a></li>
            <li><a href="bloodtype_today_ab.html"><p>AB型</p></a></li>
            <li><a href="bloodtype_today_o.html"><p>O型</p></a></li>
            <li><a><p>no link</p></a></li>
          </ul>
        </body></html>
    "#;

    const DETAIL_HTML: &str = r#"
        <html><body>
          <div class="mainbloodtype"><img src="/img/bloodtype/rank03.png"></div>
          <div class="pink"><p>恋愛運は好調です。</p></div>
          <div class="blue"><p>仕事運はまずまず。</p></div>
          <ul>
            <li><p>赤</p></li>
            <li><p>笑顔</p></li>
          </ul>
        </body></html>
    "#;

    #[test]
    fn test_discover_links_in_page_order() {
        let parser = BloodPageParser::new();
        let links = parser.discover_links(INDEX_HTML);

        assert_eq!(links.len(), 4);
        assert_eq!(
            links[0],
            ("A型".to_string(), "bloodtype_today_a.html".to_string())
        );
        assert_eq!(links[3].0, "O型");
    }

    #[test]
    fn test_discover_links_keeps_first_duplicate() {
        let html = r#"<ul class="bloodtype">
            <li><a href="first.html"><p>A型</p></a></li>
            <li><a href="second.html"><p>A型</p></a></li>
        </ul>"#;
        let links = BloodPageParser::new().discover_links(html);
        assert_eq!(links, vec![("A型".to_string(), "first.html".to_string())]);
    }

    #[test]
    fn test_discover_links_empty_page() {
        let links = BloodPageParser::new().discover_links("<html></html>");
        assert!(links.is_empty());
    }

    #[test]
    fn test_parse_detail() {
        let parser = BloodPageParser::new();
        let entry = parser.parse_detail(DETAIL_HTML, BloodType::AB, "https://example.com/ab");

        assert_eq!(entry.blood_type, BloodType::AB);
        assert_eq!(entry.rank, 3);
        assert_eq!(entry.love, "恋愛運は好調です。");
        assert_eq!(entry.total, "恋愛運は好調です。");
        assert_eq!(entry.job, "仕事運はまずまず。");
        assert_eq!(entry.color, "赤");
        assert_eq!(entry.word, "笑顔");
        assert_eq!(entry.url, "https://example.com/ab");
        assert!(entry.is_valid());
    }

    #[test]
    fn test_parse_detail_missing_elements_is_invalid() {
        let parser = BloodPageParser::new();
        let entry = parser.parse_detail("<html><body></body></html>", BloodType::O, "u");

        assert_eq!(entry.rank, 0);
        assert!(entry.total.is_empty());
        assert!(entry.color.is_empty());
        assert!(entry.word.is_empty());
        assert!(!entry.is_valid());
    }

    #[test]
    fn test_lucky_needs_two_items() {
        let parser = BloodPageParser::new();
        let doc = Html::parse_document("<ul><li><p>赤</p></li></ul>");
        assert_eq!(parser.extract_lucky(&doc), (String::new(), String::new()));
    }

    #[test]
    fn test_rank_image_outside_main_block() {
        let parser = BloodPageParser::new();
        let doc = Html::parse_document(
            r#"<img src="/logo.png"><div><img src="/img/rank12.png"></div>"#,
        );
        assert_eq!(parser.extract_rank(&doc), 12);
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!(parse_rank("rank07.png"), 7);
        assert_eq!(parse_rank("/img/bloodtype/rank01.png"), 1);
        assert_eq!(parse_rank("rank00.png"), 0);
        assert_eq!(parse_rank("rank7.png"), 0);
        assert_eq!(parse_rank("banner.png"), 0);
    }
}
