//! Payload extraction for both feeds
//!
//! Pure functions with no I/O: the blood feed is scraped from HTML, the
//! zodiac feed is read from the horoscope API's JSON.

pub mod blood;
pub mod selectors;
pub mod zodiac;

pub use blood::{parse_rank, BloodPageParser};
pub use zodiac::parse_horoscope;
