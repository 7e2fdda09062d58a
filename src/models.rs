// Core data structures for the fortune feeds

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// A closed enumeration identifying one subject of a feed
///
/// Implementors carry a sentinel `Invalid` variant for unparseable input;
/// [`FeedKey::all`] never includes it.
pub trait FeedKey: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {
    /// Every real key of the feed, in enumeration order
    fn all() -> &'static [Self];
}

/// One cached result for a [`FeedKey`]
pub trait FeedEntry: Clone + Debug + Send + Sync + 'static {
    type Key: FeedKey;

    fn key(&self) -> Self::Key;

    /// 1-based rank, `0` when unknown
    fn rank(&self) -> u32;

    /// Whether the entry is complete enough to be kept until the next day
    fn is_valid(&self) -> bool;

    /// Empty entry returned for keys that have never been fetched
    fn placeholder(key: Self::Key) -> Self;
}

// ============================================================================
// Blood type feed
// ============================================================================

/// Blood type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BloodType {
    A,
    B,
    AB,
    O,
    Invalid,
}

const BLOOD_TYPES: [BloodType; 4] = [BloodType::A, BloodType::B, BloodType::AB, BloodType::O];

impl BloodType {
    /// Parse user input (`a`, `B`, `ab`, ...); anything else is `Invalid`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "a" => Self::A,
            "b" => Self::B,
            "ab" => Self::AB,
            "o" => Self::O,
            _ => Self::Invalid,
        }
    }

    /// Map a label from the index page (`A型`, `AB型`, ...) to a key
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "A型" => Some(Self::A),
            "B型" => Some(Self::B),
            "AB型" => Some(Self::AB),
            "O型" => Some(Self::O),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::AB => "AB",
            Self::O => "O",
            Self::Invalid => "Invalid",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::A => "🅰",
            Self::B => "🅱",
            Self::AB => "🆎",
            Self::O => "🅾",
            Self::Invalid => "",
        }
    }
}

impl FeedKey for BloodType {
    fn all() -> &'static [Self] {
        &BLOOD_TYPES
    }
}

impl std::fmt::Display for BloodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Today's forecast for one blood type, scraped from its detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodEntry {
    pub blood_type: BloodType,
    pub rank: u32,
    /// Overall luck text
    pub total: String,
    pub color: String,
    pub word: String,
    pub love: String,
    pub job: String,
    /// Detail page the entry was scraped from
    pub url: String,
}

impl FeedEntry for BloodEntry {
    type Key = BloodType;

    fn key(&self) -> BloodType {
        self.blood_type
    }

    fn rank(&self) -> u32 {
        self.rank
    }

    fn is_valid(&self) -> bool {
        self.rank != 0
            && !self.total.is_empty()
            && !self.color.is_empty()
            && !self.word.is_empty()
            && !self.love.is_empty()
            && !self.job.is_empty()
            && !self.url.is_empty()
    }

    fn placeholder(blood_type: BloodType) -> Self {
        Self {
            blood_type,
            rank: 0,
            total: String::new(),
            color: String::new(),
            word: String::new(),
            love: String::new(),
            job: String::new(),
            url: String::new(),
        }
    }
}

// ============================================================================
// Zodiac feed
// ============================================================================

/// Zodiac sign enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpius,
    Sagittarius,
    Capricornus,
    Aquarius,
    Pisces,
    Invalid,
}

const ZODIAC_SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpius,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricornus,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

/// (sign, begin (month, day), end (month, day)), inclusive
const ZODIAC_RANGES: [(ZodiacSign, (u32, u32), (u32, u32)); 12] = [
    (ZodiacSign::Aries, (3, 21), (4, 19)),
    (ZodiacSign::Taurus, (4, 20), (5, 20)),
    (ZodiacSign::Gemini, (5, 21), (6, 21)),
    (ZodiacSign::Cancer, (6, 22), (7, 22)),
    (ZodiacSign::Leo, (7, 23), (8, 22)),
    (ZodiacSign::Virgo, (8, 23), (9, 22)),
    (ZodiacSign::Libra, (9, 23), (10, 23)),
    (ZodiacSign::Scorpius, (10, 24), (11, 22)),
    (ZodiacSign::Sagittarius, (11, 23), (12, 21)),
    (ZodiacSign::Capricornus, (12, 22), (1, 19)),
    (ZodiacSign::Aquarius, (1, 20), (2, 18)),
    (ZodiacSign::Pisces, (2, 19), (3, 20)),
];

fn date_code((month, day): (u32, u32)) -> u32 {
    month * 100 + day
}

impl ZodiacSign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpius => "Scorpius",
            Self::Sagittarius => "Sagittarius",
            Self::Capricornus => "Capricornus",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
            Self::Invalid => "Invalid",
        }
    }

    /// Case-insensitive match against the enumeration names
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        ZODIAC_SIGNS
            .iter()
            .copied()
            .find(|sign| sign.as_str().eq_ignore_ascii_case(name))
            .unwrap_or(Self::Invalid)
    }

    /// Map the localized sign name used by the horoscope API
    ///
    /// Both the kana and the kanji spelling are accepted.
    pub fn from_japanese(name: &str) -> Self {
        match name.trim() {
            "おひつじ座" | "牡羊座" => Self::Aries,
            "おうし座" | "牡牛座" => Self::Taurus,
            "ふたご座" | "双子座" => Self::Gemini,
            "かに座" | "蟹座" => Self::Cancer,
            "しし座" | "獅子座" => Self::Leo,
            "おとめ座" | "乙女座" => Self::Virgo,
            "てんびん座" | "天秤座" => Self::Libra,
            "さそり座" | "蠍座" => Self::Scorpius,
            "いて座" | "射手座" => Self::Sagittarius,
            "やぎ座" | "山羊座" => Self::Capricornus,
            "みずがめ座" | "水瓶座" => Self::Aquarius,
            "うお座" | "魚座" => Self::Pisces,
            _ => Self::Invalid,
        }
    }

    /// Resolve a birthday to its sign
    ///
    /// Capricornus spans the turn of the year and is checked first. Dates that
    /// do not exist (e.g. 4/31) resolve to `Invalid`; 2/29 is accepted.
    pub fn from_birthday(month: u32, day: u32) -> Self {
        // 2000 is a leap year, so every real birthday is representable.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Self::Invalid;
        }

        let code = date_code((month, day));
        let (_, cap_begin, cap_end) = ZODIAC_RANGES[9];
        if code >= date_code(cap_begin) || code <= date_code(cap_end) {
            return Self::Capricornus;
        }

        ZODIAC_RANGES
            .iter()
            .find(|(_, begin, end)| date_code(*begin) <= code && code <= date_code(*end))
            .map(|(sign, _, _)| *sign)
            .unwrap_or(Self::Invalid)
    }

    pub fn japanese_name(&self) -> &'static str {
        match self {
            Self::Aries => "おひつじ座",
            Self::Taurus => "おうし座",
            Self::Gemini => "ふたご座",
            Self::Cancer => "かに座",
            Self::Leo => "しし座",
            Self::Virgo => "おとめ座",
            Self::Libra => "てんびん座",
            Self::Scorpius => "さそり座",
            Self::Sagittarius => "いて座",
            Self::Capricornus => "やぎ座",
            Self::Aquarius => "みずがめ座",
            Self::Pisces => "うお座",
            Self::Invalid => "",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Aries => "♈",
            Self::Taurus => "♉",
            Self::Gemini => "♊",
            Self::Cancer => "♋",
            Self::Leo => "♌",
            Self::Virgo => "♍",
            Self::Libra => "♎",
            Self::Scorpius => "♏",
            Self::Sagittarius => "♐",
            Self::Capricornus => "♑",
            Self::Aquarius => "♒",
            Self::Pisces => "♓",
            Self::Invalid => "",
        }
    }
}

impl FeedKey for ZodiacSign {
    fn all() -> &'static [Self] {
        &ZODIAC_SIGNS
    }
}

impl std::fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pick the sign to show when both a name and a birthday were given
///
/// A valid birthday wins; otherwise the name is used.
pub fn select_sign(from_name: ZodiacSign, from_birthday: ZodiacSign) -> ZodiacSign {
    if from_birthday == ZodiacSign::Invalid {
        from_name
    } else {
        from_birthday
    }
}

/// Parse a `month/day` birthday string
pub fn parse_birthday(text: &str) -> Option<(u32, u32)> {
    let (month, day) = text.trim().split_once('/')?;
    let month = month.trim().parse().ok()?;
    let day = day.trim().parse().ok()?;
    Some((month, day))
}

/// Today's horoscope for one sign, from the JSON API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZodiacEntry {
    pub sign: ZodiacSign,
    pub rank: u32,
    pub content: String,
    pub item: String,
    pub color: String,
    pub money: u32,
    pub total: u32,
    pub job: u32,
    pub love: u32,
    /// Sign name exactly as served by the API
    pub sign_label: String,
}

impl FeedEntry for ZodiacEntry {
    type Key = ZodiacSign;

    fn key(&self) -> ZodiacSign {
        self.sign
    }

    fn rank(&self) -> u32 {
        self.rank
    }

    fn is_valid(&self) -> bool {
        self.rank != 0
    }

    fn placeholder(sign: ZodiacSign) -> Self {
        Self {
            sign,
            rank: 0,
            content: String::new(),
            item: String::new(),
            color: String::new(),
            money: 0,
            total: 0,
            job: 0,
            love: 0,
            sign_label: String::new(),
        }
    }
}
