use anyhow::Result;

use fortune_cache::config::Config;
use fortune_cache::models::{parse_birthday, select_sign, ZodiacEntry, ZodiacSign};

use super::Feeds;

const ATTRIBUTION: &str = "powered by JugemKey http://jugemkey.jp/api/ / 【PR】原宿占い館 塔里木 http://www.tarim.co.jp/";

pub async fn zodiac(config: &Config, sign: Option<String>, birthday: Option<String>) -> Result<()> {
    let feeds = Feeds::from_config(config)?;
    let cache = &feeds.zodiac;

    cache.update().await;

    if cache.is_updating() {
        tracing::info!("Zodiac feed is updating");
        println!("now updating.");
        return Ok(());
    }

    let sign = resolve_sign(sign.as_deref(), birthday.as_deref());
    tracing::debug!(sign = %sign, "Zodiac command");

    if sign == ZodiacSign::Invalid {
        print!("{}", render_ranking(&cache.ranking()));
    } else {
        print!("{}", render_entry(&cache.get(sign)));
    }
    Ok(())
}

/// Sign from the name and/or birthday options; a valid birthday wins
fn resolve_sign(name: Option<&str>, birthday: Option<&str>) -> ZodiacSign {
    let from_name = name.map_or(ZodiacSign::Invalid, ZodiacSign::from_name);
    let from_birthday = birthday
        .and_then(parse_birthday)
        .map_or(ZodiacSign::Invalid, |(month, day)| {
            ZodiacSign::from_birthday(month, day)
        });
    select_sign(from_name, from_birthday)
}

fn render_ranking(ranking: &[ZodiacSign]) -> String {
    let mut out = String::from("星座占い ランキング\n");
    for (i, sign) in ranking.iter().enumerate() {
        out.push_str(&format!(
            "{}位 {}{}\n",
            i + 1,
            sign.emoji(),
            sign.japanese_name()
        ));
    }
    out.push_str(ATTRIBUTION);
    out.push('\n');
    out
}

fn render_entry(entry: &ZodiacEntry) -> String {
    format!(
        "{}{} {}位\n{}\nラッキーアイテム: {}\nラッキーカラー: {}\n金運: {}\n仕事運: {}\n恋愛運: {}\n総合運: {}\n{ATTRIBUTION}\n",
        entry.sign.emoji(),
        entry.sign.japanese_name(),
        entry.rank,
        entry.content,
        entry.item,
        entry.color,
        stars(entry.money),
        stars(entry.job),
        stars(entry.love),
        stars(entry.total),
    )
}

fn stars(score: u32) -> String {
    "★".repeat(score.min(5) as usize)
}
