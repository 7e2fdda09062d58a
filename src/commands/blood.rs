use anyhow::Result;

use fortune_cache::config::Config;
use fortune_cache::models::{BloodEntry, BloodType};

use super::Feeds;

pub async fn blood(config: &Config, blood_type: Option<String>) -> Result<()> {
    let feeds = Feeds::from_config(config)?;
    let cache = &feeds.blood;

    cache.update().await;

    if cache.is_updating() {
        tracing::info!("Blood feed is updating");
        println!("blood now updating.");
        return Ok(());
    }

    let blood_type = BloodType::from_name(blood_type.as_deref().unwrap_or_default());
    tracing::debug!(blood_type = %blood_type, "Blood command");

    if blood_type != BloodType::Invalid {
        print!("{}", render_entry(&cache.get(blood_type)));
        return Ok(());
    }

    if !cache.is_valid() {
        tracing::warn!("Blood feed is not valid");
        println!("blood error.");
        return Ok(());
    }

    print!(
        "{}",
        render_ranking(&cache.ranking(), &config.sources.blood_index_url)
    );
    Ok(())
}

fn render_ranking(ranking: &[BloodType], source_url: &str) -> String {
    let mut out = String::from("血液型占い ランキング\n");
    for (i, blood_type) in ranking.iter().enumerate() {
        out.push_str(&format!("{}位 {}型\n", i + 1, blood_type));
    }
    out.push_str(&format!("占いスクエア 今日の血液型占い {source_url}\n"));
    out
}

fn render_entry(entry: &BloodEntry) -> String {
    format!(
        "{}型\n総合運: {}\nラッキーカラー: {}\nラッキーワード: {}\n恋愛運: {}\n仕事運: {}\n占いスクエア 今日の血液型占い {}\n",
        entry.blood_type, entry.total, entry.color, entry.word, entry.love, entry.job, entry.url
    )
}
