use anyhow::Result;
use std::path::PathBuf;

use fortune_cache::omikuji::{find_slip, DEFAULT_SLIP_DIR};

pub fn omikuji(dir: Option<PathBuf>) -> Result<()> {
    let dir = dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SLIP_DIR));
    let mut rng = rand::thread_rng();

    match find_slip(&dir, &mut rng) {
        Some(path) => {
            tracing::info!(path = %path.display(), "Drew omikuji slip");
            println!("{}", path.display());
        }
        None => {
            tracing::warn!(dir = %dir.display(), "No omikuji slip image available");
            println!();
        }
    }

    Ok(())
}
