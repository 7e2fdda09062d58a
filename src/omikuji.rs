//! Omikuji fortune slips
//!
//! Seven slip images `00.png`..`06.png` are drawn with fixed weights, from
//! best luck to worst.

use rand::Rng;
use std::path::{Path, PathBuf};

/// Relative weight of each slip, indexed by slip number
pub const SLIP_WEIGHTS: [u32; 7] = [10, 15, 20, 20, 20, 10, 5];

/// Default directory holding the slip images
pub const DEFAULT_SLIP_DIR: &str = "fortune_images";

fn total_weight() -> u32 {
    SLIP_WEIGHTS.iter().sum()
}

/// Map a roll in `0..total_weight` to a slip index by cumulative weight
///
/// Rolls past the end fall back to the last slip.
pub fn slip_for_roll(roll: u32) -> u8 {
    let mut cumulative = 0;
    for (index, weight) in SLIP_WEIGHTS.iter().enumerate() {
        cumulative += weight;
        if roll < cumulative {
            return index as u8;
        }
    }
    (SLIP_WEIGHTS.len() - 1) as u8
}

/// Draw one slip index
pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    slip_for_roll(rng.gen_range(0..total_weight()))
}

/// `<dir>/NN.png`
pub fn slip_path(dir: &Path, index: u8) -> PathBuf {
    dir.join(format!("{index:02}.png"))
}

/// Draw a slip and return its image path if the file exists
pub fn find_slip<R: Rng + ?Sized>(dir: &Path, rng: &mut R) -> Option<PathBuf> {
    let index = draw(rng);
    let path = slip_path(dir, index);
    if path.is_file() {
        Some(path)
    } else {
        tracing::debug!(path = %path.display(), "Slip image not found");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_slip_boundaries() {
        assert_eq!(slip_for_roll(0), 0);
        assert_eq!(slip_for_roll(9), 0);
        assert_eq!(slip_for_roll(10), 1);
        assert_eq!(slip_for_roll(24), 1);
        assert_eq!(slip_for_roll(25), 2);
        assert_eq!(slip_for_roll(94), 5);
        assert_eq!(slip_for_roll(95), 6);
        assert_eq!(slip_for_roll(99), 6);
        assert_eq!(slip_for_roll(1000), 6);
    }

    #[test]
    fn test_draw_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0u32; 7];
        for _ in 0..10_000 {
            counts[draw(&mut rng) as usize] += 1;
        }

        assert!(counts.iter().all(|c| *c > 0));
        // slip 6 is the rarest, slips 2..=4 the most common
        assert!(counts[6] < counts[0]);
        assert!(counts[6] < counts[3]);
    }

    #[test]
    fn test_slip_path() {
        let path = slip_path(Path::new("fortune_images"), 3);
        assert_eq!(path, PathBuf::from("fortune_images/03.png"));
    }

    #[test]
    fn test_find_slip() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(find_slip(dir.path(), &mut rng).is_none());

        for index in 0..7u8 {
            std::fs::write(slip_path(dir.path(), index), b"png").unwrap();
        }
        let found = find_slip(dir.path(), &mut rng).unwrap();
        assert!(found.starts_with(dir.path()));
        assert_eq!(found.extension().unwrap(), "png");
    }
}
