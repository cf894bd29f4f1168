//! Statistiques par faixa : qui sort le plus parmi les bas (1-10), les
//! moyens (11-20) et les hauts (21-31).

use diadesorte_core::rules::band_counts;
use diadesorte_db::models::{DrawRecord, POOL_SIZE};

pub const MIN_BAND_HISTORY: usize = 10;

#[derive(Debug)]
pub struct BandReport {
    pub total_draws: u32,
    pub mean_low: f64,
    pub mean_mid: f64,
    pub mean_high: f64,
    /// Fréquence de chaque numéro, indexée par numéro - 1.
    pub frequencies: [u32; POOL_SIZE as usize],
}

pub fn band_report(history: &[DrawRecord]) -> BandReport {
    let mut frequencies = [0u32; POOL_SIZE as usize];
    let mut low_total = 0u32;
    let mut mid_total = 0u32;
    let mut high_total = 0u32;

    for draw in history {
        for &n in &draw.numbers {
            frequencies[(n - 1) as usize] += 1;
        }
        let (low, mid, high) = band_counts(&draw.numbers);
        low_total += low as u32;
        mid_total += mid as u32;
        high_total += high as u32;
    }

    let total = history.len().max(1) as f64;
    BandReport {
        total_draws: history.len() as u32,
        mean_low: low_total as f64 / total,
        mean_mid: mid_total as f64 / total,
        mean_high: high_total as f64 / total,
        frequencies,
    }
}

/// Numéros d'une faixa triés par fréquence décroissante, tronqués à `top`.
pub fn band_ranking(report: &BandReport, from: u8, to: u8, top: usize) -> Vec<(u8, u32)> {
    let mut ranking: Vec<(u8, u32)> = (from..=to)
        .map(|n| (n, report.frequencies[(n - 1) as usize]))
        .collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranking.truncate(top);
    ranking
}
