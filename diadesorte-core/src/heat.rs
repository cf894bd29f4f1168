//! Température des mois de la sorte : 70 % absence récente, 30 % rareté
//! globale, puis tirage pondéré par paliers.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;

use diadesorte_db::models::DrawRecord;
use diadesorte_db::month::LuckyMonth;

/// En dessous de ce nombre de concours, le choix du mois reste uniforme.
pub const MIN_HISTORY: usize = 20;

const GAP_SATURATION: f64 = 100.0;
const GAP_WEIGHT: f64 = 70.0;
const FREQUENCY_WEIGHT: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct MonthHeat {
    pub month: LuckyMonth,
    pub frequency: u32,
    pub gap: u32,
    pub temperature: f64,
}

/// Passe chronologique unique (du plus ancien au plus récent). Un mois
/// reconnu remet sa lacune à zéro et compte en fréquence ; chaque concours
/// vieillit la lacune de tous les autres mois, y compris quand son mois
/// n'est pas reconnu.
pub fn score_months(chronological: &[DrawRecord]) -> Vec<MonthHeat> {
    let mut frequency = [0u32; 12];
    let mut gap = [0u32; 12];

    for record in chronological {
        let current = record.lucky_month.month();
        if let Some(month) = current {
            let idx = (month.index() - 1) as usize;
            frequency[idx] += 1;
            gap[idx] = 0;
        }
        for month in LuckyMonth::ALL {
            if current != Some(month) {
                gap[(month.index() - 1) as usize] += 1;
            }
        }
    }

    let total = chronological.len() as f64;
    let mut heats: Vec<MonthHeat> = LuckyMonth::ALL
        .iter()
        .map(|&month| {
            let idx = (month.index() - 1) as usize;
            let frequency_ratio = if total > 0.0 {
                frequency[idx] as f64 / total
            } else {
                0.0
            };
            let gap_ratio = (gap[idx] as f64 / GAP_SATURATION).min(1.0);
            MonthHeat {
                month,
                frequency: frequency[idx],
                gap: gap[idx],
                temperature: gap_ratio * GAP_WEIGHT + (1.0 - frequency_ratio) * FREQUENCY_WEIGHT,
            }
        })
        .collect();

    heats.sort_by(|a, b| {
        b.temperature
            .partial_cmp(&a.temperature)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    heats
}

pub fn uniform_month(rng: &mut StdRng) -> LuckyMonth {
    *LuckyMonth::ALL.choose(rng).unwrap_or(&LuckyMonth::Janeiro)
}

/// Tirage par paliers sur le classement décroissant : 50 % parmi les rangs
/// 1-3, 30 % parmi 4-7, 15 % parmi 8-10, 5 % parmi les douze.
pub fn choose_month(ranked: &[MonthHeat], rng: &mut StdRng) -> LuckyMonth {
    if ranked.len() < 12 {
        return uniform_month(rng);
    }

    let roll: f64 = rng.random();
    let candidates: &[MonthHeat] = if roll < 0.50 {
        &ranked[..3]
    } else if roll < 0.80 {
        &ranked[3..7]
    } else if roll < 0.95 {
        &ranked[7..10]
    } else {
        ranked
    };

    match candidates.choose(rng) {
        Some(heat) => heat.month,
        None => uniform_month(rng),
    }
}

pub fn choose_month_for_session(chronological: &[DrawRecord], rng: &mut StdRng) -> LuckyMonth {
    if chronological.len() < MIN_HISTORY {
        return uniform_month(rng);
    }
    let ranked = score_months(chronological);
    choose_month(&ranked, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diadesorte_db::month::MonthLabel;
    use rand::SeedableRng;

    fn record(contest: u32, month_text: &str) -> DrawRecord {
        DrawRecord {
            contest,
            date: "01/01/2024".to_string(),
            numbers: [3, 4, 9, 13, 14, 21, 26],
            lucky_month: MonthLabel::parse(month_text),
            prize_value: 0.0,
            accumulated: false,
        }
    }

    fn heat_of(ranked: &[MonthHeat], month: LuckyMonth) -> &MonthHeat {
        ranked.iter().find(|h| h.month == month).unwrap()
    }

    #[test]
    fn test_all_june_history() {
        let history: Vec<DrawRecord> =
            (1..=20).map(|i| record(i, "Junho")).collect();
        let ranked = score_months(&history);

        let june = heat_of(&ranked, LuckyMonth::Junho);
        assert_eq!(june.frequency, 20);
        assert_eq!(june.gap, 0);
        assert!(june.temperature.abs() < 1e-10, "temp = {}", june.temperature);

        // Juin est le mois le plus froid : dernier du classement, jamais
        // dans le palier chaud.
        assert_eq!(ranked[11].month, LuckyMonth::Junho);
        assert!(ranked[..3].iter().all(|h| h.month != LuckyMonth::Junho));

        let others = heat_of(&ranked, LuckyMonth::Janeiro);
        assert_eq!(others.frequency, 0);
        assert_eq!(others.gap, 20);
        assert!((others.temperature - 44.0).abs() < 1e-10);
    }

    #[test]
    fn test_cold_month_rarely_chosen() {
        let history: Vec<DrawRecord> =
            (1..=20).map(|i| record(i, "Junho")).collect();
        let ranked = score_months(&history);

        // Juin ne peut sortir que par le palier « surprise » (5 % × 1/12).
        let mut june_hits = 0;
        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            if choose_month(&ranked, &mut rng) == LuckyMonth::Junho {
                june_hits += 1;
            }
        }
        assert!(june_hits < 25, "Juin choisi {} fois sur 500", june_hits);
    }

    #[test]
    fn test_gap_resets_on_last_occurrence() {
        let mut history: Vec<DrawRecord> =
            (1..=19).map(|i| record(i, "Janeiro")).collect();
        history.push(record(20, "Maio"));

        let ranked = score_months(&history);
        assert_eq!(heat_of(&ranked, LuckyMonth::Maio).gap, 0);
        assert_eq!(heat_of(&ranked, LuckyMonth::Janeiro).gap, 1);
        assert_eq!(heat_of(&ranked, LuckyMonth::Dezembro).gap, 20);
    }

    #[test]
    fn test_unrecognized_month_ages_all_gaps() {
        let history: Vec<DrawRecord> =
            (1..=20).map(|i| record(i, "???")).collect();
        let ranked = score_months(&history);

        for heat in &ranked {
            assert_eq!(heat.frequency, 0);
            assert_eq!(heat.gap, 20);
            assert!((heat.temperature - 44.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_short_history_uniform_fallback() {
        let history: Vec<DrawRecord> = (1..=5).map(|i| record(i, "Junho")).collect();
        let mut rng = StdRng::seed_from_u64(7);
        // Aucune panique, un mois canonique quelconque.
        let month = choose_month_for_session(&history, &mut rng);
        assert!(LuckyMonth::ALL.contains(&month));
    }

    #[test]
    fn test_choice_deterministic_with_seed() {
        let history: Vec<DrawRecord> = (1..=30)
            .map(|i| record(i, LuckyMonth::ALL[(i % 12) as usize].name()))
            .collect();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(
            choose_month_for_session(&history, &mut a),
            choose_month_for_session(&history, &mut b)
        );
    }
}
