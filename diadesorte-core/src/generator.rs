//! Génération de combinaisons : recherche aléatoire bornée, puis
//! construction forcée, puis dernier recours non contraint (marqué dégradé).

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;

use diadesorte_db::models::{PickStatus, PICK_SIZE, POOL_SIZE};

use crate::rules;

pub const MAX_RANDOM_ATTEMPTS: u32 = 1000;
pub const MAX_FORCED_ATTEMPTS: u32 = 500;

#[derive(Debug, Clone)]
pub struct Generated {
    pub numbers: [u8; PICK_SIZE],
    pub attempts: u32,
    pub status: PickStatus,
}

pub fn generate(
    previous: Option<&[u8; PICK_SIZE]>,
    triggers: &BTreeSet<u8>,
    use_triggers: bool,
    rng: &mut StdRng,
) -> Generated {
    let previous_slice = previous.map(|p| p.as_slice());

    for attempt in 1..=MAX_RANDOM_ATTEMPTS {
        let mut base: Vec<u8> = Vec::with_capacity(PICK_SIZE);

        if use_triggers && !triggers.is_empty() {
            let pool: Vec<u8> = triggers.iter().copied().collect();
            let take = rng.random_range(1..=pool.len().min(3));
            base.extend(pool.choose_multiple(rng, take).copied());
        }

        let remaining: Vec<u8> = (1..=POOL_SIZE).filter(|n| !base.contains(n)).collect();
        let needed = PICK_SIZE - base.len();
        base.extend(remaining.choose_multiple(rng, needed).copied());
        base.sort_unstable();

        if rules::validate(&base, previous_slice) {
            return Generated {
                numbers: to_array(&base),
                attempts: attempt,
                status: PickStatus::Validated,
            };
        }
    }

    forced_generate(previous, triggers, use_triggers, rng)
}

/// Construction forcée : pré-satisfait les règles 4 (deux répétitions), 1
/// (parité) et 2 (réparation des finales), puis revalide l'ensemble.
fn forced_generate(
    previous: Option<&[u8; PICK_SIZE]>,
    triggers: &BTreeSet<u8>,
    use_triggers: bool,
    rng: &mut StdRng,
) -> Generated {
    let previous_slice = previous.map(|p| p.as_slice());

    for attempt in 1..=MAX_FORCED_ATTEMPTS {
        let mut base: Vec<u8> = Vec::with_capacity(PICK_SIZE);

        if let Some(previous) = previous {
            base.extend(previous.choose_multiple(rng, 2).copied());
        }

        if use_triggers && base.len() < 6 {
            let free: Vec<u8> = triggers
                .iter()
                .copied()
                .filter(|n| !base.contains(n))
                .collect();
            if let Some(&trigger) = free.choose(rng) {
                base.push(trigger);
            }
        }

        let even_used = base.iter().filter(|n| *n % 2 == 0).count();
        let odd_used = base.len() - even_used;
        if even_used > 3 || odd_used > 4 {
            continue;
        }
        let even_needed = 3 - even_used;
        let odd_needed = 4 - odd_used;

        let even_pool: Vec<u8> = (2..=POOL_SIZE)
            .step_by(2)
            .filter(|n| !base.contains(n))
            .collect();
        let odd_pool: Vec<u8> = (1..=POOL_SIZE)
            .step_by(2)
            .filter(|n| !base.contains(n))
            .collect();
        if even_pool.len() < even_needed || odd_pool.len() < odd_needed {
            continue;
        }

        base.extend(even_pool.choose_multiple(rng, even_needed).copied());
        base.extend(odd_pool.choose_multiple(rng, odd_needed).copied());

        let mut repaired = repair_finals(&base, rng);
        repaired.sort_unstable();

        if repaired.len() == PICK_SIZE && rules::validate(&repaired, previous_slice) {
            return Generated {
                numbers: to_array(&repaired),
                attempts: MAX_RANDOM_ATTEMPTS + attempt,
                status: PickStatus::Validated,
            };
        }
    }

    // Dernier recours : tirage uniforme sans contrainte, jamais confondu
    // avec un succès.
    let pool: Vec<u8> = (1..=POOL_SIZE).collect();
    let mut numbers: Vec<u8> = pool.choose_multiple(rng, PICK_SIZE).copied().collect();
    numbers.sort_unstable();
    Generated {
        numbers: to_array(&numbers),
        attempts: MAX_RANDOM_ATTEMPTS + MAX_FORCED_ATTEMPTS,
        status: PickStatus::Degraded,
    }
}

/// Réparation des finales (règle 2) : si l'amorce a déjà exactement deux
/// finales doublées et aucune triplée, elle est rendue telle quelle. Sinon,
/// reconstruction : deux finales tirées au sort avec deux numéros chacune,
/// complétées par des numéros de finales encore inutilisées. Meilleur
/// effort : l'appelant doit revalider les cinq règles.
pub fn repair_finals(seed: &[u8], rng: &mut StdRng) -> Vec<u8> {
    let histogram = rules::final_histogram(seed);
    let doubles = histogram.iter().filter(|&&count| count == 2).count();
    let triples = histogram.iter().filter(|&&count| count >= 3).count();
    if seed.len() == PICK_SIZE && doubles == 2 && triples == 0 {
        return seed.to_vec();
    }

    let mut rebuilt: Vec<u8> = Vec::with_capacity(PICK_SIZE);
    let mut used_finals: BTreeSet<u8> = BTreeSet::new();

    let finals: Vec<u8> = (0..10).collect();
    let pair_finals: Vec<u8> = finals.choose_multiple(rng, 2).copied().collect();
    for &final_digit in &pair_finals {
        let candidates: Vec<u8> = (1..=POOL_SIZE)
            .filter(|n| n % 10 == final_digit && !rebuilt.contains(n))
            .collect();
        if candidates.len() >= 2 {
            rebuilt.extend(candidates.choose_multiple(rng, 2).copied());
            used_finals.insert(final_digit);
        }
    }

    while rebuilt.len() < PICK_SIZE {
        let candidate = rng.random_range(1..=POOL_SIZE);
        if !rebuilt.contains(&candidate) && !used_finals.contains(&(candidate % 10)) {
            rebuilt.push(candidate);
            used_finals.insert(candidate % 10);
        }
    }

    rebuilt
}

fn to_array(numbers: &[u8]) -> [u8; PICK_SIZE] {
    let mut out = [0u8; PICK_SIZE];
    for (slot, &n) in out.iter_mut().zip(numbers) {
        *slot = n;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const PREVIOUS: [u8; 7] = [3, 7, 12, 18, 21, 26, 30];

    #[test]
    fn test_generate_without_previous() {
        let triggers = BTreeSet::new();
        let mut validated = 0;
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let generated = generate(None, &triggers, false, &mut rng);
            assert!(generated.numbers.windows(2).all(|w| w[0] < w[1]));
            if generated.status == PickStatus::Validated {
                assert!(rules::validate(&generated.numbers, None));
                assert!(generated.attempts >= 1);
                validated += 1;
            }
        }
        assert!(validated >= 8, "seulement {} combinaisons validées", validated);
    }

    #[test]
    fn test_generate_with_previous() {
        let triggers = BTreeSet::new();
        let mut validated = 0;
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let generated = generate(Some(&PREVIOUS), &triggers, false, &mut rng);
            if generated.status == PickStatus::Validated {
                assert!(rules::validate(&generated.numbers, Some(&PREVIOUS)));
                assert_eq!(rules::overlap_count(&generated.numbers, &PREVIOUS), 2);
                validated += 1;
            }
        }
        assert!(validated >= 8, "seulement {} combinaisons validées", validated);
    }

    #[test]
    fn test_generate_with_triggers() {
        let triggers: BTreeSet<u8> = [3, 9, 15, 21, 30].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(1);
        let generated = generate(None, &triggers, true, &mut rng);
        assert!(generated.numbers.iter().all(|n| (1..=31).contains(n)));
    }

    #[test]
    fn test_repair_rebuilds_pairs() {
        // Aucune finale doublée dans l'amorce : reconstruction complète.
        let seed = [1u8, 2, 3, 4, 5, 6, 7];
        for rng_seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let repaired = repair_finals(&seed, &mut rng);
            assert_eq!(repaired.len(), 7);

            let mut sorted = repaired.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), 7, "doublons dans {:?}", repaired);

            let histogram = rules::final_histogram(&repaired);
            assert_eq!(
                histogram.iter().filter(|&&c| c == 2).count(),
                2,
                "finales de {:?} : {:?}",
                repaired,
                histogram
            );
            assert_eq!(histogram.iter().filter(|&&c| c >= 3).count(), 0);
        }
    }

    #[test]
    fn test_repair_keeps_compliant_seed() {
        let seed = [3u8, 13, 4, 14, 9, 21, 26];
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(repair_finals(&seed, &mut rng), seed.to_vec());
    }

    #[test]
    fn test_degraded_is_never_a_panic() {
        // Même avec des gâchettes absurdes et sans concours précédent, la
        // génération rend toujours 7 numéros distincts dans 1-31.
        let triggers: BTreeSet<u8> = [1].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(99);
        let generated = generate(None, &triggers, true, &mut rng);
        let mut sorted = generated.numbers.to_vec();
        sorted.dedup();
        assert_eq!(sorted.len(), 7);
        assert!(generated.numbers.iter().all(|n| (1..=31).contains(n)));
    }
}
