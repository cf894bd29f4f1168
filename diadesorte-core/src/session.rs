//! Session de génération : un mois de la sorte partagé, un jeu de numéros
//! gâchette partagé, N palpites validés. Le résultat appartient à
//! l'appelant, aucun état global.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use diadesorte_db::models::{DrawRecord, Pick, PickDetails, PickStatus, PICK_SIZE};
use diadesorte_db::month::LuckyMonth;

use crate::generator::{self, Generated};
use crate::heat;
use crate::rules;
use crate::triggers;

/// Borne externe de tentatives par palpite avant abandon.
pub const MAX_PICK_ATTEMPTS: u32 = 300;

const STRENGTH_MIN: u8 = 88;
const STRENGTH_MAX: u8 = 96;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub count: usize,
    pub use_triggers: bool,
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub struct SessionResult {
    pub picks: Vec<Pick>,
    pub month: LuckyMonth,
    pub triggers: BTreeSet<u8>,
    pub requested: usize,
    pub dropped: usize,
    pub reference_contest: Option<u32>,
}

/// L'historique arrive du stockage au plus récent en tête ; la passe de
/// température se fait en ordre chronologique.
pub fn run_session(
    history_newest_first: &[DrawRecord],
    latest: Option<&DrawRecord>,
    config: &SessionConfig,
) -> SessionResult {
    let mut rng: StdRng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let trigger_set = match (config.use_triggers, latest) {
        (true, Some(draw)) => triggers::extract_from_draw(draw),
        _ => BTreeSet::new(),
    };

    let chronological: Vec<DrawRecord> =
        history_newest_first.iter().rev().cloned().collect();
    let month = heat::choose_month_for_session(&chronological, &mut rng);

    let previous = latest.map(|draw| draw.numbers);

    let mut picks = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        if let Some(generated) =
            generate_validated(previous.as_ref(), &trigger_set, config.use_triggers, &mut rng)
        {
            picks.push(build_pick(
                &generated,
                month,
                previous.as_ref(),
                &trigger_set,
                &mut rng,
            ));
        }
    }

    let dropped = config.count - picks.len();
    SessionResult {
        picks,
        month,
        triggers: trigger_set,
        requested: config.count,
        dropped,
        reference_contest: latest.map(|draw| draw.contest),
    }
}

fn generate_validated(
    previous: Option<&[u8; PICK_SIZE]>,
    trigger_set: &BTreeSet<u8>,
    use_triggers: bool,
    rng: &mut StdRng,
) -> Option<Generated> {
    for _ in 0..MAX_PICK_ATTEMPTS {
        let generated = generator::generate(previous, trigger_set, use_triggers, rng);
        if generated.status == PickStatus::Validated {
            return Some(generated);
        }
    }
    None
}

fn build_pick(
    generated: &Generated,
    month: LuckyMonth,
    previous: Option<&[u8; PICK_SIZE]>,
    trigger_set: &BTreeSet<u8>,
    rng: &mut StdRng,
) -> Pick {
    let numbers = generated.numbers;
    let even = rules::even_count(&numbers);

    let details = PickDetails {
        even_count: even,
        odd_count: PICK_SIZE as u8 - even,
        paired_finals: rules::paired_final_count(&numbers),
        adjacent_pairs: rules::adjacent_pair_count(&numbers),
        repeats_from_last: previous
            .map(|p| rules::overlap_count(&numbers, p))
            .unwrap_or(0),
        sum: numbers.iter().map(|&n| n as u16).sum(),
        triggers_used: numbers
            .iter()
            .copied()
            .filter(|n| trigger_set.contains(n))
            .collect(),
        attempts: generated.attempts,
        strength: rng.random_range(STRENGTH_MIN..=STRENGTH_MAX),
    };

    Pick {
        numbers,
        month,
        status: generated.status,
        details,
    }
}
