use diadesorte_db::models::PICK_SIZE;

/// Diagnostic structuré : la première règle violée, dans l'ordre fixe
/// d'évaluation 1-5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    WrongSize { got: usize },
    Duplicated { number: u8 },
    Parity { even: u8, odd: u8 },
    PairedFinals { doubles: u8, singles: u8, triples: u8 },
    AdjacentPairs { count: u8 },
    Repeats { count: u8 },
    Bands { low: u8, mid: u8, high: u8 },
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleViolation::WrongSize { got } => {
                write!(f, "{} numéros au lieu de 7", got)
            }
            RuleViolation::Duplicated { number } => {
                write!(f, "Numéro en double : {}", number)
            }
            RuleViolation::Parity { even, odd } => {
                write!(f, "Règle 1 : {}P/{}I au lieu de 3P/4I", even, odd)
            }
            RuleViolation::PairedFinals { doubles, singles, triples } => {
                write!(
                    f,
                    "Règle 2 : {} finales doublées, {} simples, {} triplées (attendu 2/3/0)",
                    doubles, singles, triples
                )
            }
            RuleViolation::AdjacentPairs { count } => {
                write!(f, "Règle 3 : {} paires consécutives au lieu de 2", count)
            }
            RuleViolation::Repeats { count } => {
                write!(f, "Règle 4 : {} répétitions du dernier concours au lieu de 2", count)
            }
            RuleViolation::Bands { low, mid, high } => {
                write!(
                    f,
                    "Règle 5 : répartition {}/{}/{} hors de 2-3 par faixa",
                    low, mid, high
                )
            }
        }
    }
}

pub fn even_count(numbers: &[u8]) -> u8 {
    numbers.iter().filter(|n| *n % 2 == 0).count() as u8
}

pub fn final_histogram(numbers: &[u8]) -> [u8; 10] {
    let mut histogram = [0u8; 10];
    for &n in numbers {
        histogram[(n % 10) as usize] += 1;
    }
    histogram
}

/// Nombre de finales (valeur mod 10) présentes exactement deux fois.
pub fn paired_final_count(numbers: &[u8]) -> u8 {
    final_histogram(numbers)
        .iter()
        .filter(|&&count| count == 2)
        .count() as u8
}

/// Compte les paires ascendantes adjacentes après tri : une suite de trois
/// numéros consécutifs vaut deux paires.
pub fn adjacent_pair_count(numbers: &[u8]) -> u8 {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    sorted
        .windows(2)
        .filter(|pair| pair[1] == pair[0] + 1)
        .count() as u8
}

pub fn overlap_count(numbers: &[u8], previous: &[u8]) -> u8 {
    numbers.iter().filter(|n| previous.contains(n)).count() as u8
}

/// Répartition par faixa : bas 1-10, moyens 11-20, hauts 21-31.
pub fn band_counts(numbers: &[u8]) -> (u8, u8, u8) {
    let low = numbers.iter().filter(|&&n| (1..=10).contains(&n)).count() as u8;
    let mid = numbers.iter().filter(|&&n| (11..=20).contains(&n)).count() as u8;
    let high = numbers.iter().filter(|&&n| (21..=31).contains(&n)).count() as u8;
    (low, mid, high)
}

pub fn check(numbers: &[u8], previous: Option<&[u8]>) -> Result<(), RuleViolation> {
    if numbers.len() != PICK_SIZE {
        return Err(RuleViolation::WrongSize { got: numbers.len() });
    }

    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        if pair[0] == pair[1] {
            return Err(RuleViolation::Duplicated { number: pair[0] });
        }
    }

    let even = even_count(numbers);
    let odd = PICK_SIZE as u8 - even;
    if even != 3 {
        return Err(RuleViolation::Parity { even, odd });
    }

    let histogram = final_histogram(numbers);
    let doubles = histogram.iter().filter(|&&count| count == 2).count() as u8;
    let singles = histogram.iter().filter(|&&count| count == 1).count() as u8;
    let triples = histogram.iter().filter(|&&count| count >= 3).count() as u8;
    if doubles != 2 || singles != 3 || triples > 0 {
        return Err(RuleViolation::PairedFinals { doubles, singles, triples });
    }

    let adjacent = adjacent_pair_count(numbers);
    if adjacent != 2 {
        return Err(RuleViolation::AdjacentPairs { count: adjacent });
    }

    if let Some(previous) = previous {
        if !previous.is_empty() {
            let repeats = overlap_count(numbers, previous);
            if repeats != 2 {
                return Err(RuleViolation::Repeats { count: repeats });
            }
        }
    }

    let (low, mid, high) = band_counts(numbers);
    if !(2..=3).contains(&low) || !(2..=3).contains(&mid) || !(2..=3).contains(&high) {
        return Err(RuleViolation::Bands { low, mid, high });
    }

    Ok(())
}

pub fn validate(numbers: &[u8], previous: Option<&[u8]>) -> bool {
    check(numbers, previous).is_ok()
}
