//! Extraction des « numéros gâchette » : dérivations arithmétiques sur le
//! numéro de concours, la date et le montant collecté du dernier tirage.
//! Fonction pure des trois entrées, aucune source d'aléa.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use diadesorte_db::models::DrawRecord;

const DATE_FORMAT: &str = "%d/%m/%Y";

// Garde anti-explosion sur les multiplications croisées, héritée telle
// quelle : seule la passe finale 1-31 compte pour la correction.
const MUL_LEFT_MAX: i64 = 5;
const MUL_RIGHT_MAX: i64 = 6;

pub fn extract_from_draw(draw: &DrawRecord) -> BTreeSet<u8> {
    extract_triggers(draw.contest, &draw.date, draw.prize_value)
}

pub fn extract_triggers(contest: u32, date: &str, prize_value: f64) -> BTreeSet<u8> {
    let mut candidates = BTreeSet::new();
    from_contest(contest, &mut candidates);
    from_date(date, &mut candidates);
    from_prize(prize_value, &mut candidates);
    from_cross_sources(contest, date, &mut candidates);
    candidates
}

/// Unique porte d'acceptation : 1 ≤ valeur ≤ 31.
fn push(set: &mut BTreeSet<u8>, value: i64) {
    if (1..=31).contains(&value) {
        set.insert(value as u8);
    }
}

fn digits_of(s: &str) -> Vec<i64> {
    s.bytes()
        .filter(|b| b.is_ascii_digit())
        .map(|b| (b - b'0') as i64)
        .collect()
}

/// Toutes les sous-chaînes contiguës sans zéro initial, interprétées comme
/// des nombres.
fn push_substrings(s: &str, set: &mut BTreeSet<u8>) {
    for i in 0..s.len() {
        for j in (i + 1)..=s.len() {
            let piece = &s[i..j];
            if piece.starts_with('0') {
                continue;
            }
            if let Ok(value) = piece.parse::<i64>() {
                push(set, value);
            }
        }
    }
}

/// Sous-chaînes inversées (30 → 03, 12 → 21, …).
fn push_reversed_substrings(s: &str, set: &mut BTreeSet<u8>) {
    for i in 0..s.len() {
        for j in (i + 1)..=s.len() {
            let reversed: String = s[i..j].chars().rev().collect();
            if reversed.starts_with('0') {
                continue;
            }
            if let Ok(value) = reversed.parse::<i64>() {
                push(set, value);
            }
        }
    }
}

/// Les quatre opérations sur les paires de chiffres : somme et produit sur
/// i < j, différence et quotient exact sur tout couple ordonné.
fn push_digit_arithmetic(digits: &[i64], set: &mut BTreeSet<u8>) {
    for i in 0..digits.len() {
        for j in (i + 1)..digits.len() {
            push(set, digits[i] + digits[j]);
            if digits[i] > 0 && digits[j] > 0 {
                push(set, digits[i] * digits[j]);
            }
        }
    }
    for i in 0..digits.len() {
        for j in 0..digits.len() {
            if i == j {
                continue;
            }
            if digits[i] > digits[j] {
                push(set, digits[i] - digits[j]);
            }
            if digits[j] > 0 && digits[i] % digits[j] == 0 {
                push(set, digits[i] / digits[j]);
            }
        }
    }
}

fn from_contest(contest: u32, set: &mut BTreeSet<u8>) {
    if contest == 0 {
        return;
    }
    let text = contest.to_string();

    push_substrings(&text, set);
    push_reversed_substrings(&text, set);

    let digits = digits_of(&text);
    push_digit_arithmetic(&digits, set);

    // Paires positionnelles : chiffres i et j concaténés (pas forcément
    // adjacents), sans zéro de tête.
    for i in 0..digits.len() {
        for j in (i + 1)..digits.len() {
            if digits[i] == 0 {
                continue;
            }
            push(set, digits[i] * 10 + digits[j]);
        }
    }

    // Moitiés d'un concours à 4+ chiffres : 1122 → 11 et 22.
    if text.len() >= 4 {
        let first: i64 = match text[0..2].parse() {
            Ok(value) => value,
            Err(_) => return,
        };
        let second: i64 = match text[2..4].parse() {
            Ok(value) => value,
            Err(_) => return,
        };
        push(set, first + second);
        if first > second {
            push(set, first - second);
        }
        push(set, first * second);
        if second > 0 && first % second == 0 {
            push(set, first / second);
        }
    }
}

fn date_elements(date: &str) -> Option<(i64, i64, i64)> {
    let parsed = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()?;
    Some((
        parsed.day() as i64,
        parsed.month() as i64,
        parsed.year() as i64,
    ))
}

fn from_date(date: &str, set: &mut BTreeSet<u8>) {
    let Some((day, month, year)) = date_elements(date) else {
        return;
    };

    push(set, day);
    push(set, month);

    let year_text = year.to_string();
    if year_text.len() == 4 {
        push_substrings(&year_text, set);
    }

    // Inversions du jour et du mois.
    for value in [day, month] {
        let reversed: String = value.to_string().chars().rev().collect();
        if let Ok(inverted) = reversed.parse::<i64>() {
            push(set, inverted);
        }
    }

    let elements = [day, month, year % 100, year / 100];
    for (i, &a) in elements.iter().enumerate() {
        for (j, &b) in elements.iter().enumerate() {
            if i == j {
                continue;
            }
            push(set, a + b);
            if a > b {
                push(set, a - b);
            }
            if a <= MUL_LEFT_MAX && b <= MUL_RIGHT_MAX {
                push(set, a * b);
            }
            if b > 0 && a % b == 0 {
                push(set, a / b);
            }
        }
    }
}

fn from_prize(prize_value: f64, set: &mut BTreeSet<u8>) {
    if prize_value <= 0.0 {
        return;
    }
    let text = (prize_value.trunc() as i64).to_string();

    push_substrings(&text, set);

    // Exclusions : retirer chaque chiffre puis relire les morceaux
    // (150 sans le 5 → 10).
    for digit in '0'..='9' {
        let without: String = text.chars().filter(|&c| c != digit).collect();
        if !without.is_empty() {
            push_substrings(&without, set);
        }
    }

    push_digit_arithmetic(&digits_of(&text), set);
}

/// Combinaisons entre sources : chiffres du concours contre éléments de la
/// date (somme, différence, produit borné).
fn from_cross_sources(contest: u32, date: &str, set: &mut BTreeSet<u8>) {
    if contest == 0 {
        return;
    }
    let Some((day, month, year)) = date_elements(date) else {
        return;
    };

    let contest_digits = digits_of(&contest.to_string());
    let calendar = [day, month, year % 100];

    for &c in &contest_digits {
        for &d in &calendar {
            push(set, c + d);
            if c > d {
                push(set, c - d);
            }
            if c <= MUL_LEFT_MAX && d <= MUL_RIGHT_MAX {
                push(set, c * d);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let first = extract_triggers(1122, "30/09/2025", 150_000.0);
        let second = extract_triggers(1122, "30/09/2025", 150_000.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_candidates_in_range() {
        let set = extract_triggers(987_654, "28/02/2024", 87_654_321.0);
        for &n in &set {
            assert!((1..=31).contains(&n), "candidat hors limites : {}", n);
        }
    }

    #[test]
    fn test_documented_example() {
        // Concours 1122, 30/09/2025, R$ 150 000 : 21 vient de l'inversion de
        // la sous-chaîne « 12 », 3 de 1+2, 9 du mois, 30 du jour, 15 de la
        // sous-chaîne « 15 » du montant.
        let set = extract_triggers(1122, "30/09/2025", 150_000.0);
        for expected in [21, 3, 9, 30, 15] {
            assert!(set.contains(&expected), "manque {}", expected);
        }
    }

    #[test]
    fn test_contest_substrings_and_halves() {
        let mut set = BTreeSet::new();
        from_contest(1122, &mut set);
        // Sous-chaînes : 1, 11, 12, 2, 22 ; inversions : 21, 11, 22 ;
        // sommes de chiffres : 2, 3, 4 ; moitiés : 11+22 = 33, rejeté par
        // la porte 1-31.
        for expected in [1, 2, 3, 4, 11, 12, 21, 22] {
            assert!(set.contains(&expected), "manque {}", expected);
        }
    }

    #[test]
    fn test_date_only() {
        let set = extract_triggers(0, "05/03/2024", 0.0);
        // Jour, mois, 20 et 24 de l'année, inversion de 5 → 5, 5+3 = 8.
        for expected in [5, 3, 20, 24, 8] {
            assert!(set.contains(&expected), "manque {}", expected);
        }
    }

    #[test]
    fn test_unavailable_inputs_empty() {
        let set = extract_triggers(0, "", 0.0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_prize_exclusions() {
        let mut set = BTreeSet::new();
        from_prize(150.0, &mut set);
        // 150 sans le 5 → 10 ; sous-chaînes : 1, 15 ; 1+5 = 6, 5×1 = 5.
        for expected in [1, 5, 6, 10, 15] {
            assert!(set.contains(&expected), "manque {}", expected);
        }
    }

    #[test]
    fn test_invalid_date_ignored() {
        // La date illisible ne contribue rien ; le concours 45 donne
        // exactement 4, 5, 9 (somme), 20 (produit), 1 (différence).
        let set = extract_triggers(45, "pas une date", 0.0);
        let expected: BTreeSet<u8> = [1, 4, 5, 9, 20].into_iter().collect();
        assert_eq!(set, expected);
    }
}
