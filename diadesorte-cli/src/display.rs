use std::collections::BTreeSet;

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use diadesorte_core::heat::MonthHeat;
use diadesorte_core::session::SessionResult;
use diadesorte_db::models::{DrawRecord, Pick, PickStatus};

use crate::bands::{band_ranking, BandReport};

pub fn display_draws(draws: &[DrawRecord]) {
    if draws.is_empty() {
        println!("Aucun concours à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Concours",
            "Date",
            "Dezenas",
            "Mois de la sorte",
            "Montant collecté",
            "Accumulé",
        ]);

    for draw in draws {
        let numbers = draw
            .numbers
            .iter()
            .map(|n| format!("{:02}", n))
            .collect::<Vec<_>>()
            .join(" - ");

        let prize = if draw.prize_value > 0.0 {
            format!("R$ {:.2}", draw.prize_value)
        } else {
            "—".to_string()
        };

        table.add_row(vec![
            &draw.contest.to_string(),
            &draw.date,
            &numbers,
            &draw.lucky_month.to_string(),
            &prize,
            &(if draw.accumulated { "oui" } else { "non" }).to_string(),
        ]);
    }

    println!("{table}");
}

pub fn display_heat(ranked: &[MonthHeat], total_draws: usize) {
    println!("\n🌡️ Température des mois sur {} concours\n", total_draws);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Rang", "Mois", "Statut", "Température", "Fréquence", "Lacune"]);

    for (rank, heat) in ranked.iter().enumerate() {
        let (status, color) = if heat.temperature >= 70.0 {
            ("CHAUD", Color::Red)
        } else if heat.temperature >= 50.0 {
            ("TIÈDE", Color::Yellow)
        } else if heat.temperature >= 30.0 {
            ("FROID", Color::Cyan)
        } else {
            ("GLACÉ", Color::Blue)
        };

        table.add_row(vec![
            Cell::new(format!("{}", rank + 1)),
            Cell::new(heat.month.name()),
            Cell::new(status).fg(color),
            Cell::new(format!("{:5.1}", heat.temperature)),
            Cell::new(heat.frequency.to_string()),
            Cell::new(heat.gap.to_string()),
        ]);
    }

    println!("{table}");
}

pub fn display_triggers(contest: u32, date: &str, triggers: &BTreeSet<u8>) {
    println!(
        "\n🎯 Numéros gâchette du concours {} ({}) : {} candidats\n",
        contest,
        date,
        triggers.len()
    );

    let joined = triggers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", joined);
}

pub fn display_band_report(report: &BandReport) {
    println!(
        "\n📊 Répartition par faixa sur {} concours",
        report.total_draws
    );
    println!(
        "Moyennes par concours — bas : {:.1}, moyens : {:.1}, hauts : {:.1}\n",
        report.mean_low, report.mean_mid, report.mean_high
    );

    for (label, from, to) in [
        ("Bas (01-10)", 1u8, 10u8),
        ("Moyens (11-20)", 11, 20),
        ("Hauts (21-31)", 21, 31),
    ] {
        println!("── {} ──", label);
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Numéro", "Fréquence", "Part"]);

        for (number, frequency) in band_ranking(report, from, to, 5) {
            let share = if report.total_draws > 0 {
                frequency as f64 / report.total_draws as f64 * 100.0
            } else {
                0.0
            };
            table.add_row(vec![
                &format!("{:02}", number),
                &frequency.to_string(),
                &format!("{:.1} %", share),
            ]);
        }
        println!("{table}");
    }
}

pub fn display_session(result: &SessionResult) {
    println!(
        "\n🎲 {} palpites générés (mois de la sorte : {})\n",
        result.picks.len(),
        result.month
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "#",
            "Dezenas",
            "Mois",
            "Force",
            "Tentatives",
            "P/I",
            "Finales",
            "Séquences",
            "Répétitions",
            "Somme",
            "Gâchettes",
        ]);

    for (i, pick) in result.picks.iter().enumerate() {
        table.add_row(build_pick_row(i + 1, pick));
    }

    println!("{table}");

    if !result.triggers.is_empty() {
        let joined = result
            .triggers
            .iter()
            .map(|n| format!("{:02}", n))
            .collect::<Vec<_>>()
            .join(" ");
        println!("Gâchettes disponibles : {}", joined);
    }
    if let Some(contest) = result.reference_contest {
        println!("Concours de référence pour la règle 4 : {}", contest);
    }
    if result.dropped > 0 {
        println!(
            "⚠️ {} palpite(s) sur {} abandonné(s) faute de combinaison valide.",
            result.dropped, result.requested
        );
    }
}

fn build_pick_row(index: usize, pick: &Pick) -> Vec<Cell> {
    let numbers = pick
        .numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ");

    let triggers = if pick.details.triggers_used.is_empty() {
        "—".to_string()
    } else {
        pick.details
            .triggers_used
            .iter()
            .map(|n| format!("{:02}", n))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let status_color = match pick.status {
        PickStatus::Validated => Color::Green,
        PickStatus::Degraded => Color::Red,
    };

    vec![
        Cell::new(index.to_string()),
        Cell::new(numbers).fg(status_color),
        Cell::new(pick.month.abbrev()),
        Cell::new(pick.details.strength.to_string()),
        Cell::new(pick.details.attempts.to_string()),
        Cell::new(format!(
            "{}P/{}I",
            pick.details.even_count, pick.details.odd_count
        )),
        Cell::new(pick.details.paired_finals.to_string()),
        Cell::new(pick.details.adjacent_pairs.to_string()),
        Cell::new(pick.details.repeats_from_last.to_string()),
        Cell::new(pick.details.sum.to_string()),
        Cell::new(triggers),
    ]
}

pub struct FetchSummary {
    pub requested: u32,
    pub inserted: u32,
    pub updated: u32,
    pub errors: u32,
}

pub fn display_fetch_summary(summary: &FetchSummary) {
    println!("Chargement terminé :");
    println!("  Concours demandés : {}", summary.requested);
    println!("  Nouveaux          : {}", summary.inserted);
    println!("  Mis à jour        : {}", summary.updated);
    if summary.errors > 0 {
        println!("  Erreurs           : {}", summary.errors);
    }
}
