//! Sérialisation des palpites : lignes texte « 01 02 03 04 05 06 07 Mes »
//! et tableau CSV avec le détail des règles.

use std::path::Path;

use anyhow::{Context, Result};

use diadesorte_db::models::Pick;

pub fn picks_to_text(picks: &[Pick]) -> String {
    let mut lines = Vec::new();
    lines.push("# PALPITES DIA DE SORTE".to_string());
    lines.push("# Format : Dezena1 … Dezena7 MoisAbrégé".to_string());
    lines.push("# 5 règles obligatoires + numéros gâchette + mois statistique".to_string());
    lines.push(String::new());

    for (i, pick) in picks.iter().enumerate() {
        lines.push(format!(
            "# Jeu {:02} : force {}, {}P/{}I, {} finales doublées, statut {}",
            i + 1,
            pick.details.strength,
            pick.details.even_count,
            pick.details.odd_count,
            pick.details.paired_finals,
            pick.status,
        ));
        lines.push(format!("{} {}", format_numbers(pick), pick.month.abbrev()));
        lines.push(String::new());
    }

    lines.join("\n")
}

pub fn write_text(picks: &[Pick], path: &Path) -> Result<()> {
    std::fs::write(path, picks_to_text(picks))
        .with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}

fn format_numbers(pick: &Pick) -> String {
    pick.numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" ")
}

const CSV_HEADER: [&str; 17] = [
    "jogo",
    "jogo_completo",
    "dezena_1",
    "dezena_2",
    "dezena_3",
    "dezena_4",
    "dezena_5",
    "dezena_6",
    "dezena_7",
    "mes_da_sorte",
    "forca",
    "tentativas",
    "distribuicao",
    "finais_iguais",
    "sequencias",
    "repeticoes_ultimo",
    "soma_total",
];

pub fn picks_to_csv(picks: &[Pick]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .context("Échec de l'écriture de l'en-tête CSV")?;

    for (i, pick) in picks.iter().enumerate() {
        let complete = format!("{} {}", format_numbers(pick), pick.month.abbrev());
        let mut row: Vec<String> = vec![(i + 1).to_string(), complete];
        row.extend(pick.numbers.iter().map(|n| n.to_string()));
        row.push(pick.month.name().to_string());
        row.push(pick.details.strength.to_string());
        row.push(pick.details.attempts.to_string());
        row.push(format!(
            "{}P/{}I",
            pick.details.even_count, pick.details.odd_count
        ));
        row.push(pick.details.paired_finals.to_string());
        row.push(pick.details.adjacent_pairs.to_string());
        row.push(pick.details.repeats_from_last.to_string());
        row.push(pick.details.sum.to_string());
        writer
            .write_record(&row)
            .context("Échec de l'écriture d'une ligne CSV")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Échec de la finalisation du CSV : {}", e))
}

pub fn write_csv(picks: &[Pick], path: &Path) -> Result<()> {
    let bytes = picks_to_csv(picks)?;
    std::fs::write(path, bytes).with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}
