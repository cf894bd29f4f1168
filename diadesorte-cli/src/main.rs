mod api;
mod bands;
mod display;
mod export;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use diadesorte_core::heat::{score_months, MIN_HISTORY};
use diadesorte_core::session::{run_session, SessionConfig};
use diadesorte_core::triggers::extract_from_draw;
use diadesorte_db::db::{
    count_draws, db_path, fetch_all_draws, fetch_last_draws, latest_draw, migrate, open_db,
    upsert_draw,
};
use diadesorte_db::models::DrawRecord;

use crate::api::DrawProvider;
use crate::bands::{band_report, MIN_BAND_HISTORY};
use crate::display::{
    display_band_report, display_draws, display_fetch_summary, display_heat, display_session,
    display_triggers, FetchSummary,
};

#[derive(Parser)]
#[command(
    name = "diadesorte",
    about = "Générateur de palpites Dia de Sorte : 5 règles, numéros gâchette, mois statistique"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Charger les derniers concours depuis l'API de la Caixa
    Fetch {
        /// Nombre de concours à charger
        #[arg(short, long, default_value = "100")]
        limit: u32,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers concours
    List {
        /// Nombre de concours à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Classement de température des mois de la sorte
    Heat,

    /// Statistiques par faixa (bas 1-10, moyens 11-20, hauts 21-31)
    Bands,

    /// Numéros gâchette extraits du dernier concours stocké
    Triggers,

    /// Générer des palpites (7 dezenas + mois de la sorte)
    Generate {
        /// Nombre de palpites
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Activer les numéros gâchette
        #[arg(short, long)]
        triggers: bool,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Exporter en texte (01 02 03 04 05 06 07 Mes)
        #[arg(long)]
        txt: Option<PathBuf>,

        /// Exporter en CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Fetch { limit } => cmd_fetch(&conn, limit),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Heat => cmd_heat(&conn),
        Command::Bands => cmd_bands(&conn),
        Command::Triggers => cmd_triggers(&conn),
        Command::Generate {
            count,
            triggers,
            seed,
            txt,
            csv,
        } => cmd_generate(&conn, count, triggers, seed, txt, csv),
    }
}

fn cmd_fetch(conn: &diadesorte_db::rusqlite::Connection, limit: u32) -> Result<()> {
    let provider = DrawProvider::new()?;

    let latest = provider
        .fetch_latest()
        .context("Impossible de récupérer le dernier concours")?;
    println!(
        "Dernier concours : {} du {} (mois : {})",
        latest.contest, latest.date, latest.lucky_month
    );

    let mut summary = FetchSummary {
        requested: limit,
        inserted: 0,
        updated: 0,
        errors: 0,
    };

    if upsert_draw(conn, &latest)? {
        summary.inserted += 1;
    } else {
        summary.updated += 1;
    }

    let bar = ProgressBar::new(limit as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Gabarit de progression invalide")?,
    );
    bar.inc(1);

    for offset in 1..limit {
        if latest.contest <= offset {
            break;
        }
        let contest = latest.contest - offset;
        match provider.fetch_contest(contest) {
            Ok(draw) => {
                if upsert_draw(conn, &draw)? {
                    summary.inserted += 1;
                } else {
                    summary.updated += 1;
                }
            }
            Err(e) => {
                bar.suspend(|| eprintln!("Concours {} ignoré : {}", contest, e));
                summary.errors += 1;
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    display_fetch_summary(&summary);
    Ok(())
}

fn cmd_list(conn: &diadesorte_db::rusqlite::Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : diadesorte fetch");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_heat(conn: &diadesorte_db::rusqlite::Connection) -> Result<()> {
    let history = fetch_all_draws(conn)?;
    if history.len() < MIN_HISTORY {
        println!(
            "Historique insuffisant ({} concours, minimum {}). Lancez d'abord : diadesorte fetch",
            history.len(),
            MIN_HISTORY
        );
        return Ok(());
    }

    let chronological: Vec<DrawRecord> = history.iter().rev().cloned().collect();
    let ranked = score_months(&chronological);
    display_heat(&ranked, chronological.len());
    Ok(())
}

fn cmd_bands(conn: &diadesorte_db::rusqlite::Connection) -> Result<()> {
    let history = fetch_all_draws(conn)?;
    if history.len() < MIN_BAND_HISTORY {
        println!(
            "Historique insuffisant ({} concours, minimum {}). Lancez d'abord : diadesorte fetch",
            history.len(),
            MIN_BAND_HISTORY
        );
        return Ok(());
    }

    let report = band_report(&history);
    display_band_report(&report);
    Ok(())
}

fn cmd_triggers(conn: &diadesorte_db::rusqlite::Connection) -> Result<()> {
    let Some(latest) = latest_draw(conn)? else {
        println!("Base vide. Lancez d'abord : diadesorte fetch");
        return Ok(());
    };

    let triggers = extract_from_draw(&latest);
    display_triggers(latest.contest, &latest.date, &triggers);
    Ok(())
}

fn cmd_generate(
    conn: &diadesorte_db::rusqlite::Connection,
    count: usize,
    use_triggers: bool,
    seed: Option<u64>,
    txt: Option<PathBuf>,
    csv: Option<PathBuf>,
) -> Result<()> {
    // Dernier concours : l'API d'abord, la base en secours. Son absence
    // désactive la règle 4 et les gâchettes, sans bloquer la génération.
    let latest = fetch_latest_with_fallback(conn)?;
    if latest.is_none() {
        println!("Aucun dernier concours disponible : règle 4 et gâchettes désactivées.");
    }

    let history = fetch_all_draws(conn)?;
    let config = SessionConfig {
        count,
        use_triggers,
        seed,
    };

    let result = run_session(&history, latest.as_ref(), &config);
    display_session(&result);

    if let Some(path) = txt {
        export::write_text(&result.picks, &path)?;
        println!("Export texte : {}", path.display());
    }
    if let Some(path) = csv {
        export::write_csv(&result.picks, &path)?;
        println!("Export CSV : {}", path.display());
    }

    Ok(())
}

fn fetch_latest_with_fallback(
    conn: &diadesorte_db::rusqlite::Connection,
) -> Result<Option<DrawRecord>> {
    match DrawProvider::new().and_then(|provider| provider.fetch_latest()) {
        Ok(draw) => {
            upsert_draw(conn, &draw)?;
            Ok(Some(draw))
        }
        Err(e) => {
            eprintln!("API injoignable ({}), utilisation du dernier concours stocké.", e);
            latest_draw(conn)
        }
    }
}
