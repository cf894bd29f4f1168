use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{validate_numbers, DrawRecord, PICK_SIZE};
use crate::month::MonthLabel;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS contests (
    contest       INTEGER PRIMARY KEY,
    date          TEXT NOT NULL,
    number_1      INTEGER NOT NULL,
    number_2      INTEGER NOT NULL,
    number_3      INTEGER NOT NULL,
    number_4      INTEGER NOT NULL,
    number_5      INTEGER NOT NULL,
    number_6      INTEGER NOT NULL,
    number_7      INTEGER NOT NULL,
    lucky_month   TEXT NOT NULL,
    prize_value   REAL NOT NULL DEFAULT 0.0,
    accumulated   INTEGER NOT NULL DEFAULT 0
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("diadesorte.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

/// Upsert idempotent, clé = numéro de concours. Retourne true si le concours
/// était nouveau.
pub fn upsert_draw(conn: &Connection, draw: &DrawRecord) -> Result<bool> {
    let existing: u32 = conn
        .query_row(
            "SELECT COUNT(*) FROM contests WHERE contest = ?1",
            [draw.contest],
            |row| row.get(0),
        )
        .context("Échec de la recherche du concours")?;

    conn.execute(
        "INSERT INTO contests (contest, date, number_1, number_2, number_3, number_4, number_5, number_6, number_7, lucky_month, prize_value, accumulated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
         ON CONFLICT(contest) DO UPDATE SET
             date = excluded.date,
             number_1 = excluded.number_1,
             number_2 = excluded.number_2,
             number_3 = excluded.number_3,
             number_4 = excluded.number_4,
             number_5 = excluded.number_5,
             number_6 = excluded.number_6,
             number_7 = excluded.number_7,
             lucky_month = excluded.lucky_month,
             prize_value = excluded.prize_value,
             accumulated = excluded.accumulated",
        rusqlite::params![
            draw.contest,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.numbers[6],
            draw.lucky_month.label(),
            draw.prize_value,
            draw.accumulated,
        ],
    )
    .context("Échec de l'insertion")?;

    Ok(existing == 0)
}

const SELECT_COLUMNS: &str = "contest, date, number_1, number_2, number_3, number_4, number_5, number_6, number_7, lucky_month, prize_value, accumulated";

// Lecture tolérante : une ligne aux numéros invalides est ignorée au lieu de
// faire échouer toute la requête.
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Option<DrawRecord>> {
    let mut numbers = [0u8; PICK_SIZE];
    for (slot, column) in numbers.iter_mut().zip(2..2 + PICK_SIZE) {
        let value: i64 = row.get(column)?;
        if !(1..=31).contains(&value) {
            return Ok(None);
        }
        *slot = value as u8;
    }
    if validate_numbers(&numbers).is_err() {
        return Ok(None);
    }

    let raw_month: String = row.get(9)?;
    Ok(Some(DrawRecord {
        contest: row.get(0)?,
        date: row.get(1)?,
        numbers,
        lucky_month: MonthLabel::parse(&raw_month),
        prize_value: row.get(10)?,
        accumulated: row.get(11)?,
    }))
}

pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM contests ORDER BY contest DESC LIMIT ?1"
    ))?;
    let draws = stmt
        .query_map([limit], row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws.into_iter().flatten().collect())
}

pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM contests ORDER BY contest DESC"
    ))?;
    let draws = stmt
        .query_map([], row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws.into_iter().flatten().collect())
}

pub fn latest_draw(conn: &Connection) -> Result<Option<DrawRecord>> {
    let draws = fetch_last_draws(conn, 1)?;
    Ok(draws.into_iter().next())
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM contests", [], |row| row.get(0))?;
    Ok(count)
}
