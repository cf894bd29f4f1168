//! Fournisseur de tirages : API publique de la Caixa, appels bloquants à
//! délai court, sans retentative.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use diadesorte_db::models::{validate_numbers, DrawRecord, PICK_SIZE};
use diadesorte_db::month::MonthLabel;

pub const API_URL: &str = "https://servicebus2.caixa.gov.br/portaldeloterias/api/diadesorte";

const LATEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONTEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ApiDraw {
    numero: u32,
    #[serde(rename = "dataApuracao", default)]
    data_apuracao: String,
    #[serde(rename = "listaDezenas", default)]
    lista_dezenas: Vec<String>,
    #[serde(rename = "nomeTimeCoracaoMesSorte", default)]
    mes_sorte: String,
    #[serde(rename = "valorArrecadado", default)]
    valor_arrecadado: f64,
    #[serde(default)]
    acumulado: bool,
}

pub struct DrawProvider {
    client: reqwest::blocking::Client,
}

impl DrawProvider {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(LATEST_TIMEOUT)
            .build()
            .context("Impossible de créer le client HTTP")?;
        Ok(Self { client })
    }

    pub fn fetch_latest(&self) -> Result<DrawRecord> {
        let payload: ApiDraw = self
            .client
            .get(API_URL)
            .send()
            .context("API Caixa injoignable")?
            .error_for_status()
            .context("Réponse API en erreur")?
            .json()
            .context("Payload JSON illisible")?;
        to_record(payload)
    }

    pub fn fetch_contest(&self, contest: u32) -> Result<DrawRecord> {
        let url = format!("{}/{}", API_URL, contest);
        let payload: ApiDraw = self
            .client
            .get(&url)
            .timeout(CONTEST_TIMEOUT)
            .send()
            .with_context(|| format!("Concours {} injoignable", contest))?
            .error_for_status()
            .with_context(|| format!("Concours {} : réponse en erreur", contest))?
            .json()
            .with_context(|| format!("Concours {} : payload illisible", contest))?;
        to_record(payload)
    }
}

fn to_record(payload: ApiDraw) -> Result<DrawRecord> {
    if payload.lista_dezenas.len() != PICK_SIZE {
        bail!(
            "Concours {} : {} dezenas au lieu de {}",
            payload.numero,
            payload.lista_dezenas.len(),
            PICK_SIZE
        );
    }

    let mut numbers = [0u8; PICK_SIZE];
    for (slot, raw) in numbers.iter_mut().zip(&payload.lista_dezenas) {
        *slot = raw
            .trim()
            .parse::<u8>()
            .with_context(|| format!("Dezena illisible : '{}'", raw))?;
    }
    numbers.sort_unstable();
    validate_numbers(&numbers)?;

    Ok(DrawRecord {
        contest: payload.numero,
        date: payload.data_apuracao,
        numbers,
        lucky_month: MonthLabel::parse(&payload.mes_sorte),
        prize_value: payload.valor_arrecadado,
        accumulated: payload.acumulado,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use diadesorte_db::month::LuckyMonth;

    const SAMPLE: &str = r#"{
        "numero": 1122,
        "dataApuracao": "30/09/2025",
        "listaDezenas": ["03", "07", "12", "18", "21", "26", "30"],
        "nomeTimeCoracaoMesSorte": "Setembro",
        "valorArrecadado": 150000.0,
        "acumulado": true
    }"#;

    #[test]
    fn test_payload_to_record() {
        let payload: ApiDraw = serde_json::from_str(SAMPLE).unwrap();
        let record = to_record(payload).unwrap();

        assert_eq!(record.contest, 1122);
        assert_eq!(record.date, "30/09/2025");
        assert_eq!(record.numbers, [3, 7, 12, 18, 21, 26, 30]);
        assert_eq!(record.lucky_month.month(), Some(LuckyMonth::Setembro));
        assert!(record.accumulated);
    }

    #[test]
    fn test_payload_missing_fields_defaults() {
        let payload: ApiDraw = serde_json::from_str(
            r#"{"numero": 5, "listaDezenas": ["1","2","3","4","5","6","7"]}"#,
        )
        .unwrap();
        let record = to_record(payload).unwrap();
        assert_eq!(record.contest, 5);
        assert_eq!(record.lucky_month.month(), None);
        assert!((record.prize_value - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_payload_wrong_count_rejected() {
        let payload: ApiDraw =
            serde_json::from_str(r#"{"numero": 5, "listaDezenas": ["1","2","3"]}"#).unwrap();
        assert!(to_record(payload).is_err());
    }

    #[test]
    fn test_payload_invalid_number_rejected() {
        let payload: ApiDraw = serde_json::from_str(
            r#"{"numero": 5, "listaDezenas": ["1","2","3","4","5","6","99"]}"#,
        )
        .unwrap();
        assert!(to_record(payload).is_err());
    }
}
