use anyhow::{bail, Result};

use crate::month::{LuckyMonth, MonthLabel};

pub const POOL_SIZE: u8 = 31;
pub const PICK_SIZE: usize = 7;

#[derive(Debug, Clone)]
pub struct DrawRecord {
    pub contest: u32,
    pub date: String,
    pub numbers: [u8; PICK_SIZE],
    pub lucky_month: MonthLabel,
    pub prize_value: f64,
    pub accumulated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickStatus {
    Validated,
    Degraded,
}

impl std::fmt::Display for PickStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickStatus::Validated => write!(f, "VALIDÉ"),
            PickStatus::Degraded => write!(f, "DÉGRADÉ"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PickDetails {
    pub even_count: u8,
    pub odd_count: u8,
    pub paired_finals: u8,
    pub adjacent_pairs: u8,
    pub repeats_from_last: u8,
    pub sum: u16,
    pub triggers_used: Vec<u8>,
    pub attempts: u32,
    pub strength: u8,
}

#[derive(Debug, Clone)]
pub struct Pick {
    pub numbers: [u8; PICK_SIZE],
    pub month: LuckyMonth,
    pub status: PickStatus,
    pub details: PickDetails,
}

pub fn validate_numbers(numbers: &[u8; PICK_SIZE]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > POOL_SIZE {
            bail!("Numéro {} hors limites (1-31)", n);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}
