// src/facts.rs

//! Arithmetic fact library: pure lookups over bounded ranges. Callers
//! guarantee positive limits.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CUBES_LIMIT, DECIMAL_PLACES, PERCENT_PLACES, RECIPROCALS_LIMIT, SQUARES_LIMIT, TABLES_LIMIT,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TableFact {
    pub multiplicand: u32,
    pub multiplier: u32,
    pub product: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SquareFact {
    pub n: u32,
    pub square: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CubeFact {
    pub n: u32,
    pub cube: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReciprocalFact {
    pub n: u32,
    pub fraction: String,
    pub decimal: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerFact {
    pub base: u32,
    pub exponent: u32,
    pub value: u64,
}

/// Fixed-precision rounding, half away from zero.
pub fn round_dp(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

pub fn table(base: u32, limit: u32) -> Vec<TableFact> {
    (1..=limit)
        .map(|multiplier| TableFact {
            multiplicand: base,
            multiplier,
            product: base as u64 * multiplier as u64,
        })
        .collect()
}

pub fn squares(limit: u32) -> Vec<SquareFact> {
    (1..=limit)
        .map(|n| SquareFact {
            n,
            square: n as u64 * n as u64,
        })
        .collect()
}

pub fn cubes(limit: u32) -> Vec<CubeFact> {
    (1..=limit)
        .map(|n| CubeFact {
            n,
            cube: n as u64 * n as u64 * n as u64,
        })
        .collect()
}

pub fn reciprocals(limit: u32) -> Vec<ReciprocalFact> {
    (1..=limit)
        .map(|n| {
            let decimal = 1.0 / n as f64;
            ReciprocalFact {
                n,
                fraction: format!("1/{n}"),
                decimal: round_dp(decimal, DECIMAL_PLACES),
                percentage: round_dp(decimal * 100.0, PERCENT_PLACES),
            }
        })
        .collect()
}

pub fn powers(base: u32, limit: u32) -> Vec<PowerFact> {
    (1..=limit)
        .map(|exponent| PowerFact {
            base,
            exponent,
            value: (base as u64).pow(exponent),
        })
        .collect()
}

/// Learn-mode lists at their canonical limits.
pub fn full_table(base: u32) -> Vec<TableFact> {
    table(base, TABLES_LIMIT)
}

pub fn all_squares() -> Vec<SquareFact> {
    squares(SQUARES_LIMIT)
}

pub fn all_cubes() -> Vec<CubeFact> {
    cubes(CUBES_LIMIT)
}

pub fn all_reciprocals() -> Vec<ReciprocalFact> {
    reciprocals(RECIPROCALS_LIMIT)
}

/// The canonical power tables shown in learn mode: each base with the
/// largest exponent that stays readable.
pub fn all_powers() -> Vec<(u32, Vec<PowerFact>)> {
    [(2, 25), (3, 12), (5, 10), (6, 8), (7, 8)]
        .iter()
        .map(|&(base, limit)| (base, powers(base, limit)))
        .collect()
}
