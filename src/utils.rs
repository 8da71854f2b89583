// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::error::LedgerError;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Amount fields on transactions and credit movements must be strictly positive.
pub fn parse_positive_decimal(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d <= Decimal::ZERO {
        anyhow::bail!("Amount must be positive, got '{}'", s);
    }
    Ok(d)
}

/// Stored money columns are exact decimal TEXT; a non-parsing value means the
/// store is corrupt, not that the user typed something wrong.
pub fn stored_amount(s: &str) -> std::result::Result<Decimal, LedgerError> {
    s.parse::<Decimal>()
        .map_err(|_| LedgerError::BadAmount(s.to_string()))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

// Active profile: every core operation takes the user id explicitly; the CLI
// resolves it once from settings.
pub fn active_profile(conn: &Connection) -> std::result::Result<i64, LedgerError> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='active_profile'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    v.and_then(|s| s.parse::<i64>().ok())
        .ok_or(LedgerError::Auth)
}

pub fn set_active_profile(conn: &Connection, profile_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('active_profile', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![profile_id.to_string()],
    )?;
    Ok(())
}
