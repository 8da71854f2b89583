// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::utils::active_profile;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = active_profile(conn)?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT t.date, t.type, t.category, t.amount, t.payment_method, c.card_name, t.note
         FROM transactions t
         LEFT JOIN cards c ON t.card_id=c.id
         WHERE t.user_id=?1
         ORDER BY t.date, t.id",
    )?;
    let rows = stmt.query_map([user_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "type", "category", "amount", "method", "card", "note"])?;
            for row in rows {
                let (d, ty, cat, amt, method, card, note) = row?;
                wtr.write_record([
                    d,
                    ty,
                    cat,
                    amt,
                    method.unwrap_or_default(),
                    card.unwrap_or_default(),
                    note.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, ty, cat, amt, method, card, note) = row?;
                items.push(json!({
                    "date": d, "type": ty, "category": cat, "amount": amt,
                    "method": method, "card": card, "note": note
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            anyhow::bail!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
