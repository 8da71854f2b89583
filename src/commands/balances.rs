// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::balance::Source;
use crate::cache::Snapshot;
use crate::utils::{active_profile, fmt_money, maybe_print_json, pretty_table};

#[derive(Serialize)]
struct BalanceRow {
    source: String,
    name: String,
    balance: String,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user_id = active_profile(conn)?;
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");

    let snapshot = Snapshot::load(conn, user_id)?;
    let mut data = Vec::new();
    for (source, balance) in snapshot.balances() {
        let name = match source {
            Source::Cash => "Cash".to_string(),
            Source::Card(id) => snapshot.card_name(id).unwrap_or("?").to_string(),
        };
        data.push(BalanceRow {
            source: source.to_string(),
            name,
            balance: fmt_money(&balance),
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| vec![r.source.clone(), r.name.clone(), r.balance.clone()])
            .collect();
        println!("{}", pretty_table(&["Source", "Name", "Balance"], rows));
    }
    Ok(())
}
