// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::ledger;
use crate::models::TxnType;
use crate::store::categories;
use crate::utils::{active_profile, maybe_print_json, pretty_table};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let user_id = active_profile(conn)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind_s = sub.get_one::<String>("type").unwrap();
            let kind = TxnType::parse(kind_s)
                .with_context(|| format!("Invalid type '{}', expected income|expense", kind_s))?;
            categories::insert(conn, user_id, name, kind)?;
            println!("Added category '{}' ({})", name, kind);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let data = categories::list(conn, user_id)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|c| vec![c.id.to_string(), c.name.clone(), c.kind.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Id", "Name", "Type"], rows));
            }
        }
        Some(("rename", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            let rewritten = ledger::rename_category(conn, user_id, id, name)?;
            println!(
                "Renamed category {} to '{}' ({} transaction(s) rewritten)",
                id, name, rewritten
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let cascade = sub.get_flag("cascade");
            let removed = ledger::delete_category(conn, user_id, id, cascade)?;
            if removed > 0 {
                println!("Removed category {} and {} transaction(s)", id, removed);
            } else {
                println!("Removed category {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}
