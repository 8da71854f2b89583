// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::ledger;
use crate::store::cards::{self, NewCard};
use crate::utils::{active_profile, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user_id = active_profile(conn)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            cards::insert(
                conn,
                user_id,
                &NewCard {
                    card_name: name,
                    card_number: sub.get_one::<String>("number").unwrap(),
                    expiry_date: sub.get_one::<String>("expiry").unwrap(),
                    card_type: sub.get_one::<String>("type").unwrap(),
                },
            )?;
            println!("Added card '{}'", name);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let data = cards::list(conn, user_id)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.card_name.clone(),
                            c.card_number.clone(),
                            c.expiry_date.clone(),
                            c.card_type.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Number", "Expiry", "Type"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = cards::id_for_name(conn, user_id, name)?
                .with_context(|| format!("Card '{}' not found", name))?;
            ledger::delete_card(conn, user_id, id)?;
            println!("Removed card '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
