// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::store::profiles;
use crate::utils::{maybe_print_json, pretty_table, set_active_profile};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let email = sub.get_one::<String>("email").map(|s| s.as_str());
            let id = profiles::insert(conn, name, email)?;
            set_active_profile(conn, id)?;
            println!("Added profile '{}' (now active)", name);
        }
        Some(("use", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = profiles::id_for_name(conn, name)?
                .with_context(|| format!("Profile '{}' not found", name))?;
            set_active_profile(conn, id)?;
            println!("Switched to profile '{}'", name);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let data = profiles::list(conn)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|p| {
                        vec![
                            p.id.to_string(),
                            p.name.clone(),
                            p.email.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Name", "Email"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
