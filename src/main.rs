// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use pocketledger::store::credit::CreditSide;
use pocketledger::{cli, commands, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("profile", sub)) => commands::profiles::handle(&conn, sub)?,
        Some(("card", sub)) => commands::cards::handle(&conn, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut conn, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub)?,
        Some(("credit", sub)) => commands::credit::handle(&mut conn, CreditSide::Lent, sub)?,
        Some(("owed", sub)) => commands::credit::handle(&mut conn, CreditSide::Received, sub)?,
        Some(("balances", sub)) => commands::balances::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
