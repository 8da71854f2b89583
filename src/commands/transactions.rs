// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

use crate::ledger;
use crate::models::{PaymentMethod, Transaction, TxnType};
use crate::store::transactions::NewTransaction;
use crate::store::{cards, transactions};
use crate::utils::{
    active_profile, maybe_print_json, parse_date, parse_positive_decimal, pretty_table,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let user_id = active_profile(conn)?;
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger::delete_transaction(conn, user_id, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = active_profile(conn)?;
    let kind_s = sub.get_one::<String>("type").unwrap();
    let kind = TxnType::parse(kind_s)
        .with_context(|| format!("Invalid type '{}', expected income|expense", kind_s))?;
    let category = sub.get_one::<String>("category").unwrap();
    let amount = parse_positive_decimal(sub.get_one::<String>("amount").unwrap())?;
    let method_s = sub.get_one::<String>("method").unwrap();
    let method = PaymentMethod::parse(method_s)
        .with_context(|| format!("Invalid method '{}', expected cash|card", method_s))?;
    let card_id = match sub.get_one::<String>("card") {
        Some(name) => Some(
            cards::id_for_name(conn, user_id, name)?
                .with_context(|| format!("Card '{}' not found", name))?,
        ),
        None => None,
    };
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let note = sub.get_one::<String>("note").map(|s| s.as_str());

    let t = ledger::record_transaction(
        conn,
        user_id,
        &NewTransaction::plain(kind, category, amount, date, note, Some(method), card_id),
    )?;
    println!(
        "Recorded {} {} '{}' on {}",
        t.kind, t.amount, t.category, t.date
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub date: String,
    pub method: String,
    pub card: String,
    pub note: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let user_id = active_profile(conn)?;
    let month = sub.get_one::<String>("month");
    let category = sub.get_one::<String>("category");
    let limit = sub.get_one::<usize>("limit").copied();

    let cards = cards::list(conn, user_id)?;
    let card_name = |t: &Transaction| -> String {
        t.card_id
            .and_then(|id| cards.iter().find(|c| c.id == id))
            .map(|c| c.card_name.clone())
            .unwrap_or_default()
    };

    let mut data = Vec::new();
    for t in transactions::list(conn, user_id)? {
        if let Some(m) = month {
            if !t.date.to_string().starts_with(m.as_str()) {
                continue;
            }
        }
        if let Some(c) = category {
            if &t.category != c {
                continue;
            }
        }
        data.push(TransactionRow {
            id: t.id,
            kind: t.kind.to_string(),
            category: t.category.clone(),
            amount: t.amount.to_string(),
            date: t.date.to_string(),
            method: t
                .payment_method
                .map(|m| m.to_string())
                .unwrap_or_default(),
            card: card_name(&t),
            note: t.note.clone().unwrap_or_default(),
        });
        if let Some(n) = limit {
            if data.len() >= n {
                break;
            }
        }
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.method.clone(),
                    r.card.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Type", "Category", "Amount", "Method", "Card", "Note"],
                rows,
            )
        );
    }
    Ok(())
}
