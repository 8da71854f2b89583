// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Handles both `credit` (money lent) and `owed` (money owed); the side is
//! picked by the dispatcher in main.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::ledger::{self, CreditRequest, RepaymentRequest};
use crate::models::PaymentMethod;
use crate::store::credit::{self, CreditSide};
use crate::store::cards;
use crate::utils::{
    active_profile, fmt_money, maybe_print_json, parse_date, parse_positive_decimal, pretty_table,
};

pub fn handle(conn: &mut Connection, side: CreditSide, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, side, sub)?,
        Some(("repay", sub)) => repay(conn, side, sub)?,
        Some(("list", sub)) => list(conn, side, sub)?,
        Some(("history", sub)) => history(conn, side, sub)?,
        Some(("rm", sub)) => {
            let user_id = active_profile(conn)?;
            let id = *sub.get_one::<i64>("id").unwrap();
            match side {
                CreditSide::Lent => ledger::delete_credit_entry(conn, user_id, id)?,
                CreditSide::Received => ledger::delete_credit_received_entry(conn, user_id, id)?,
            }
            println!("Removed {} {} and its linked records", side.noun(), id);
        }
        _ => {}
    }
    Ok(())
}

struct Movement {
    amount: rust_decimal::Decimal,
    method: PaymentMethod,
    card_id: Option<i64>,
    date: Option<NaiveDate>,
    note: Option<String>,
}

fn movement(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<Movement> {
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
    let date = sub
        .get_one::<String>("date")
        .map(|s| parse_date(s))
        .transpose()?;
    let note = sub.get_one::<String>("note").cloned();
    Ok(Movement {
        amount,
        method,
        card_id,
        date,
        note,
    })
}

fn add(conn: &mut Connection, side: CreditSide, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = active_profile(conn)?;
    let person = sub.get_one::<String>("person").unwrap();
    let due = parse_date(sub.get_one::<String>("due").unwrap())?;
    let mv = movement(conn, user_id, sub)?;
    let req = CreditRequest {
        person_name: person,
        amount: mv.amount,
        due_date: due,
        given_date: mv.date,
        payment_method: mv.method,
        card_id: mv.card_id,
        note: mv.note.as_deref(),
    };
    let entry = match side {
        CreditSide::Lent => ledger::create_credit_entry(conn, user_id, &req)?,
        CreditSide::Received => ledger::create_credit_received_entry(conn, user_id, &req)?,
    };
    println!(
        "Recorded {} {}: {} for '{}', due {}",
        side.noun(),
        entry.id,
        fmt_money(&entry.amount),
        entry.person_name,
        entry.due_date
    );
    Ok(())
}

fn repay(conn: &mut Connection, side: CreditSide, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = active_profile(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let mv = movement(conn, user_id, sub)?;
    let req = RepaymentRequest {
        amount: mv.amount,
        date: mv.date,
        payment_method: mv.method,
        card_id: mv.card_id,
        note: mv.note.as_deref(),
    };
    let entry = match side {
        CreditSide::Lent => ledger::add_credit_return(conn, user_id, id, &req)?,
        CreditSide::Received => ledger::add_credit_repayment(conn, user_id, id, &req)?,
    };
    println!(
        "Recorded repayment of {} against {} {} ({} of {} returned, {})",
        fmt_money(&mv.amount),
        side.noun(),
        entry.id,
        fmt_money(&entry.returned_amount),
        fmt_money(&entry.amount),
        entry.status
    );
    Ok(())
}

fn list(conn: &Connection, side: CreditSide, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = active_profile(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = credit::list_entries(conn, user_id, side)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.person_name.clone(),
                    fmt_money(&e.amount),
                    fmt_money(&e.returned_amount),
                    e.status.to_string(),
                    e.given_date.to_string(),
                    e.due_date.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Person", "Amount", "Returned", "Status", "Date", "Due"],
                rows,
            )
        );
    }
    Ok(())
}

fn history(conn: &Connection, side: CreditSide, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = active_profile(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = *sub.get_one::<i64>("id").unwrap();
    let entry = credit::get_entry(conn, user_id, side, id)?
        .with_context(|| format!("{} {} not found", side.noun(), id))?;
    let data = credit::list_history(conn, side, entry.id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|h| {
                vec![
                    h.date.to_string(),
                    h.kind.to_string(),
                    fmt_money(&h.amount),
                    h.payment_method.to_string(),
                    h.note.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Type", "Amount", "Method", "Note"], rows)
        );
    }
    Ok(())
}
