// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketledger::models::{PaymentMethod, TxnType};
use pocketledger::store::cards::NewCard;
use pocketledger::store::transactions::NewTransaction;
use pocketledger::store::{cards, profiles, transactions};
use pocketledger::utils::set_active_profile;
use pocketledger::{cli, commands};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;

fn setup() -> (Connection, i64) {
    let mut conn = Connection::open_in_memory().unwrap();
    pocketledger::db::init_schema(&mut conn).unwrap();
    let user_id = profiles::insert(&conn, "tester", None).unwrap();
    set_active_profile(&conn, user_id).unwrap();
    (conn, user_id)
}

#[test]
fn export_transactions_streams_pretty_json() {
    let (conn, user_id) = setup();
    let card_id = cards::insert(
        &conn,
        user_id,
        &NewCard {
            card_name: "Visa",
            card_number: "4111",
            expiry_date: "12/27",
            card_type: "debit",
        },
    )
    .unwrap();
    transactions::insert(
        &conn,
        user_id,
        &NewTransaction::plain(
            TxnType::Expense,
            "Groceries",
            Decimal::new(1234, 2),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            Some("Weekly run"),
            Some(PaymentMethod::Card),
            Some(card_id),
        ),
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "pocketledger",
        "export",
        "transactions",
        "--format",
        "json",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        commands::exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-01-02",
                "type": "expense",
                "category": "Groceries",
                "amount": "12.34",
                "method": "card",
                "card": "Visa",
                "note": "Weekly run"
            }
        ])
    );
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let (conn, _) = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "pocketledger",
        "export",
        "transactions",
        "--format",
        "xml",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        assert!(commands::exporter::handle(&conn, export_m).is_err());
    } else {
        panic!("no export subcommand");
    }
    assert!(!out_path.exists());
}
