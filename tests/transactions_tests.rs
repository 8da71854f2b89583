// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketledger::models::{PaymentMethod, TxnType};
use pocketledger::store::transactions::NewTransaction;
use pocketledger::store::{profiles, transactions};
use pocketledger::utils::set_active_profile;
use pocketledger::{cli, commands};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> (Connection, i64) {
    let mut conn = Connection::open_in_memory().unwrap();
    pocketledger::db::init_schema(&mut conn).unwrap();
    let user_id = profiles::insert(&conn, "tester", None).unwrap();
    set_active_profile(&conn, user_id).unwrap();
    for i in 1..=3 {
        transactions::insert(
            &conn,
            user_id,
            &NewTransaction::plain(
                TxnType::Expense,
                "Food",
                Decimal::from(10),
                NaiveDate::from_ymd_opt(2025, 1, i).unwrap(),
                None,
                Some(PaymentMethod::Cash),
                None,
            ),
        )
        .unwrap();
    }
    (conn, user_id)
}

#[test]
fn list_limit_respected() {
    let (conn, _) = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["pocketledger", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = commands::transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_month_and_category() {
    let (conn, user_id) = setup();
    transactions::insert(
        &conn,
        user_id,
        &NewTransaction::plain(
            TxnType::Income,
            "Salary",
            Decimal::from(1000),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            None,
            Some(PaymentMethod::Cash),
            None,
        ),
    )
    .unwrap();

    let cli = cli::build_cli();
    let matches =
        cli.get_matches_from(["pocketledger", "tx", "list", "--month", "2025-01", "--category", "Food"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = commands::transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 3);
            assert!(rows.iter().all(|r| r.category == "Food"));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}
