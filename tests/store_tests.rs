// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketledger::cache::Snapshot;
use pocketledger::error::LedgerError;
use pocketledger::models::{PaymentMethod, TxnType};
use pocketledger::store::cards::NewCard;
use pocketledger::store::transactions::{NewTransaction, TransactionPatch};
use pocketledger::store::{cards, categories, profiles, transactions};
use pocketledger::utils::{active_profile, set_active_profile};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    pocketledger::db::init_schema(&mut conn).unwrap();
    conn
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn rows_are_scoped_to_their_owner() {
    let conn = setup();
    let alice = profiles::insert(&conn, "alice", None).unwrap();
    let bob = profiles::insert(&conn, "bob", None).unwrap();

    transactions::insert(
        &conn,
        alice,
        &NewTransaction::plain(
            TxnType::Income,
            "Salary",
            Decimal::from(100),
            d(2025, 1, 2),
            None,
            Some(PaymentMethod::Cash),
            None,
        ),
    )
    .unwrap();
    categories::insert(&conn, alice, "Salary", TxnType::Income).unwrap();

    assert_eq!(transactions::list(&conn, alice).unwrap().len(), 1);
    assert!(transactions::list(&conn, bob).unwrap().is_empty());
    assert!(categories::list(&conn, bob).unwrap().is_empty());

    // bob may reuse alice's category name
    categories::insert(&conn, bob, "Salary", TxnType::Income).unwrap();
}

#[test]
fn duplicate_category_is_rejected_but_other_type_is_fine() {
    let conn = setup();
    let user_id = profiles::insert(&conn, "tester", None).unwrap();
    categories::insert(&conn, user_id, "Misc", TxnType::Expense).unwrap();

    let err = categories::insert(&conn, user_id, "Misc", TxnType::Expense).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    // same name, other polarity
    categories::insert(&conn, user_id, "Misc", TxnType::Income).unwrap();
    assert_eq!(categories::list(&conn, user_id).unwrap().len(), 2);
}

#[test]
fn amounts_round_trip_exactly_through_text_storage() {
    let conn = setup();
    let user_id = profiles::insert(&conn, "tester", None).unwrap();
    let amount: Decimal = "0.10".parse().unwrap();
    let id = transactions::insert(
        &conn,
        user_id,
        &NewTransaction::plain(
            TxnType::Expense,
            "Food",
            amount,
            d(2025, 1, 2),
            None,
            Some(PaymentMethod::Cash),
            None,
        ),
    )
    .unwrap();
    let t = transactions::get(&conn, user_id, id).unwrap().unwrap();
    assert_eq!(t.amount, amount);
    assert_eq!(t.amount.to_string(), "0.10");
}

#[test]
fn transaction_patch_updates_only_given_fields() {
    let conn = setup();
    let user_id = profiles::insert(&conn, "tester", None).unwrap();
    let id = transactions::insert(
        &conn,
        user_id,
        &NewTransaction::plain(
            TxnType::Expense,
            "Food",
            Decimal::from(10),
            d(2025, 1, 2),
            Some("lunch"),
            Some(PaymentMethod::Cash),
            None,
        ),
    )
    .unwrap();

    transactions::update(
        &conn,
        user_id,
        id,
        &TransactionPatch {
            category: None,
            amount: Some(Decimal::from(12)),
            date: None,
            note: None,
        },
    )
    .unwrap();

    let t = transactions::get(&conn, user_id, id).unwrap().unwrap();
    assert_eq!(t.amount, Decimal::from(12));
    assert_eq!(t.category, "Food");
    assert_eq!(t.note.as_deref(), Some("lunch"));
}

#[test]
fn active_profile_is_required() {
    let conn = setup();
    let err = active_profile(&conn).unwrap_err();
    assert!(matches!(err, LedgerError::Auth));

    let user_id = profiles::insert(&conn, "tester", None).unwrap();
    set_active_profile(&conn, user_id).unwrap();
    assert_eq!(active_profile(&conn).unwrap(), user_id);
}

#[test]
fn card_update_rewrites_details() {
    let conn = setup();
    let user_id = profiles::insert(&conn, "tester", None).unwrap();
    let id = cards::insert(
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
    cards::update(
        &conn,
        user_id,
        id,
        &NewCard {
            card_name: "Visa Gold",
            card_number: "4111",
            expiry_date: "12/29",
            card_type: "credit",
        },
    )
    .unwrap();
    let c = cards::get(&conn, user_id, id).unwrap().unwrap();
    assert_eq!(c.card_name, "Visa Gold");
    assert_eq!(c.expiry_date, "12/29");

    let err = cards::update(
        &conn,
        user_id,
        999,
        &NewCard {
            card_name: "x",
            card_number: "x",
            expiry_date: "x",
            card_type: "x",
        },
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
}

#[test]
fn profile_theme_is_persisted() {
    let conn = setup();
    let user_id = profiles::insert(&conn, "tester", Some("t@example.com")).unwrap();
    profiles::set_theme(&conn, user_id, "dark").unwrap();
    let p = profiles::get(&conn, user_id).unwrap().unwrap();
    assert_eq!(p.theme_setting.as_deref(), Some("dark"));
    assert_eq!(p.email.as_deref(), Some("t@example.com"));
}

#[test]
fn duplicate_profile_name_is_rejected() {
    let conn = setup();
    profiles::insert(&conn, "tester", None).unwrap();
    let err = profiles::insert(&conn, "tester", Some("t@example.com")).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn snapshot_loads_all_collections() {
    let conn = setup();
    let user_id = profiles::insert(&conn, "tester", None).unwrap();
    cards::insert(
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
    categories::insert(&conn, user_id, "Food", TxnType::Expense).unwrap();
    transactions::insert(
        &conn,
        user_id,
        &NewTransaction::plain(
            TxnType::Expense,
            "Food",
            Decimal::from(10),
            d(2025, 1, 2),
            None,
            Some(PaymentMethod::Cash),
            None,
        ),
    )
    .unwrap();

    let mut snapshot = Snapshot::load(&conn, user_id).unwrap();
    assert_eq!(snapshot.cards.len(), 1);
    assert_eq!(snapshot.categories.len(), 1);
    assert_eq!(snapshot.transactions.len(), 1);
    assert!(snapshot.credits.is_empty());
    assert!(snapshot.credits_received.is_empty());

    let balances = snapshot.balances();
    assert_eq!(
        balances[&pocketledger::balance::Source::Cash],
        Decimal::from(-10)
    );

    // refresh sees new writes
    transactions::insert(
        &conn,
        user_id,
        &NewTransaction::plain(
            TxnType::Income,
            "Salary",
            Decimal::from(100),
            d(2025, 1, 3),
            None,
            Some(PaymentMethod::Cash),
            None,
        ),
    )
    .unwrap();
    snapshot.refresh(&conn).unwrap();
    assert_eq!(snapshot.transactions.len(), 2);
}
