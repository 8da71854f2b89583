// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketledger::error::LedgerError;
use pocketledger::ledger::{self, CreditRequest, RepaymentRequest};
use pocketledger::models::{PaymentMethod, TxnType};
use pocketledger::store::cards::NewCard;
use pocketledger::store::credit::{self, CreditSide, NewCreditEntry};
use pocketledger::store::transactions::NewTransaction;
use pocketledger::store::{cards, categories, profiles, transactions};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> (Connection, i64) {
    let mut conn = Connection::open_in_memory().unwrap();
    pocketledger::db::init_schema(&mut conn).unwrap();
    let user_id = profiles::insert(&conn, "tester", None).unwrap();
    (conn, user_id)
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn add_food_expense(conn: &Connection, user_id: i64, amount: i64) {
    ledger::record_transaction(
        conn,
        user_id,
        &NewTransaction::plain(
            TxnType::Expense,
            "Food",
            Decimal::from(amount),
            d(2025, 1, 10),
            None,
            Some(PaymentMethod::Cash),
            None,
        ),
    )
    .unwrap();
}

#[test]
fn deleting_credit_entry_removes_all_linked_rows() {
    let (mut conn, user_id) = setup();
    let entry = ledger::create_credit_entry(
        &mut conn,
        user_id,
        &CreditRequest {
            person_name: "Alice",
            amount: Decimal::from(100),
            due_date: d(2025, 2, 10),
            given_date: Some(d(2025, 1, 10)),
            payment_method: PaymentMethod::Cash,
            card_id: None,
            note: None,
        },
    )
    .unwrap();
    ledger::add_credit_return(
        &mut conn,
        user_id,
        entry.id,
        &RepaymentRequest {
            amount: Decimal::from(40),
            date: Some(d(2025, 1, 15)),
            payment_method: PaymentMethod::Cash,
            card_id: None,
            note: None,
        },
    )
    .unwrap();
    // unrelated transaction must survive
    add_food_expense(&conn, user_id, 5);

    ledger::delete_credit_entry(&mut conn, user_id, entry.id).unwrap();

    let txns = transactions::list(&conn, user_id).unwrap();
    assert_eq!(txns.len(), 1);
    assert!(txns.iter().all(|t| t.credit_id != Some(entry.id)));
    assert!(credit::list_history(&conn, CreditSide::Lent, entry.id)
        .unwrap()
        .is_empty());
    assert!(credit::get_entry(&conn, user_id, CreditSide::Lent, entry.id)
        .unwrap()
        .is_none());
}

#[test]
fn deleting_received_entry_removes_all_linked_rows() {
    let (mut conn, user_id) = setup();
    let entry = ledger::create_credit_received_entry(
        &mut conn,
        user_id,
        &CreditRequest {
            person_name: "Bob",
            amount: Decimal::from(200),
            due_date: d(2025, 3, 1),
            given_date: Some(d(2025, 1, 5)),
            payment_method: PaymentMethod::Cash,
            card_id: None,
            note: None,
        },
    )
    .unwrap();
    ledger::add_credit_repayment(
        &mut conn,
        user_id,
        entry.id,
        &RepaymentRequest {
            amount: Decimal::from(80),
            date: Some(d(2025, 1, 20)),
            payment_method: PaymentMethod::Cash,
            card_id: None,
            note: None,
        },
    )
    .unwrap();

    ledger::delete_credit_received_entry(&mut conn, user_id, entry.id).unwrap();

    assert!(transactions::list(&conn, user_id).unwrap().is_empty());
    assert!(credit::list_history(&conn, CreditSide::Received, entry.id)
        .unwrap()
        .is_empty());
    assert!(
        credit::get_entry(&conn, user_id, CreditSide::Received, entry.id)
            .unwrap()
            .is_none()
    );
}

#[test]
fn card_referenced_by_transactions_cannot_be_deleted() {
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
    ledger::record_transaction(
        &conn,
        user_id,
        &NewTransaction::plain(
            TxnType::Expense,
            "Food",
            Decimal::from(10),
            d(2025, 1, 10),
            None,
            Some(PaymentMethod::Card),
            Some(card_id),
        ),
    )
    .unwrap();

    assert!(ledger::is_card_in_use(&conn, user_id, card_id).unwrap());
    let err = ledger::delete_card(&conn, user_id, card_id).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(cards::list(&conn, user_id).unwrap().len(), 1);
}

#[test]
fn card_pinned_by_credit_entry_cannot_be_deleted() {
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
    // Entry pinning the card without any transaction referencing it.
    credit::insert_entry(
        &conn,
        user_id,
        CreditSide::Lent,
        &NewCreditEntry {
            person_name: "Alice",
            amount: Decimal::from(100),
            due_date: d(2025, 2, 10),
            given_date: d(2025, 1, 10),
            payment_method: PaymentMethod::Card,
            card_id: Some(card_id),
            note: None,
        },
    )
    .unwrap();

    let err = ledger::delete_card(&conn, user_id, card_id).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(cards::list(&conn, user_id).unwrap().len(), 1);
}

#[test]
fn unused_card_deletes_cleanly() {
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
    assert!(!ledger::is_card_in_use(&conn, user_id, card_id).unwrap());
    ledger::delete_card(&conn, user_id, card_id).unwrap();
    assert!(cards::list(&conn, user_id).unwrap().is_empty());
}

#[test]
fn category_delete_is_guarded_without_cascade() {
    let (mut conn, user_id) = setup();
    let cat_id = categories::insert(&conn, user_id, "Food", TxnType::Expense).unwrap();
    add_food_expense(&conn, user_id, 10);

    assert_eq!(ledger::category_in_use(&conn, user_id, cat_id).unwrap(), 1);
    let err = ledger::delete_category(&mut conn, user_id, cat_id, false).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(categories::list(&conn, user_id).unwrap().len(), 1);
    assert_eq!(transactions::list(&conn, user_id).unwrap().len(), 1);
}

#[test]
fn category_cascade_removes_referencing_transactions() {
    let (mut conn, user_id) = setup();
    let cat_id = categories::insert(&conn, user_id, "Food", TxnType::Expense).unwrap();
    for amount in [10, 20, 30] {
        add_food_expense(&conn, user_id, amount);
    }
    ledger::record_transaction(
        &conn,
        user_id,
        &NewTransaction::plain(
            TxnType::Expense,
            "Transport",
            Decimal::from(7),
            d(2025, 1, 11),
            None,
            Some(PaymentMethod::Cash),
            None,
        ),
    )
    .unwrap();

    let removed = ledger::delete_category(&mut conn, user_id, cat_id, true).unwrap();
    assert_eq!(removed, 3);
    let txns = transactions::list(&conn, user_id).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].category, "Transport");
    assert!(categories::list(&conn, user_id).unwrap().is_empty());
}

#[test]
fn renaming_a_category_rewrites_referencing_transactions() {
    let (mut conn, user_id) = setup();
    let cat_id = categories::insert(&conn, user_id, "Food", TxnType::Expense).unwrap();
    add_food_expense(&conn, user_id, 10);
    add_food_expense(&conn, user_id, 20);

    let rewritten = ledger::rename_category(&mut conn, user_id, cat_id, "Groceries").unwrap();
    assert_eq!(rewritten, 2);
    let txns = transactions::list(&conn, user_id).unwrap();
    assert!(txns.iter().all(|t| t.category == "Groceries"));
    let cats = categories::list(&conn, user_id).unwrap();
    assert_eq!(cats[0].name, "Groceries");
}

#[test]
fn renaming_onto_an_existing_category_is_rejected() {
    let (mut conn, user_id) = setup();
    let cat_id = categories::insert(&conn, user_id, "Food", TxnType::Expense).unwrap();
    categories::insert(&conn, user_id, "Groceries", TxnType::Expense).unwrap();
    add_food_expense(&conn, user_id, 10);

    let err = ledger::rename_category(&mut conn, user_id, cat_id, "Groceries").unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    // rollback: the transaction still points at the old name
    let txns = transactions::list(&conn, user_id).unwrap();
    assert_eq!(txns[0].category, "Food");
}
