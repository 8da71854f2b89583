// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger consistency layer. Every credit movement gets exactly one mirrored
//! transaction, derived entry columns stay equal to the history sum, and
//! deletes cascade (or are guarded) so no back-reference is ever left dangling.
//! Multi-step writes run inside a single store transaction.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::{CreditEntry, CreditStatus, HistoryKind, PaymentMethod, Transaction, TxnType};
use crate::store::credit::{self, CreditSide, NewCreditEntry, NewHistoryItem};
use crate::store::{cards, categories, transactions};
use crate::store::transactions::NewTransaction;

pub const CATEGORY_CREDIT: &str = "Credit";
pub const CATEGORY_CREDIT_RETURN: &str = "Credit Return";
pub const CATEGORY_CREDIT_RECEIVED: &str = "Credit Received";
pub const CATEGORY_CREDIT_RETURN_PAID: &str = "Credit Return Paid";

pub struct CreditRequest<'a> {
    pub person_name: &'a str,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    /// Defaults to today.
    pub given_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub card_id: Option<i64>,
    pub note: Option<&'a str>,
}

pub struct RepaymentRequest<'a> {
    pub amount: Decimal,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub card_id: Option<i64>,
    pub note: Option<&'a str>,
}

fn require_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}

fn require_card(conn: &Connection, user_id: i64, card_id: Option<i64>) -> Result<()> {
    if let Some(id) = card_id {
        if cards::get(conn, user_id, id)?.is_none() {
            return Err(LedgerError::not_found("card", id));
        }
    }
    Ok(())
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Record a plain income/expense transaction (no credit linkage).
pub fn record_transaction(
    conn: &Connection,
    user_id: i64,
    t: &NewTransaction<'_>,
) -> Result<Transaction> {
    require_positive(t.amount)?;
    require_card(conn, user_id, t.card_id)?;
    let id = transactions::insert(conn, user_id, t)?;
    transactions::get(conn, user_id, id)?
        .ok_or_else(|| LedgerError::not_found("transaction", id))
}

/// Deleting a credit mirror directly would orphan its history item; those rows
/// only go away through the entry cascade.
pub fn delete_transaction(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let t = transactions::get(conn, user_id, id)?
        .ok_or_else(|| LedgerError::not_found("transaction", id))?;
    if t.is_credit_linked() {
        return Err(LedgerError::validation(format!(
            "transaction {} mirrors a credit movement; delete the credit entry instead",
            id
        )));
    }
    transactions::delete_row(conn, user_id, id)
}

/// Lend money: entry + its single `given` history item + the mirroring expense
/// transaction, all-or-nothing.
pub fn create_credit_entry(
    conn: &mut Connection,
    user_id: i64,
    req: &CreditRequest<'_>,
) -> Result<CreditEntry> {
    require_positive(req.amount)?;
    let tx = conn.transaction()?;
    require_card(&tx, user_id, req.card_id)?;
    let given_date = req.given_date.unwrap_or_else(today);

    let credit_id = credit::insert_entry(
        &tx,
        user_id,
        CreditSide::Lent,
        &NewCreditEntry {
            person_name: req.person_name,
            amount: req.amount,
            due_date: req.due_date,
            given_date,
            payment_method: req.payment_method,
            card_id: req.card_id,
            note: req.note,
        },
    )?;
    let history_id = credit::insert_history(
        &tx,
        CreditSide::Lent,
        credit_id,
        &NewHistoryItem {
            date: given_date,
            amount: req.amount,
            kind: HistoryKind::Given,
            payment_method: req.payment_method,
            card_id: req.card_id,
            note: req.note,
        },
    )?;
    let note = format!("Credit given to {}", req.person_name);
    transactions::insert(
        &tx,
        user_id,
        &NewTransaction {
            kind: TxnType::Expense,
            category: CATEGORY_CREDIT,
            amount: req.amount,
            date: given_date,
            note: Some(&note),
            payment_method: Some(req.payment_method),
            card_id: req.card_id,
            credit_id: Some(credit_id),
            credit_history_id: Some(history_id),
            credit_received_id: None,
            credit_received_history_id: None,
        },
    )?;
    tx.commit()?;

    credit::get_entry(conn, user_id, CreditSide::Lent, credit_id)?
        .ok_or_else(|| LedgerError::not_found("credit entry", credit_id))
}

/// Borrow money: entry + the mirroring income transaction. The entry itself
/// marks receipt, so no initial history row exists on this side.
pub fn create_credit_received_entry(
    conn: &mut Connection,
    user_id: i64,
    req: &CreditRequest<'_>,
) -> Result<CreditEntry> {
    require_positive(req.amount)?;
    let tx = conn.transaction()?;
    require_card(&tx, user_id, req.card_id)?;
    let given_date = req.given_date.unwrap_or_else(today);

    let credit_id = credit::insert_entry(
        &tx,
        user_id,
        CreditSide::Received,
        &NewCreditEntry {
            person_name: req.person_name,
            amount: req.amount,
            due_date: req.due_date,
            given_date,
            payment_method: req.payment_method,
            card_id: req.card_id,
            note: req.note,
        },
    )?;
    let note = format!("Credit received from {}", req.person_name);
    transactions::insert(
        &tx,
        user_id,
        &NewTransaction {
            kind: TxnType::Income,
            category: CATEGORY_CREDIT_RECEIVED,
            amount: req.amount,
            date: given_date,
            note: Some(&note),
            payment_method: Some(req.payment_method),
            card_id: req.card_id,
            credit_id: None,
            credit_history_id: None,
            credit_received_id: Some(credit_id),
            credit_received_history_id: None,
        },
    )?;
    tx.commit()?;

    credit::get_entry(conn, user_id, CreditSide::Received, credit_id)?
        .ok_or_else(|| LedgerError::not_found("credit received entry", credit_id))
}

/// Someone paid back part of what the user lent them.
pub fn add_credit_return(
    conn: &mut Connection,
    user_id: i64,
    credit_id: i64,
    req: &RepaymentRequest<'_>,
) -> Result<CreditEntry> {
    add_repayment(conn, user_id, CreditSide::Lent, credit_id, req)
}

/// The user paid back part of what they owe.
pub fn add_credit_repayment(
    conn: &mut Connection,
    user_id: i64,
    credit_id: i64,
    req: &RepaymentRequest<'_>,
) -> Result<CreditEntry> {
    add_repayment(conn, user_id, CreditSide::Received, credit_id, req)
}

fn add_repayment(
    conn: &mut Connection,
    user_id: i64,
    side: CreditSide,
    credit_id: i64,
    req: &RepaymentRequest<'_>,
) -> Result<CreditEntry> {
    require_positive(req.amount)?;
    let tx = conn.transaction()?;
    require_card(&tx, user_id, req.card_id)?;

    let entry = credit::get_entry(&tx, user_id, side, credit_id)?
        .ok_or_else(|| LedgerError::not_found(side.noun(), credit_id))?;
    let date = req.date.unwrap_or_else(today);

    let history_id = credit::insert_history(
        &tx,
        side,
        credit_id,
        &NewHistoryItem {
            date,
            amount: req.amount,
            kind: HistoryKind::Returned,
            payment_method: req.payment_method,
            card_id: req.card_id,
            note: req.note,
        },
    )?;

    let (kind, category, note, links) = match side {
        CreditSide::Lent => (
            TxnType::Income,
            CATEGORY_CREDIT_RETURN,
            format!("Credit return from {}", entry.person_name),
            (Some(credit_id), Some(history_id), None, None),
        ),
        CreditSide::Received => (
            TxnType::Expense,
            CATEGORY_CREDIT_RETURN_PAID,
            format!("Credit repaid to {}", entry.person_name),
            (None, None, Some(credit_id), Some(history_id)),
        ),
    };
    transactions::insert(
        &tx,
        user_id,
        &NewTransaction {
            kind,
            category,
            amount: req.amount,
            date,
            note: Some(&note),
            payment_method: Some(req.payment_method),
            card_id: req.card_id,
            credit_id: links.0,
            credit_history_id: links.1,
            credit_received_id: links.2,
            credit_received_history_id: links.3,
        },
    )?;

    // Derived columns are rewritten from the history sum in the same store
    // transaction as the insert that changed it.
    let returned = credit::returned_total(&tx, side, credit_id)?;
    let status = CreditStatus::derive(entry.amount, returned);
    credit::update_derived(&tx, user_id, side, credit_id, returned, status)?;
    tx.commit()?;

    credit::get_entry(conn, user_id, side, credit_id)?
        .ok_or_else(|| LedgerError::not_found(side.noun(), credit_id))
}

pub fn delete_credit_entry(conn: &mut Connection, user_id: i64, credit_id: i64) -> Result<()> {
    delete_entry_cascade(conn, user_id, CreditSide::Lent, credit_id)
}

pub fn delete_credit_received_entry(
    conn: &mut Connection,
    user_id: i64,
    credit_id: i64,
) -> Result<()> {
    delete_entry_cascade(conn, user_id, CreditSide::Received, credit_id)
}

/// Cascade order: linked transactions, then history rows, then the entry.
fn delete_entry_cascade(
    conn: &mut Connection,
    user_id: i64,
    side: CreditSide,
    credit_id: i64,
) -> Result<()> {
    let tx = conn.transaction()?;
    if credit::get_entry(&tx, user_id, side, credit_id)?.is_none() {
        return Err(LedgerError::not_found(side.noun(), credit_id));
    }
    match side {
        CreditSide::Lent => transactions::delete_by_credit(&tx, user_id, credit_id)?,
        CreditSide::Received => transactions::delete_by_credit_received(&tx, user_id, credit_id)?,
    };
    credit::delete_history_by_credit(&tx, side, credit_id)?;
    credit::delete_entry_row(&tx, user_id, side, credit_id)?;
    tx.commit()?;
    Ok(())
}

/// In use means referenced by any transaction's card_id or pinned as any
/// credit entry's initial card, on either side.
pub fn is_card_in_use(conn: &Connection, user_id: i64, card_id: i64) -> Result<bool> {
    if transactions::count_by_card(conn, user_id, card_id)? > 0 {
        return Ok(true);
    }
    credit::any_entry_uses_card(conn, user_id, card_id)
}

/// Guard runs first and fails closed: if it errors or finds usage, nothing is
/// removed.
pub fn delete_card(conn: &Connection, user_id: i64, card_id: i64) -> Result<()> {
    let card = cards::get(conn, user_id, card_id)?
        .ok_or_else(|| LedgerError::not_found("card", card_id))?;
    if is_card_in_use(conn, user_id, card_id)? {
        return Err(LedgerError::validation(format!(
            "card '{}' is in use by transactions or credit entries",
            card.card_name
        )));
    }
    cards::delete_row(conn, user_id, card_id)
}

pub fn category_in_use(conn: &Connection, user_id: i64, category_id: i64) -> Result<i64> {
    let cat = categories::get(conn, user_id, category_id)?
        .ok_or_else(|| LedgerError::not_found("category", category_id))?;
    transactions::count_by_category(conn, user_id, &cat.name)
}

/// The pre-check always runs first. With references present the plain delete
/// fails with nothing removed; `cascade` deletes the referencing transactions
/// (matched by name) and the category atomically.
pub fn delete_category(
    conn: &mut Connection,
    user_id: i64,
    category_id: i64,
    cascade: bool,
) -> Result<usize> {
    let tx = conn.transaction()?;
    let cat = categories::get(&tx, user_id, category_id)?
        .ok_or_else(|| LedgerError::not_found("category", category_id))?;
    let referencing = transactions::count_by_category(&tx, user_id, &cat.name)?;
    if referencing > 0 && !cascade {
        return Err(LedgerError::validation(format!(
            "category '{}' is referenced by {} transaction(s); pass cascade to remove them",
            cat.name, referencing
        )));
    }
    let mut removed = 0;
    if referencing > 0 {
        removed = transactions::delete_by_category(&tx, user_id, &cat.name)?;
    }
    categories::delete_row(&tx, user_id, category_id)?;
    tx.commit()?;
    Ok(removed)
}

/// Transactions link to categories by name, so a rename must rewrite every
/// referencing transaction in the same store transaction as the rename itself.
pub fn rename_category(
    conn: &mut Connection,
    user_id: i64,
    category_id: i64,
    new_name: &str,
) -> Result<usize> {
    let tx = conn.transaction()?;
    let cat = categories::get(&tx, user_id, category_id)?
        .ok_or_else(|| LedgerError::not_found("category", category_id))?;
    if cat.name == new_name {
        return Ok(0);
    }
    if categories::exists(&tx, user_id, new_name, cat.kind)? {
        return Err(LedgerError::validation(format!(
            "category '{}' ({}) already exists",
            new_name, cat.kind
        )));
    }
    let rewritten = transactions::rewrite_category(&tx, user_id, &cat.name, new_name)?;
    categories::rename_row(&tx, user_id, category_id, new_name)?;
    tx.commit()?;
    Ok(rewritten)
}
