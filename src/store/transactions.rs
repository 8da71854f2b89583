// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::{PaymentMethod, Transaction, TxnType};
use crate::utils::stored_amount;

pub struct NewTransaction<'a> {
    pub kind: TxnType,
    pub category: &'a str,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: Option<&'a str>,
    pub payment_method: Option<PaymentMethod>,
    pub card_id: Option<i64>,
    pub credit_id: Option<i64>,
    pub credit_history_id: Option<i64>,
    pub credit_received_id: Option<i64>,
    pub credit_received_history_id: Option<i64>,
}

impl<'a> NewTransaction<'a> {
    /// Plain user-entered transaction, no credit linkage.
    pub fn plain(
        kind: TxnType,
        category: &'a str,
        amount: Decimal,
        date: NaiveDate,
        note: Option<&'a str>,
        payment_method: Option<PaymentMethod>,
        card_id: Option<i64>,
    ) -> Self {
        NewTransaction {
            kind,
            category,
            amount,
            date,
            note,
            payment_method,
            card_id,
            credit_id: None,
            credit_history_id: None,
            credit_received_id: None,
            credit_received_history_id: None,
        }
    }
}

struct RawRow {
    id: i64,
    kind: String,
    category: String,
    amount: String,
    date: NaiveDate,
    note: Option<String>,
    payment_method: Option<String>,
    card_id: Option<i64>,
    credit_id: Option<i64>,
    credit_history_id: Option<i64>,
    credit_received_id: Option<i64>,
    credit_received_history_id: Option<i64>,
}

const COLS: &str = "id, type, category, amount, date, note, payment_method, card_id, \
     credit_id, credit_history_id, credit_received_id, credit_received_history_id";

fn map_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: r.get(0)?,
        kind: r.get(1)?,
        category: r.get(2)?,
        amount: r.get(3)?,
        date: r.get(4)?,
        note: r.get(5)?,
        payment_method: r.get(6)?,
        card_id: r.get(7)?,
        credit_id: r.get(8)?,
        credit_history_id: r.get(9)?,
        credit_received_id: r.get(10)?,
        credit_received_history_id: r.get(11)?,
    })
}

fn to_transaction(raw: RawRow) -> Result<Transaction> {
    let kind = TxnType::parse(&raw.kind)
        .ok_or_else(|| LedgerError::validation(format!("unknown transaction type '{}'", raw.kind)))?;
    let payment_method = match raw.payment_method.as_deref() {
        Some(s) => Some(PaymentMethod::parse(s).ok_or_else(|| {
            LedgerError::validation(format!("unknown payment method '{}'", s))
        })?),
        None => None,
    };
    Ok(Transaction {
        id: raw.id,
        kind,
        category: raw.category,
        amount: stored_amount(&raw.amount)?,
        date: raw.date,
        note: raw.note,
        payment_method,
        card_id: raw.card_id,
        credit_id: raw.credit_id,
        credit_history_id: raw.credit_history_id,
        credit_received_id: raw.credit_received_id,
        credit_received_history_id: raw.credit_received_history_id,
    })
}

pub fn insert(conn: &Connection, user_id: i64, t: &NewTransaction<'_>) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(user_id, type, category, amount, date, note, payment_method, \
         card_id, credit_id, credit_history_id, credit_received_id, credit_received_history_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            user_id,
            t.kind.as_str(),
            t.category,
            t.amount.to_string(),
            t.date.to_string(),
            t.note,
            t.payment_method.map(|m| m.as_str()),
            t.card_id,
            t.credit_id,
            t.credit_history_id,
            t.credit_received_id,
            t.credit_received_history_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Option<Transaction>> {
    let raw = conn
        .query_row(
            &format!("SELECT {COLS} FROM transactions WHERE user_id=?1 AND id=?2"),
            params![user_id, id],
            map_row,
        )
        .optional()?;
    raw.map(to_transaction).transpose()
}

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLS} FROM transactions WHERE user_id=?1 ORDER BY date DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![user_id], map_row)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(to_transaction(row?)?);
    }
    Ok(data)
}

/// Patch for plain fields; credit linkage is never edited in place.
pub struct TransactionPatch<'a> {
    pub category: Option<&'a str>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub note: Option<&'a str>,
}

pub fn update(conn: &Connection, user_id: i64, id: i64, p: &TransactionPatch<'_>) -> Result<()> {
    let n = conn.execute(
        "UPDATE transactions SET
             category = COALESCE(?1, category),
             amount   = COALESCE(?2, amount),
             date     = COALESCE(?3, date),
             note     = COALESCE(?4, note)
         WHERE user_id=?5 AND id=?6",
        params![
            p.category,
            p.amount.map(|a| a.to_string()),
            p.date.map(|d| d.to_string()),
            p.note,
            user_id,
            id
        ],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("transaction", id));
    }
    Ok(())
}

pub fn delete_row(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE user_id=?1 AND id=?2",
        params![user_id, id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("transaction", id));
    }
    Ok(())
}

pub fn delete_by_credit(conn: &Connection, user_id: i64, credit_id: i64) -> Result<usize> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE user_id=?1 AND credit_id=?2",
        params![user_id, credit_id],
    )?;
    Ok(n)
}

pub fn delete_by_credit_received(
    conn: &Connection,
    user_id: i64,
    credit_received_id: i64,
) -> Result<usize> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE user_id=?1 AND credit_received_id=?2",
        params![user_id, credit_received_id],
    )?;
    Ok(n)
}

/// Category linkage is by name, so bulk operations filter on the name column.
pub fn count_by_category(conn: &Connection, user_id: i64, category: &str) -> Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE user_id=?1 AND category=?2",
        params![user_id, category],
        |r| r.get(0),
    )?;
    Ok(n)
}

pub fn delete_by_category(conn: &Connection, user_id: i64, category: &str) -> Result<usize> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE user_id=?1 AND category=?2",
        params![user_id, category],
    )?;
    Ok(n)
}

pub fn rewrite_category(
    conn: &Connection,
    user_id: i64,
    old_name: &str,
    new_name: &str,
) -> Result<usize> {
    let n = conn.execute(
        "UPDATE transactions SET category=?1 WHERE user_id=?2 AND category=?3",
        params![new_name, user_id, old_name],
    )?;
    Ok(n)
}

pub fn count_by_card(conn: &Connection, user_id: i64, card_id: i64) -> Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE user_id=?1 AND card_id=?2",
        params![user_id, card_id],
        |r| r.get(0),
    )?;
    Ok(n)
}
