// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! CRUD for the two mirrored credit ledgers. `CreditSide` picks the table
//! pair; the row shapes are identical by construction.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::{CreditEntry, CreditHistoryItem, CreditStatus, HistoryKind, PaymentMethod};
use crate::utils::stored_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditSide {
    /// Money the user lent out.
    Lent,
    /// Money the user owes.
    Received,
}

impl CreditSide {
    pub fn entry_table(self) -> &'static str {
        match self {
            CreditSide::Lent => "credit_entries",
            CreditSide::Received => "credit_received",
        }
    }

    pub fn history_table(self) -> &'static str {
        match self {
            CreditSide::Lent => "credit_history",
            CreditSide::Received => "credit_received_history",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            CreditSide::Lent => "credit entry",
            CreditSide::Received => "credit received entry",
        }
    }
}

pub struct NewCreditEntry<'a> {
    pub person_name: &'a str,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub given_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub card_id: Option<i64>,
    pub note: Option<&'a str>,
}

struct RawEntry {
    id: i64,
    person_name: String,
    amount: String,
    due_date: NaiveDate,
    given_date: NaiveDate,
    returned_amount: String,
    status: String,
    initial_payment_method: String,
    initial_card_id: Option<i64>,
    initial_note: Option<String>,
}

const ENTRY_COLS: &str = "id, person_name, amount, due_date, given_date, returned_amount, \
     status, initial_payment_method, initial_card_id, initial_note";

fn map_entry(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
    Ok(RawEntry {
        id: r.get(0)?,
        person_name: r.get(1)?,
        amount: r.get(2)?,
        due_date: r.get(3)?,
        given_date: r.get(4)?,
        returned_amount: r.get(5)?,
        status: r.get(6)?,
        initial_payment_method: r.get(7)?,
        initial_card_id: r.get(8)?,
        initial_note: r.get(9)?,
    })
}

fn to_entry(raw: RawEntry) -> Result<CreditEntry> {
    let status = CreditStatus::parse(&raw.status)
        .ok_or_else(|| LedgerError::validation(format!("unknown credit status '{}'", raw.status)))?;
    let method = PaymentMethod::parse(&raw.initial_payment_method).ok_or_else(|| {
        LedgerError::validation(format!(
            "unknown payment method '{}'",
            raw.initial_payment_method
        ))
    })?;
    Ok(CreditEntry {
        id: raw.id,
        person_name: raw.person_name,
        amount: stored_amount(&raw.amount)?,
        due_date: raw.due_date,
        given_date: raw.given_date,
        returned_amount: stored_amount(&raw.returned_amount)?,
        status,
        initial_payment_method: method,
        initial_card_id: raw.initial_card_id,
        initial_note: raw.initial_note,
    })
}

pub fn insert_entry(
    conn: &Connection,
    user_id: i64,
    side: CreditSide,
    e: &NewCreditEntry<'_>,
) -> Result<i64> {
    conn.execute(
        &format!(
            "INSERT INTO {}(user_id, person_name, amount, due_date, given_date, returned_amount, \
             status, initial_payment_method, initial_card_id, initial_note)
             VALUES (?1, ?2, ?3, ?4, ?5, '0', 'active', ?6, ?7, ?8)",
            side.entry_table()
        ),
        params![
            user_id,
            e.person_name,
            e.amount.to_string(),
            e.due_date.to_string(),
            e.given_date.to_string(),
            e.payment_method.as_str(),
            e.card_id,
            e.note,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_entry(
    conn: &Connection,
    user_id: i64,
    side: CreditSide,
    id: i64,
) -> Result<Option<CreditEntry>> {
    let raw = conn
        .query_row(
            &format!(
                "SELECT {ENTRY_COLS} FROM {} WHERE user_id=?1 AND id=?2",
                side.entry_table()
            ),
            params![user_id, id],
            map_entry,
        )
        .optional()?;
    raw.map(to_entry).transpose()
}

pub fn list_entries(conn: &Connection, user_id: i64, side: CreditSide) -> Result<Vec<CreditEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENTRY_COLS} FROM {} WHERE user_id=?1 ORDER BY given_date DESC, id DESC",
        side.entry_table()
    ))?;
    let rows = stmt.query_map(params![user_id], map_entry)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(to_entry(row?)?);
    }
    Ok(data)
}

/// Rewrite the stored derived columns. Callers run this in the same store
/// transaction as the history insert that changed the sum.
pub fn update_derived(
    conn: &Connection,
    user_id: i64,
    side: CreditSide,
    id: i64,
    returned: Decimal,
    status: CreditStatus,
) -> Result<()> {
    let n = conn.execute(
        &format!(
            "UPDATE {} SET returned_amount=?1, status=?2 WHERE user_id=?3 AND id=?4",
            side.entry_table()
        ),
        params![returned.to_string(), status.as_str(), user_id, id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found(side.noun(), id));
    }
    Ok(())
}

pub fn delete_entry_row(conn: &Connection, user_id: i64, side: CreditSide, id: i64) -> Result<()> {
    let n = conn.execute(
        &format!("DELETE FROM {} WHERE user_id=?1 AND id=?2", side.entry_table()),
        params![user_id, id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found(side.noun(), id));
    }
    Ok(())
}

pub struct NewHistoryItem<'a> {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub kind: HistoryKind,
    pub payment_method: PaymentMethod,
    pub card_id: Option<i64>,
    pub note: Option<&'a str>,
}

struct RawHistory {
    id: i64,
    credit_id: i64,
    date: NaiveDate,
    amount: String,
    kind: String,
    payment_method: String,
    card_id: Option<i64>,
    note: Option<String>,
}

const HISTORY_COLS: &str = "id, credit_id, date, amount, type, payment_method, card_id, note";

fn map_history(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawHistory> {
    Ok(RawHistory {
        id: r.get(0)?,
        credit_id: r.get(1)?,
        date: r.get(2)?,
        amount: r.get(3)?,
        kind: r.get(4)?,
        payment_method: r.get(5)?,
        card_id: r.get(6)?,
        note: r.get(7)?,
    })
}

fn to_history(raw: RawHistory) -> Result<CreditHistoryItem> {
    let kind = HistoryKind::parse(&raw.kind)
        .ok_or_else(|| LedgerError::validation(format!("unknown history type '{}'", raw.kind)))?;
    let method = PaymentMethod::parse(&raw.payment_method).ok_or_else(|| {
        LedgerError::validation(format!("unknown payment method '{}'", raw.payment_method))
    })?;
    Ok(CreditHistoryItem {
        id: raw.id,
        credit_id: raw.credit_id,
        date: raw.date,
        amount: stored_amount(&raw.amount)?,
        kind,
        payment_method: method,
        card_id: raw.card_id,
        note: raw.note,
    })
}

pub fn insert_history(
    conn: &Connection,
    side: CreditSide,
    credit_id: i64,
    h: &NewHistoryItem<'_>,
) -> Result<i64> {
    conn.execute(
        &format!(
            "INSERT INTO {}(credit_id, date, amount, type, payment_method, card_id, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            side.history_table()
        ),
        params![
            credit_id,
            h.date.to_string(),
            h.amount.to_string(),
            h.kind.as_str(),
            h.payment_method.as_str(),
            h.card_id,
            h.note,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_history(
    conn: &Connection,
    side: CreditSide,
    credit_id: i64,
) -> Result<Vec<CreditHistoryItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {HISTORY_COLS} FROM {} WHERE credit_id=?1 ORDER BY date, id",
        side.history_table()
    ))?;
    let rows = stmt.query_map(params![credit_id], map_history)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(to_history(row?)?);
    }
    Ok(data)
}

/// Sum of `returned` rows; the source of truth for the derived columns.
pub fn returned_total(conn: &Connection, side: CreditSide, credit_id: i64) -> Result<Decimal> {
    let mut stmt = conn.prepare(&format!(
        "SELECT amount FROM {} WHERE credit_id=?1 AND type='returned'",
        side.history_table()
    ))?;
    let rows = stmt.query_map(params![credit_id], |r| r.get::<_, String>(0))?;
    let mut total = Decimal::ZERO;
    for row in rows {
        total += stored_amount(&row?)?;
    }
    Ok(total)
}

pub fn delete_history_by_credit(
    conn: &Connection,
    side: CreditSide,
    credit_id: i64,
) -> Result<usize> {
    let n = conn.execute(
        &format!("DELETE FROM {} WHERE credit_id=?1", side.history_table()),
        params![credit_id],
    )?;
    Ok(n)
}

/// Whether any entry on either side pins this card as its initial payment card.
pub fn any_entry_uses_card(conn: &Connection, user_id: i64, card_id: i64) -> Result<bool> {
    for side in [CreditSide::Lent, CreditSide::Received] {
        let hit: Option<i64> = conn
            .query_row(
                &format!(
                    "SELECT id FROM {} WHERE user_id=?1 AND initial_card_id=?2 LIMIT 1",
                    side.entry_table()
                ),
                params![user_id, card_id],
                |r| r.get(0),
            )
            .optional()?;
        if hit.is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}
