// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{LedgerError, Result};
use crate::models::CardDetails;

pub struct NewCard<'a> {
    pub card_name: &'a str,
    pub card_number: &'a str,
    pub expiry_date: &'a str,
    pub card_type: &'a str,
}

fn map_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<CardDetails> {
    Ok(CardDetails {
        id: r.get(0)?,
        card_name: r.get(1)?,
        card_number: r.get(2)?,
        expiry_date: r.get(3)?,
        card_type: r.get(4)?,
    })
}

pub fn insert(conn: &Connection, user_id: i64, card: &NewCard<'_>) -> Result<i64> {
    conn.execute(
        "INSERT INTO cards(user_id, card_name, card_number, expiry_date, card_type)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            card.card_name,
            card.card_number,
            card.expiry_date,
            card.card_type
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Option<CardDetails>> {
    let c = conn
        .query_row(
            "SELECT id, card_name, card_number, expiry_date, card_type
             FROM cards WHERE user_id=?1 AND id=?2",
            params![user_id, id],
            map_row,
        )
        .optional()?;
    Ok(c)
}

pub fn id_for_name(conn: &Connection, user_id: i64, name: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM cards WHERE user_id=?1 AND card_name=?2",
            params![user_id, name],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<CardDetails>> {
    let mut stmt = conn.prepare(
        "SELECT id, card_name, card_number, expiry_date, card_type
         FROM cards WHERE user_id=?1 ORDER BY card_name",
    )?;
    let rows = stmt.query_map(params![user_id], map_row)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

pub fn update(conn: &Connection, user_id: i64, id: i64, card: &NewCard<'_>) -> Result<()> {
    let n = conn.execute(
        "UPDATE cards SET card_name=?1, card_number=?2, expiry_date=?3, card_type=?4
         WHERE user_id=?5 AND id=?6",
        params![
            card.card_name,
            card.card_number,
            card.expiry_date,
            card.card_type,
            user_id,
            id
        ],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("card", id));
    }
    Ok(())
}

/// Row delete only; the in-use guard lives in the ledger layer.
pub fn delete_row(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM cards WHERE user_id=?1 AND id=?2",
        params![user_id, id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("card", id));
    }
    Ok(())
}
