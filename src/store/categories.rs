// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{LedgerError, Result};
use crate::models::{Category, TxnType};

fn map_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, String, String)> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?))
}

fn to_category(raw: (i64, String, String)) -> Result<Category> {
    let (id, name, kind) = raw;
    let kind = TxnType::parse(&kind)
        .ok_or_else(|| LedgerError::validation(format!("unknown category type '{}'", kind)))?;
    Ok(Category { id, name, kind })
}

pub fn insert(conn: &Connection, user_id: i64, name: &str, kind: TxnType) -> Result<i64> {
    if exists(conn, user_id, name, kind)? {
        return Err(LedgerError::validation(format!(
            "category '{}' ({}) already exists",
            name, kind
        )));
    }
    conn.execute(
        "INSERT INTO categories(user_id, name, type) VALUES (?1, ?2, ?3)",
        params![user_id, name, kind.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn exists(conn: &Connection, user_id: i64, name: &str, kind: TxnType) -> Result<bool> {
    let hit: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE user_id=?1 AND name=?2 AND type=?3",
            params![user_id, name, kind.as_str()],
            |r| r.get(0),
        )
        .optional()?;
    Ok(hit.is_some())
}

pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Option<Category>> {
    let raw = conn
        .query_row(
            "SELECT id, name, type FROM categories WHERE user_id=?1 AND id=?2",
            params![user_id, id],
            map_row,
        )
        .optional()?;
    raw.map(to_category).transpose()
}

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<Category>> {
    let mut stmt = conn
        .prepare("SELECT id, name, type FROM categories WHERE user_id=?1 ORDER BY type, name")?;
    let rows = stmt.query_map(params![user_id], map_row)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(to_category(row?)?);
    }
    Ok(data)
}

/// Row rename only; rewriting referencing transactions is the ledger's job.
pub fn rename_row(conn: &Connection, user_id: i64, id: i64, new_name: &str) -> Result<()> {
    let n = conn.execute(
        "UPDATE categories SET name=?1 WHERE user_id=?2 AND id=?3",
        params![new_name, user_id, id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("category", id));
    }
    Ok(())
}

pub fn delete_row(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM categories WHERE user_id=?1 AND id=?2",
        params![user_id, id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("category", id));
    }
    Ok(())
}
