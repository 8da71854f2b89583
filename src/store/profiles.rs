// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{LedgerError, Result};
use crate::models::Profile;

pub fn insert(conn: &Connection, name: &str, email: Option<&str>) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM profiles WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Err(LedgerError::validation(format!(
            "profile '{}' already exists",
            name
        )));
    }
    conn.execute(
        "INSERT INTO profiles(name, email) VALUES (?1, ?2)",
        params![name, email],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<Profile>> {
    let p = conn
        .query_row(
            "SELECT id, name, email, theme_setting FROM profiles WHERE id=?1",
            params![id],
            |r| {
                Ok(Profile {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    email: r.get(2)?,
                    theme_setting: r.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(p)
}

pub fn id_for_name(conn: &Connection, name: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM profiles WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn list(conn: &Connection) -> Result<Vec<Profile>> {
    let mut stmt =
        conn.prepare("SELECT id, name, email, theme_setting FROM profiles ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Profile {
            id: r.get(0)?,
            name: r.get(1)?,
            email: r.get(2)?,
            theme_setting: r.get(3)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

pub fn set_theme(conn: &Connection, id: i64, theme: &str) -> Result<()> {
    let n = conn.execute(
        "UPDATE profiles SET theme_setting=?1 WHERE id=?2",
        params![theme, id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("profile", id));
    }
    Ok(())
}
