// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Pocketledger", "pocketledger"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("pocketledger.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// Money columns are TEXT holding exact decimal strings, parsed with
/// rust_decimal at the boundary. Never floats.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS profiles(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        email TEXT,
        theme_setting TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        UNIQUE(user_id, name, type),
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS cards(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        card_name TEXT NOT NULL,
        card_number TEXT NOT NULL,
        expiry_date TEXT NOT NULL,
        card_type TEXT NOT NULL,
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );

    -- The credit_* columns link a transaction back to the credit movement that
    -- generated it; at most one link group is populated per row.
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        note TEXT,
        payment_method TEXT,
        card_id INTEGER,
        credit_id INTEGER,
        credit_history_id INTEGER,
        credit_received_id INTEGER,
        credit_received_history_id INTEGER,
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_credit ON transactions(credit_id);
    CREATE INDEX IF NOT EXISTS idx_transactions_credit_received
        ON transactions(credit_received_id);

    CREATE TABLE IF NOT EXISTS credit_entries(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        person_name TEXT NOT NULL,
        amount TEXT NOT NULL,
        due_date TEXT NOT NULL,
        given_date TEXT NOT NULL,
        returned_amount TEXT NOT NULL DEFAULT '0',
        status TEXT NOT NULL DEFAULT 'active'
            CHECK(status IN ('active','partially_returned','fully_returned')),
        initial_payment_method TEXT NOT NULL,
        initial_card_id INTEGER,
        initial_note TEXT,
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS credit_history(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        credit_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('given','returned')),
        payment_method TEXT NOT NULL,
        card_id INTEGER,
        note TEXT,
        FOREIGN KEY(credit_id) REFERENCES credit_entries(id)
    );

    -- Mirror of credit_entries for money the user owes. given_date is the date
    -- the credit was received; history rows are repayments only.
    CREATE TABLE IF NOT EXISTS credit_received(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        person_name TEXT NOT NULL,
        amount TEXT NOT NULL,
        due_date TEXT NOT NULL,
        given_date TEXT NOT NULL,
        returned_amount TEXT NOT NULL DEFAULT '0',
        status TEXT NOT NULL DEFAULT 'active'
            CHECK(status IN ('active','partially_returned','fully_returned')),
        initial_payment_method TEXT NOT NULL,
        initial_card_id INTEGER,
        initial_note TEXT,
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS credit_received_history(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        credit_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('given','returned')),
        payment_method TEXT NOT NULL,
        card_id INTEGER,
        note TEXT,
        FOREIGN KEY(credit_id) REFERENCES credit_received(id)
    );
    "#,
    )?;
    Ok(())
}
