// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory mirror of one user's full dataset, reloaded wholesale after each
//! mutation. Owned by the session that loaded it; never shared.

use std::collections::BTreeMap;

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::balance::{self, Source};
use crate::error::Result;
use crate::models::{CardDetails, Category, CreditEntry, Transaction};
use crate::store::credit::CreditSide;
use crate::store::{cards, categories, credit, transactions};

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub user_id: i64,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub cards: Vec<CardDetails>,
    pub credits: Vec<CreditEntry>,
    pub credits_received: Vec<CreditEntry>,
}

impl Snapshot {
    pub fn load(conn: &Connection, user_id: i64) -> Result<Self> {
        Ok(Snapshot {
            user_id,
            transactions: transactions::list(conn, user_id)?,
            categories: categories::list(conn, user_id)?,
            cards: cards::list(conn, user_id)?,
            credits: credit::list_entries(conn, user_id, CreditSide::Lent)?,
            credits_received: credit::list_entries(conn, user_id, CreditSide::Received)?,
        })
    }

    pub fn refresh(&mut self, conn: &Connection) -> Result<()> {
        *self = Snapshot::load(conn, self.user_id)?;
        Ok(())
    }

    /// Derived, never cached: computed from this snapshot's own data.
    pub fn balances(&self) -> BTreeMap<Source, Decimal> {
        balance::compute(&self.transactions, &self.cards)
    }

    pub fn card_name(&self, id: i64) -> Option<&str> {
        self.cards
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.card_name.as_str())
    }
}
