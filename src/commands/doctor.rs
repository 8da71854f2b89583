// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only audit of the ledger invariants. Reports, never repairs.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::CreditStatus;
use crate::store::credit::{self, CreditSide};
use crate::utils::{active_profile, pretty_table};

pub fn handle(conn: &Connection) -> Result<()> {
    let user_id = active_profile(conn)?;
    let mut rows = Vec::new();

    // 1) Mirror transactions pointing at a missing credit entry
    let mut stmt = conn.prepare(
        "SELECT id, credit_id FROM transactions
         WHERE user_id=?1 AND credit_id IS NOT NULL
           AND credit_id NOT IN (SELECT id FROM credit_entries WHERE user_id=?1)",
    )?;
    let mut cur = stmt.query([user_id])?;
    while let Some(r) = cur.next()? {
        let (txn, credit): (i64, i64) = (r.get(0)?, r.get(1)?);
        rows.push(vec![
            "orphan_credit_txn".into(),
            format!("transaction {} -> credit {}", txn, credit),
        ]);
    }
    let mut stmt = conn.prepare(
        "SELECT id, credit_received_id FROM transactions
         WHERE user_id=?1 AND credit_received_id IS NOT NULL
           AND credit_received_id NOT IN (SELECT id FROM credit_received WHERE user_id=?1)",
    )?;
    let mut cur = stmt.query([user_id])?;
    while let Some(r) = cur.next()? {
        let (txn, credit): (i64, i64) = (r.get(0)?, r.get(1)?);
        rows.push(vec![
            "orphan_credit_received_txn".into(),
            format!("transaction {} -> credit received {}", txn, credit),
        ]);
    }

    // 2) History items without their mirror transaction
    let mut stmt = conn.prepare(
        "SELECT h.id FROM credit_history h
         JOIN credit_entries e ON e.id=h.credit_id AND e.user_id=?1
         WHERE h.id NOT IN
           (SELECT credit_history_id FROM transactions
            WHERE user_id=?1 AND credit_history_id IS NOT NULL)",
    )?;
    let mut cur = stmt.query([user_id])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec![
            "history_without_mirror".into(),
            format!("credit_history {}", id),
        ]);
    }
    let mut stmt = conn.prepare(
        "SELECT h.id FROM credit_received_history h
         JOIN credit_received e ON e.id=h.credit_id AND e.user_id=?1
         WHERE h.id NOT IN
           (SELECT credit_received_history_id FROM transactions
            WHERE user_id=?1 AND credit_received_history_id IS NOT NULL)",
    )?;
    let mut cur = stmt.query([user_id])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec![
            "history_without_mirror".into(),
            format!("credit_received_history {}", id),
        ]);
    }

    // 3) Stored derived columns drifting from the history sum
    for side in [CreditSide::Lent, CreditSide::Received] {
        for e in credit::list_entries(conn, user_id, side)? {
            let returned = credit::returned_total(conn, side, e.id)?;
            if returned != e.returned_amount {
                rows.push(vec![
                    "returned_amount_drift".into(),
                    format!(
                        "{} {}: stored {} vs history {}",
                        side.noun(),
                        e.id,
                        e.returned_amount,
                        returned
                    ),
                ]);
            }
            let derived = CreditStatus::derive(e.amount, returned);
            if derived != e.status {
                rows.push(vec![
                    "status_drift".into(),
                    format!("{} {}: stored {} vs derived {}", side.noun(), e.id, e.status, derived),
                ]);
            }
        }
    }

    // 4) Stale card references (these expenses are excluded from balances)
    let mut stmt = conn.prepare(
        "SELECT id, card_id FROM transactions
         WHERE user_id=?1 AND card_id IS NOT NULL
           AND card_id NOT IN (SELECT id FROM cards WHERE user_id=?1)",
    )?;
    let mut cur = stmt.query([user_id])?;
    while let Some(r) = cur.next()? {
        let (txn, card): (i64, i64) = (r.get(0)?, r.get(1)?);
        rows.push(vec![
            "stale_card_ref".into(),
            format!("transaction {} -> card {}", txn, card),
        ]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
