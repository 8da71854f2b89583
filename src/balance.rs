// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance derivation: a pure projection from the current transactions and
//! cards to one signed running total per payment source. Recomputed in full on
//! every read, never persisted, and order-independent over the transactions.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::models::{CardDetails, PaymentMethod, Transaction, TxnType};

/// One balance bucket: cash or a specific card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    Cash,
    Card(i64),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Cash => f.write_str("cash"),
            Source::Card(id) => write!(f, "card:{}", id),
        }
    }
}

/// Income lands on the card when the card is known, else falls back to cash.
/// An expense only debits a bucket it can be unambiguously attributed to: a
/// known card, or cash when the payment method says cash. Expenses with a
/// stale card reference and no cash fallback touch no bucket at all.
pub fn compute(transactions: &[Transaction], cards: &[CardDetails]) -> BTreeMap<Source, Decimal> {
    let known: BTreeSet<i64> = cards.iter().map(|c| c.id).collect();

    let mut balances: BTreeMap<Source, Decimal> = BTreeMap::new();
    balances.insert(Source::Cash, Decimal::ZERO);
    for id in &known {
        balances.insert(Source::Card(*id), Decimal::ZERO);
    }

    for t in transactions {
        match t.kind {
            TxnType::Income => {
                let src = match t.card_id {
                    Some(id) if known.contains(&id) => Source::Card(id),
                    _ => Source::Cash,
                };
                *balances.entry(src).or_insert(Decimal::ZERO) += t.amount;
            }
            TxnType::Expense => {
                let src = match t.card_id {
                    Some(id) if known.contains(&id) => Some(Source::Card(id)),
                    _ if t.payment_method == Some(PaymentMethod::Cash) => Some(Source::Cash),
                    _ => None,
                };
                if let Some(src) = src {
                    *balances.entry(src).or_insert(Decimal::ZERO) -= t.amount;
                }
            }
        }
    }
    balances
}
