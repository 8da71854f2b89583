// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnType {
    Income,
    Expense,
}

impl TxnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::Income => "income",
            TxnType::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "income" => Some(TxnType::Income),
            "expense" => Some(TxnType::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditStatus {
    Active,
    PartiallyReturned,
    FullyReturned,
}

impl CreditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditStatus::Active => "active",
            CreditStatus::PartiallyReturned => "partially_returned",
            CreditStatus::FullyReturned => "fully_returned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(CreditStatus::Active),
            "partially_returned" => Some(CreditStatus::PartiallyReturned),
            "fully_returned" => Some(CreditStatus::FullyReturned),
            _ => None,
        }
    }

    /// Status is derived from the amounts, never trusted independently.
    pub fn derive(amount: Decimal, returned: Decimal) -> Self {
        if returned >= amount {
            CreditStatus::FullyReturned
        } else if returned > Decimal::ZERO {
            CreditStatus::PartiallyReturned
        } else {
            CreditStatus::Active
        }
    }
}

impl std::fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Given,
    Returned,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Given => "given",
            HistoryKind::Returned => "returned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "given" => Some(HistoryKind::Given),
            "returned" => Some(HistoryKind::Returned),
            _ => None,
        }
    }
}

impl std::fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub theme_setting: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TxnType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDetails {
    pub id: i64,
    pub card_name: String,
    pub card_number: String,
    pub expiry_date: String,
    pub card_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TxnType,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub card_id: Option<i64>,
    pub credit_id: Option<i64>,
    pub credit_history_id: Option<i64>,
    pub credit_received_id: Option<i64>,
    pub credit_received_history_id: Option<i64>,
}

impl Transaction {
    /// True when the row mirrors a credit movement and must only be removed
    /// through its entry's cascade.
    pub fn is_credit_linked(&self) -> bool {
        self.credit_id.is_some() || self.credit_received_id.is_some()
    }
}

/// One entry of peer credit. Used for both sides of the ledger: money lent
/// (credit_entries) and money owed (credit_received, where given_date is the
/// date the credit was received).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditEntry {
    pub id: i64,
    pub person_name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub given_date: NaiveDate,
    pub returned_amount: Decimal,
    pub status: CreditStatus,
    pub initial_payment_method: PaymentMethod,
    pub initial_card_id: Option<i64>,
    pub initial_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditHistoryItem {
    pub id: i64,
    pub credit_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub payment_method: PaymentMethod,
    pub card_id: Option<i64>,
    pub note: Option<String>,
}
