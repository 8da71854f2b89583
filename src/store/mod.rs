// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Thin entity services: per-table CRUD with explicit user scoping and
//! TEXT-to-Decimal coercion. No ledger rules live here.

pub mod cards;
pub mod categories;
pub mod credit;
pub mod profiles;
pub mod transactions;
