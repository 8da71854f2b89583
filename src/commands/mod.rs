// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod profiles;
pub mod cards;
pub mod categories;
pub mod transactions;
pub mod credit;
pub mod balances;
pub mod exporter;
pub mod doctor;
