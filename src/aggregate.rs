// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reduces a month's movements into per-category totals.
//!
//! Every map carries the full key set of its kind, zero-initialized, so
//! callers can render a `0.00` row for a category with no movements without
//! probing for missing keys.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{Month, Movement};
use crate::taxonomy::{Category, ExpenseCategory, IncomeCategory, TransferCategory};
use crate::utils::round_cents;

pub fn actual_income(movements: &[Movement]) -> BTreeMap<IncomeCategory, Decimal> {
    let mut out: BTreeMap<IncomeCategory, Decimal> = IncomeCategory::ALL
        .iter()
        .map(|c| (*c, Decimal::ZERO))
        .collect();
    for mv in movements {
        if let Category::Income(c) = mv.category {
            if let Some(v) = out.get_mut(&c) {
                *v += mv.amount;
            }
        }
    }
    round_values(&mut out);
    out
}

pub fn actual_expenses(movements: &[Movement]) -> BTreeMap<ExpenseCategory, Decimal> {
    let mut out: BTreeMap<ExpenseCategory, Decimal> = ExpenseCategory::ALL
        .iter()
        .map(|c| (*c, Decimal::ZERO))
        .collect();
    for mv in movements {
        if let Category::Expense(c) = mv.category {
            if let Some(v) = out.get_mut(&c) {
                *v += mv.amount;
            }
        }
    }
    round_values(&mut out);
    out
}

pub fn actual_transfers(movements: &[Movement]) -> BTreeMap<TransferCategory, Decimal> {
    let mut out: BTreeMap<TransferCategory, Decimal> = TransferCategory::ALL
        .iter()
        .map(|c| (*c, Decimal::ZERO))
        .collect();
    for mv in movements {
        if let Category::Transfer(c) = mv.category {
            if let Some(v) = out.get_mut(&c) {
                *v += mv.amount;
            }
        }
    }
    round_values(&mut out);
    out
}

/// Planned incomes in the same shape as [`actual_income`]. The subsidy only
/// counts when applied; credit-card funding has no planned month figure.
pub fn planned_income(m: &Month) -> BTreeMap<IncomeCategory, Decimal> {
    IncomeCategory::ALL
        .iter()
        .map(|c| {
            let v = match c {
                IncomeCategory::Salary => m.income_base,
                IncomeCategory::Subsidy => {
                    if m.subsidy_applied {
                        m.subsidy_amount
                    } else {
                        Decimal::ZERO
                    }
                }
                IncomeCategory::MealCard => m.income_meal_card,
                IncomeCategory::CreditCard => Decimal::ZERO,
                IncomeCategory::Extraordinary => m.income_extra,
            };
            (*c, round_cents(v))
        })
        .collect()
}

pub fn planned_expenses(m: &Month) -> BTreeMap<ExpenseCategory, Decimal> {
    ExpenseCategory::ALL
        .iter()
        .map(|c| (*c, round_cents(m.planned_expense(*c))))
        .collect()
}

pub fn planned_transfers(m: &Month) -> BTreeMap<TransferCategory, Decimal> {
    TransferCategory::ALL
        .iter()
        .map(|c| (*c, round_cents(m.planned_transfer(*c))))
        .collect()
}

/// Cent-rounded sum of a category map.
pub fn total<K: Ord>(map: &BTreeMap<K, Decimal>) -> Decimal {
    round_cents(map.values().copied().sum())
}

/// Cent-rounded sum over a subset of keys, for the grouped shares.
pub fn total_of<K: Ord + Copy>(map: &BTreeMap<K, Decimal>, keys: &[K]) -> Decimal {
    round_cents(
        keys.iter()
            .filter_map(|k| map.get(k))
            .copied()
            .sum::<Decimal>(),
    )
}

fn round_values<K: Ord>(map: &mut BTreeMap<K, Decimal>) {
    for v in map.values_mut() {
        *v = round_cents(*v);
    }
}
