// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Secondary dashboard metrics: planned and actual totals, cash flow, and
//! the share/split percentages. Shares divide by total income and report 0
//! when there is no income yet.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate;
use crate::distribution;
use crate::models::{Month, Movement};
use crate::taxonomy::{ExpenseCategory, TransferCategory};
use crate::utils::{ratio_pct, round_cents};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub planned_income: Decimal,
    pub planned_outflows: Decimal,
    pub planned_available: Decimal,
    pub actual_income: Decimal,
    pub actual_expenses: Decimal,
    pub actual_transfers: Decimal,
    pub actual_outflows: Decimal,
    pub cash_flow: Decimal,
    pub essential_share_pct: Decimal,
    pub fun_share_pct: Decimal,
    pub crypto_share_pct: Decimal,
    pub fixed_spend: Decimal,
    pub variable_spend: Decimal,
    pub savings_progress_pct: Decimal,
}

pub fn month_summary(month: &Month, movements: &[Movement]) -> MonthSummary {
    let dist = distribution::compute(month);
    let income = aggregate::actual_income(movements);
    let expenses = aggregate::actual_expenses(movements);
    let transfers = aggregate::actual_transfers(movements);

    let planned_income = dist.total_income;
    let planned_outflows = round_cents(
        aggregate::total(&aggregate::planned_expenses(month))
            + aggregate::total(&aggregate::planned_transfers(month)),
    );
    // Unlike the distribution's available pool this is not floored; a
    // negative value means the plan itself overspends.
    let planned_available = round_cents(planned_income - planned_outflows);

    let actual_income = aggregate::total(&income);
    let actual_expenses = aggregate::total(&expenses);
    let actual_transfers = aggregate::total(&transfers);
    let actual_outflows = round_cents(actual_expenses + actual_transfers);

    // Transfers shuffle money between own accounts, so they are not part of
    // the income-minus-spend flow.
    let cash_flow = round_cents(actual_income - actual_expenses);

    let essential = aggregate::total_of(&expenses, &ExpenseCategory::ESSENTIAL);
    let fun = aggregate::total_of(&expenses, &ExpenseCategory::FUN);
    let crypto = aggregate::total_of(&transfers, &TransferCategory::CRYPTO);
    let fixed_spend = aggregate::total_of(&expenses, &ExpenseCategory::FIXED);

    MonthSummary {
        planned_income,
        planned_outflows,
        planned_available,
        actual_income,
        actual_expenses,
        actual_transfers,
        actual_outflows,
        cash_flow,
        essential_share_pct: ratio_pct(essential, dist.total_income),
        fun_share_pct: ratio_pct(fun, dist.total_income),
        crypto_share_pct: ratio_pct(crypto, dist.total_income),
        fixed_spend,
        variable_spend: round_cents(actual_expenses - fixed_spend),
        savings_progress_pct: ratio_pct(
            transfers[&TransferCategory::Savings],
            dist.combined.savings,
        ),
    }
}
