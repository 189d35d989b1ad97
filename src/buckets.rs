// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reconciles planned targets against the ledger, bucket by bucket.
//!
//! Account buckets (main account, meal card) track money actually moving
//! through an account: opening balance plus inflows minus outflows, and how
//! much of the plan the outflows have eaten. Goal buckets (leisure, shit
//! money, savings, buffer, crypto) compare a combined distribution target
//! with the matching category total. Amounts are cent-rounded at every step.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate;
use crate::distribution;
use crate::models::{Account, AccountBalance, AccountType, Month, Movement, account_of_type};
use crate::taxonomy::{Category, ExpenseCategory, MovementKind, TransferCategory};
use crate::utils::round_cents;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccountBucket {
    pub opening: Decimal,
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub current: Decimal,
    pub plan: Decimal,
    pub remaining_plan: Decimal,
    pub food_spent: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalBucket {
    pub plan: Decimal,
    pub actual: Decimal,
    pub remaining: Decimal,
}

impl GoalBucket {
    fn new(plan: Decimal, actual: Decimal) -> GoalBucket {
        let plan = round_cents(plan);
        let actual = round_cents(actual);
        GoalBucket {
            plan,
            actual,
            remaining: round_cents(plan - actual),
        }
    }
}

/// Core and shit crypto positions folded into one bucket, with the
/// sub-breakdowns kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CryptoBucket {
    pub plan: Decimal,
    pub actual: Decimal,
    pub remaining: Decimal,
    pub core: GoalBucket,
    pub shit: GoalBucket,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSummary {
    pub current: AccountBucket,
    pub meal_card: AccountBucket,
    pub leisure: GoalBucket,
    pub shit_money: GoalBucket,
    pub savings: GoalBucket,
    pub buffer: GoalBucket,
    pub crypto: CryptoBucket,
}

pub fn build(
    month: &Month,
    movements: &[Movement],
    accounts: &[Account],
    balances: &[AccountBalance],
) -> BucketSummary {
    let dist = distribution::compute(month);
    let expenses = aggregate::actual_expenses(movements);
    let transfers = aggregate::actual_transfers(movements);

    let current = account_bucket(
        account_of_type(accounts, AccountType::Current),
        balances,
        movements,
        dist.available_cash,
    );
    let meal_card = account_bucket(
        account_of_type(accounts, AccountType::MealCard),
        balances,
        movements,
        dist.meal_card_budget,
    );

    let core = GoalBucket::new(
        dist.combined.crypto_core,
        transfers[&TransferCategory::CryptoCore],
    );
    let shit = GoalBucket::new(
        month.planned_crypto_shit,
        transfers[&TransferCategory::CryptoShit],
    );
    let crypto_plan = round_cents(core.plan + shit.plan);
    let crypto_actual = round_cents(core.actual + shit.actual);
    let crypto = CryptoBucket {
        plan: crypto_plan,
        actual: crypto_actual,
        remaining: round_cents(crypto_plan - crypto_actual),
        core,
        shit,
    };

    BucketSummary {
        current,
        meal_card,
        leisure: GoalBucket::new(dist.combined.leisure, expenses[&ExpenseCategory::Leisure]),
        shit_money: GoalBucket::new(
            dist.combined.shit_money,
            expenses[&ExpenseCategory::ShitMoney],
        ),
        savings: GoalBucket::new(dist.combined.savings, transfers[&TransferCategory::Savings]),
        buffer: GoalBucket::new(dist.combined.buffer, transfers[&TransferCategory::Buffer]),
        crypto,
    }
}

fn account_bucket(
    account: Option<&Account>,
    balances: &[AccountBalance],
    movements: &[Movement],
    plan: Decimal,
) -> AccountBucket {
    let plan = round_cents(plan);
    let Some(account) = account else {
        return AccountBucket {
            opening: Decimal::ZERO,
            inflow: Decimal::ZERO,
            outflow: Decimal::ZERO,
            current: Decimal::ZERO,
            plan,
            remaining_plan: plan,
            food_spent: Decimal::ZERO,
        };
    };

    let opening = balances
        .iter()
        .find(|b| b.account_id == account.id)
        .map(|b| b.opening)
        .unwrap_or(Decimal::ZERO);

    let mut inflow = Decimal::ZERO;
    let mut outflow = Decimal::ZERO;
    let mut food_spent = Decimal::ZERO;
    for mv in movements {
        match mv.kind() {
            MovementKind::Income => {
                if mv.to_account == Some(account.id) {
                    inflow += mv.amount;
                }
            }
            MovementKind::Expense => {
                if mv.from_account == Some(account.id) {
                    outflow += mv.amount;
                    if mv.category == Category::Expense(ExpenseCategory::Food) {
                        food_spent += mv.amount;
                    }
                }
            }
            MovementKind::Transfer => {
                if mv.to_account == Some(account.id) {
                    inflow += mv.amount;
                }
                if mv.from_account == Some(account.id) {
                    outflow += mv.amount;
                }
            }
        }
    }

    let opening = round_cents(opening);
    let inflow = round_cents(inflow);
    let outflow = round_cents(outflow);
    AccountBucket {
        opening,
        inflow,
        outflow,
        current: round_cents(opening + inflow - outflow),
        plan,
        remaining_plan: round_cents(plan - outflow),
        food_spent: round_cents(food_spent),
    }
}
