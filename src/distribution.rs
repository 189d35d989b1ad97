// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Splits a month's pay across the savings/crypto/fun/buffer buckets.
//!
//! Regular months distribute `base income + extraordinary income - fixed -
//! food` under the base percentages. In June and December an applied subsidy
//! is distributed under its own percentage schedule instead, and the
//! extraordinary figure is excluded from the base pool (payday folds it into
//! the subsidy for those months). Every multiplication is rounded to the
//! cent before targets are combined, so the combined sum may drift a cent
//! or two from the unrounded total.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Month;
use crate::utils::round_cents;

/// Target amounts for the five distributed buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketTargets {
    pub savings: Decimal,
    pub crypto_core: Decimal,
    pub shit_money: Decimal,
    pub leisure: Decimal,
    pub buffer: Decimal,
}

impl BucketTargets {
    pub const ZERO: BucketTargets = BucketTargets {
        savings: Decimal::ZERO,
        crypto_core: Decimal::ZERO,
        shit_money: Decimal::ZERO,
        leisure: Decimal::ZERO,
        buffer: Decimal::ZERO,
    };

    fn plus(&self, other: &BucketTargets) -> BucketTargets {
        BucketTargets {
            savings: round_cents(self.savings + other.savings),
            crypto_core: round_cents(self.crypto_core + other.crypto_core),
            shit_money: round_cents(self.shit_money + other.shit_money),
            leisure: round_cents(self.leisure + other.leisure),
            buffer: round_cents(self.buffer + other.buffer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub total_income: Decimal,
    pub base_pool: Decimal,
    pub base_available: Decimal,
    pub available_cash: Decimal,
    pub meal_card_budget: Decimal,
    pub subsidy_month: bool,
    pub base: BucketTargets,
    pub subsidy: BucketTargets,
    pub combined: BucketTargets,
}

/// June and December carry the twice-yearly subsidy payout.
pub fn is_subsidy_month(m: &Month) -> bool {
    (m.month == 6 || m.month == 12) && m.subsidy_applied && m.subsidy_amount > Decimal::ZERO
}

pub fn compute(m: &Month) -> Distribution {
    let subsidy_income = if m.subsidy_applied {
        m.subsidy_amount
    } else {
        Decimal::ZERO
    };
    let total_income =
        round_cents(m.income_base + m.income_meal_card + m.income_extra + subsidy_income);

    let subsidy_month = is_subsidy_month(m);
    let base_pool = round_cents(if subsidy_month {
        m.income_base
    } else {
        m.income_base + m.income_extra
    });

    // Fixed and food come pre-resolved by normalization (actuals falling
    // back to planned). Never distribute a negative pool.
    let spend = m.actual_fixed + m.actual_food;
    let base_available = round_cents((base_pool - spend).max(Decimal::ZERO));

    let base = BucketTargets {
        savings: round_cents(base_available * m.dist_savings),
        crypto_core: round_cents(base_available * m.dist_core),
        shit_money: round_cents(base_available * m.dist_shit),
        leisure: round_cents(base_available * m.dist_fun),
        buffer: round_cents(base_available * m.dist_buffer),
    };

    let subsidy = if subsidy_month {
        BucketTargets {
            savings: round_cents(m.subsidy_amount * m.sub_dist_savings),
            crypto_core: round_cents(m.subsidy_amount * m.sub_dist_core),
            shit_money: round_cents(m.subsidy_amount * m.sub_dist_shit),
            leisure: round_cents(m.subsidy_amount * m.sub_dist_fun),
            buffer: Decimal::ZERO,
        }
    } else {
        BucketTargets::ZERO
    };

    let combined = base.plus(&subsidy);

    let available_cash = round_cents(if subsidy_month {
        base_available + m.subsidy_amount
    } else {
        base_available
    });

    Distribution {
        total_income,
        base_pool,
        base_available,
        available_cash,
        meal_card_budget: round_cents(m.income_meal_card),
        subsidy_month,
        base,
        subsidy,
        combined,
    }
}

/// Recomputes the split and writes it back onto the month: combined targets
/// into the planned bucket fields, available cash, and the resolved subsidy
/// flag. Running it again on the result changes nothing.
pub fn apply(m: &mut Month) -> Distribution {
    let d = compute(m);
    m.planned_savings = d.combined.savings;
    m.planned_crypto_core = d.combined.crypto_core;
    m.planned_shit_money = d.combined.shit_money;
    m.planned_leisure = d.combined.leisure;
    m.planned_buffer = d.combined.buffer;
    m.available_cash = d.available_cash;
    m.subsidy_applied = d.subsidy_month;
    d
}
