// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rule-based nudges derived from the reconciled buckets and the calendar.
//!
//! Day-gated rules use today's day-of-month only when `today` falls inside
//! the month under evaluation; any other month counts as fully elapsed, so
//! browsing history does not raise pacing warnings.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::buckets::BucketSummary;
use crate::models::Month;
use crate::utils::{days_in_month, fmt_money, month_end, round_cents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Info,
    Warning,
    Success,
}

impl Tone {
    pub fn marker(&self) -> &'static str {
        match self {
            Tone::Info => "ℹ️",
            Tone::Warning => "⚠️",
            Tone::Success => "✅",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub id: &'static str,
    pub tone: Tone,
    pub message: String,
}

pub fn generate(
    month: &Month,
    buckets: &BucketSummary,
    today: NaiveDate,
    ccy: &str,
) -> Vec<Suggestion> {
    let days = days_in_month(month.year, month.month);
    let in_month = today.year() == month.year && today.month() == month.month;
    let day = if in_month { today.day() } else { days };
    let month_over = month_end(month.year, month.month)
        .map(|last| today > last)
        .unwrap_or(true);

    let mut out = Vec::new();

    let leisure = &buckets.leisure;
    if leisure.plan > Decimal::ZERO
        && leisure.actual / leisure.plan >= Decimal::new(8, 1)
        && day <= days / 2
    {
        out.push(Suggestion {
            id: "leisure-brake",
            tone: Tone::Warning,
            message: format!(
                "Leisure spend is already {:.0}% of plan before mid-month. Ease off for a few days.",
                leisure.actual / leisure.plan * Decimal::ONE_HUNDRED
            ),
        });
    }

    let savings = &buckets.savings;
    if day >= 20
        && savings.plan > Decimal::ZERO
        && savings.actual / savings.plan < Decimal::new(5, 1)
    {
        let shortfall = round_cents(savings.plan * Decimal::new(5, 1) - savings.actual);
        out.push(Suggestion {
            id: "savings-transfer",
            tone: Tone::Warning,
            message: format!(
                "Savings are behind: transfer {} to reach half of this month's target.",
                fmt_money(&shortfall, ccy)
            ),
        });
    }

    if buckets.meal_card.plan > Decimal::ZERO
        && buckets.meal_card.remaining_plan <= Decimal::ZERO
        && !month_over
    {
        out.push(Suggestion {
            id: "meal-card-empty",
            tone: Tone::Warning,
            message: "Meal card is used up. Pay food from the main account and trim leisure until payday."
                .to_string(),
        });
    }

    let shit = &buckets.shit_money;
    if shit.plan > Decimal::ZERO && shit.actual >= shit.plan {
        out.push(Suggestion {
            id: "risky-budget-done",
            tone: Tone::Info,
            message: "Shit money is fully spent. Anything more comes out of other buckets."
                .to_string(),
        });
    }

    if out.is_empty() {
        out.push(Suggestion {
            id: "on-track",
            tone: Tone::Success,
            message: "All buckets look on track. Keep it up.".to_string(),
        });
    }
    out
}
