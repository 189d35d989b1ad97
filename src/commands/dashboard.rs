// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;

use crate::buckets;
use crate::distribution;
use crate::suggest;
use crate::summary;
use crate::utils::{
    accounts_all, balances_for_month, fmt_money, get_currency, maybe_print_json,
    month_arg_or_current, movements_for_month, pretty_table, require_month,
};

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (year, month) = month_arg_or_current(sub)?;
    let m = require_month(conn, year, month)?;
    let movements = movements_for_month(conn, year, month)?;
    let accounts = accounts_all(conn)?;
    let balances = balances_for_month(conn, year, month)?;

    let d = distribution::compute(&m);
    let s = summary::month_summary(&m, &movements);
    let b = buckets::build(&m, &movements, &accounts, &balances);
    let ccy = get_currency(conn)?;
    let today = chrono::Local::now().date_naive();
    let suggestions = suggest::generate(&m, &b, today, &ccy);

    if json_flag || jsonl_flag {
        maybe_print_json(
            json_flag,
            jsonl_flag,
            &json!({
                "month": m.ym(),
                "closed": m.closed,
                "distribution": d,
                "summary": s,
                "buckets": b,
                "suggestions": suggestions,
            }),
        )?;
        return Ok(());
    }

    let money = |v: &Decimal| fmt_money(v, &ccy);

    println!(
        "Dashboard {}{}",
        m.ym(),
        if m.closed { " (closed)" } else { "" }
    );
    println!(
        "Income {} | available cash {} | meal card {}",
        money(&d.total_income),
        money(&d.available_cash),
        money(&d.meal_card_budget)
    );
    println!(
        "Planned outflows {} | planned available {} | cash flow {}",
        money(&s.planned_outflows),
        money(&s.planned_available),
        money(&s.cash_flow)
    );

    let rows = vec![
        vec![
            "Current cash".to_string(),
            money(&b.current.plan),
            money(&b.current.current),
            money(&b.current.remaining_plan),
        ],
        vec![
            "Meal card".to_string(),
            money(&b.meal_card.plan),
            money(&b.meal_card.current),
            money(&b.meal_card.remaining_plan),
        ],
        vec![
            "Leisure".to_string(),
            money(&b.leisure.plan),
            money(&b.leisure.actual),
            money(&b.leisure.remaining),
        ],
        vec![
            "Shit money".to_string(),
            money(&b.shit_money.plan),
            money(&b.shit_money.actual),
            money(&b.shit_money.remaining),
        ],
        vec![
            "Savings".to_string(),
            money(&b.savings.plan),
            money(&b.savings.actual),
            money(&b.savings.remaining),
        ],
        vec![
            "Buffer".to_string(),
            money(&b.buffer.plan),
            money(&b.buffer.actual),
            money(&b.buffer.remaining),
        ],
        vec![
            "Crypto core".to_string(),
            money(&b.crypto.core.plan),
            money(&b.crypto.core.actual),
            money(&b.crypto.core.remaining),
        ],
        vec![
            "Crypto shit".to_string(),
            money(&b.crypto.shit.plan),
            money(&b.crypto.shit.actual),
            money(&b.crypto.shit.remaining),
        ],
        vec![
            "Crypto total".to_string(),
            money(&b.crypto.plan),
            money(&b.crypto.actual),
            money(&b.crypto.remaining),
        ],
    ];
    println!(
        "{}",
        pretty_table(&["Bucket", "Plan", "Actual", "Remaining"], rows)
    );

    if b.meal_card.food_spent > Decimal::ZERO {
        println!("Food on meal card so far: {}", money(&b.meal_card.food_spent));
    }
    println!(
        "Essential {}% | fun {}% | crypto {}% of income | savings progress {}%",
        s.essential_share_pct, s.fun_share_pct, s.crypto_share_pct, s.savings_progress_pct
    );
    for sug in &suggestions {
        println!("{} {}", sug.tone.marker(), sug.message);
    }
    Ok(())
}
