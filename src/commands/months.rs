// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::json;

use crate::distribution;
use crate::models::Month;
use crate::settings;
use crate::summary;
use crate::utils::{
    accounts_all, balances_for_month, ensure_open, fmt_money, fmt_ym, get_currency, insert_month,
    maybe_print_json, month_arg_or_current, month_by_ym, movements_for_month, next_month,
    parse_decimal, parse_month, pretty_table, prev_month, require_month, save_month,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("new", sub)) => new(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        Some(("close", sub)) => close(conn, sub)?,
        Some(("reopen", sub)) => reopen(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Creates a month seeded from the settings defaults, runs the distribution
/// and carries every account's closing balance forward as the opening one.
pub fn create_month(conn: &Connection, year: i32, month: u32) -> Result<Month> {
    if month_by_ym(conn, year, month)?.is_some() {
        bail!("Month {} already exists", fmt_ym(year, month));
    }

    let mut m = Month::new(year, month);
    m.income_base = settings::get_decimal(conn, "income_base")?;
    m.income_meal_card = settings::get_decimal(conn, "income_meal_card")?;
    m.income_extra = settings::get_decimal(conn, "income_extra")?;
    m.subsidy_amount = settings::get_decimal(conn, "subsidy_amount")?;
    m.fixed_expenses = settings::get_decimal(conn, "fixed_expenses")?;
    m.actual_fixed = m.fixed_expenses;
    m.planned_food = settings::get_decimal(conn, "planned_food")?;
    m.actual_food = m.planned_food;

    // Rent plan defaults to the whole fixed block until set apart.
    let rent = settings::get_decimal(conn, "planned_rent")?;
    m.planned_rent = if rent.is_zero() { m.fixed_expenses } else { rent };
    m.planned_utilities = settings::get_decimal(conn, "planned_utilities")?;
    m.planned_transport = settings::get_decimal(conn, "planned_transport")?;
    m.planned_health = settings::get_decimal(conn, "planned_health")?;
    m.planned_shopping = settings::get_decimal(conn, "planned_shopping")?;
    m.planned_subscriptions = settings::get_decimal(conn, "planned_subscriptions")?;
    m.planned_crypto_shit = settings::get_decimal(conn, "planned_crypto_shit")?;

    m.dist_core = settings::get_decimal(conn, "dist_core")?;
    m.dist_shit = settings::get_decimal(conn, "dist_shit")?;
    m.dist_savings = settings::get_decimal(conn, "dist_savings")?;
    m.dist_fun = settings::get_decimal(conn, "dist_fun")?;
    m.dist_buffer = settings::get_decimal(conn, "dist_buffer")?;
    m.sub_dist_savings = settings::get_decimal(conn, "sub_dist_savings")?;
    m.sub_dist_core = settings::get_decimal(conn, "sub_dist_core")?;
    m.sub_dist_shit = settings::get_decimal(conn, "sub_dist_shit")?;
    m.sub_dist_fun = settings::get_decimal(conn, "sub_dist_fun")?;

    distribution::apply(&mut m);
    m.id = insert_month(conn, &m)?;

    let (py, pm) = prev_month(year, month);
    let prev = balances_for_month(conn, py, pm)?;
    for acc in accounts_all(conn)? {
        let opening = prev
            .iter()
            .find(|b| b.account_id == acc.id)
            .map(|b| b.current)
            .unwrap_or(Decimal::ZERO);
        conn.execute(
            "INSERT INTO balances(account_id, year, month, opening, current)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(account_id, year, month) DO NOTHING",
            params![acc.id, year, month, opening.to_string()],
        )?;
    }
    Ok(m)
}

fn new(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = month_arg_or_current(sub)?;
    let m = create_month(conn, year, month)?;
    let ccy = get_currency(conn)?;
    println!(
        "Created month {} with available cash {}",
        m.ym(),
        fmt_money(&m.available_cash, &ccy)
    );
    Ok(())
}

#[derive(Serialize)]
pub struct MonthRow {
    pub month: String,
    pub closed: bool,
    pub total_income: String,
    pub available_cash: String,
    pub planned_savings: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare("SELECT * FROM months ORDER BY year, month")?;
    let months: Vec<Month> = stmt
        .query_map([], Month::from_row)?
        .collect::<rusqlite::Result<_>>()?;

    let data: Vec<MonthRow> = months
        .iter()
        .map(|m| {
            let d = distribution::compute(m);
            MonthRow {
                month: m.ym(),
                closed: m.closed,
                total_income: d.total_income.to_string(),
                available_cash: d.available_cash.to_string(),
                planned_savings: d.combined.savings.to_string(),
            }
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.month.clone(),
                    if r.closed { "closed".into() } else { "open".into() },
                    r.total_income.clone(),
                    r.available_cash.clone(),
                    r.planned_savings.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Status", "Income", "Available", "Savings plan"],
                rows
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (year, month) = month_arg_or_current(sub)?;
    let m = require_month(conn, year, month)?;
    let movements = movements_for_month(conn, year, month)?;
    let d = distribution::compute(&m);
    let s = summary::month_summary(&m, &movements);

    if json_flag || jsonl_flag {
        maybe_print_json(
            json_flag,
            jsonl_flag,
            &json!({"month": m, "distribution": d, "summary": s}),
        )?;
        return Ok(());
    }

    let ccy = get_currency(conn)?;
    println!("Month {}{}", m.ym(), if m.closed { " (closed)" } else { "" });

    let mut rows = vec![
        vec!["Base income".to_string(), fmt_money(&m.income_base, &ccy)],
        vec!["Meal card".to_string(), fmt_money(&m.income_meal_card, &ccy)],
        vec![
            "Extraordinary".to_string(),
            fmt_money(&m.income_extra, &ccy),
        ],
    ];
    if m.subsidy_applied {
        rows.push(vec![
            "Subsidy".to_string(),
            fmt_money(&m.subsidy_amount, &ccy),
        ]);
    }
    rows.push(vec![
        "Total income".to_string(),
        fmt_money(&d.total_income, &ccy),
    ]);
    rows.push(vec![
        "Fixed spend".to_string(),
        fmt_money(&m.actual_fixed, &ccy),
    ]);
    rows.push(vec![
        "Food spend".to_string(),
        fmt_money(&m.actual_food, &ccy),
    ]);
    rows.push(vec![
        "Base available".to_string(),
        fmt_money(&d.base_available, &ccy),
    ]);
    rows.push(vec![
        "Available cash".to_string(),
        fmt_money(&d.available_cash, &ccy),
    ]);
    rows.push(vec![
        "Meal card budget".to_string(),
        fmt_money(&d.meal_card_budget, &ccy),
    ]);
    println!("{}", pretty_table(&["Figure", "Amount"], rows));

    let target = |name: &str, base: Decimal, sub: Decimal, combined: Decimal| {
        vec![
            name.to_string(),
            fmt_money(&base, &ccy),
            fmt_money(&sub, &ccy),
            fmt_money(&combined, &ccy),
        ]
    };
    let targets = vec![
        target("Savings", d.base.savings, d.subsidy.savings, d.combined.savings),
        target(
            "Crypto core",
            d.base.crypto_core,
            d.subsidy.crypto_core,
            d.combined.crypto_core,
        ),
        target(
            "Shit money",
            d.base.shit_money,
            d.subsidy.shit_money,
            d.combined.shit_money,
        ),
        target("Leisure", d.base.leisure, d.subsidy.leisure, d.combined.leisure),
        target("Buffer", d.base.buffer, d.subsidy.buffer, d.combined.buffer),
    ];
    println!(
        "{}",
        pretty_table(&["Bucket", "Base", "Subsidy", "Combined"], targets)
    );

    println!(
        "Planned outflows {} | planned available {} | cash flow {}",
        fmt_money(&s.planned_outflows, &ccy),
        fmt_money(&s.planned_available, &ccy),
        fmt_money(&s.cash_flow, &ccy)
    );
    println!(
        "Essential {}% | fun {}% | crypto {}% of income",
        s.essential_share_pct, s.fun_share_pct, s.crypto_share_pct
    );
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = month_arg_or_current(sub)?;
    let mut m = require_month(conn, year, month)?;
    ensure_open(&m)?;

    if let Some(v) = sub.get_one::<String>("base") {
        m.income_base = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("meal-card") {
        m.income_meal_card = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("extra") {
        m.income_extra = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("fixed") {
        m.actual_fixed = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("food") {
        m.actual_food = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("subsidy") {
        m.subsidy_amount = parse_decimal(v)?;
        m.subsidy_applied = true;
    }
    if sub.get_flag("no-subsidy") {
        m.subsidy_applied = false;
        m.subsidy_amount = Decimal::ZERO;
    }

    if let Some(v) = sub.get_one::<String>("plan-crypto-shit") {
        m.planned_crypto_shit = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("plan-rent") {
        m.planned_rent = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("plan-utilities") {
        m.planned_utilities = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("plan-food") {
        m.planned_food = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("plan-transport") {
        m.planned_transport = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("plan-health") {
        m.planned_health = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("plan-shopping") {
        m.planned_shopping = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("plan-subscriptions") {
        m.planned_subscriptions = parse_decimal(v)?;
    }

    // Euro overrides for the distributed buckets re-derive the percentage
    // split, so the override survives later income edits.
    let mut planned = [
        m.planned_savings,
        m.planned_crypto_core,
        m.planned_shit_money,
        m.planned_leisure,
        m.planned_buffer,
    ];
    let flags = [
        "plan-savings",
        "plan-crypto-core",
        "plan-shit-money",
        "plan-leisure",
        "plan-buffer",
    ];
    let mut touched = false;
    for (i, flag) in flags.iter().enumerate() {
        if let Some(v) = sub.get_one::<String>(flag) {
            planned[i] = parse_decimal(v)?;
            touched = true;
        }
    }
    if touched {
        let total: Decimal = planned.iter().copied().sum();
        if total <= Decimal::ZERO {
            bail!("Bucket plan overrides need a positive total, got {}", total);
        }
        let pct = |v: Decimal| {
            (v / total).round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
        };
        m.dist_savings = pct(planned[0]);
        m.dist_core = pct(planned[1]);
        m.dist_shit = pct(planned[2]);
        m.dist_fun = pct(planned[3]);
        m.dist_buffer = pct(planned[4]);
    }

    distribution::apply(&mut m);
    save_month(conn, &m)?;
    let ccy = get_currency(conn)?;
    println!(
        "Updated month {} (available cash {})",
        m.ym(),
        fmt_money(&m.available_cash, &ccy)
    );
    Ok(())
}

fn close(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = month_arg_or_current(sub)?;
    let mut m = require_month(conn, year, month)?;
    if m.closed {
        bail!("Month {} is already closed", m.ym());
    }

    distribution::apply(&mut m);
    m.closed = true;
    m.closed_at = Some(chrono::Utc::now().to_rfc3339());
    save_month(conn, &m)?;
    println!("Closed month {}", m.ym());

    let (ny, nm) = next_month(year, month);
    if month_by_ym(conn, ny, nm)?.is_none() {
        let next = create_month(conn, ny, nm)?;
        println!("Created month {}", next.ym());
    }
    Ok(())
}

fn reopen(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = month_arg_or_current(sub)?;
    let mut m = require_month(conn, year, month)?;
    if !m.closed {
        bail!("Month {} is not closed", m.ym());
    }
    m.closed = false;
    m.closed_at = None;
    save_month(conn, &m)?;
    println!("Reopened month {}", m.ym());
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month_s = sub.get_one::<String>("month").unwrap();
    let (year, month) = parse_month(month_s)?;
    let m = require_month(conn, year, month)?;
    if !sub.get_flag("force") {
        bail!(
            "Deleting {} removes its movements and balances; pass --force to confirm",
            m.ym()
        );
    }
    let movs = conn.execute(
        "DELETE FROM movements WHERE year=?1 AND month=?2",
        params![year, month],
    )?;
    let bals = conn.execute(
        "DELETE FROM balances WHERE year=?1 AND month=?2",
        params![year, month],
    )?;
    conn.execute("DELETE FROM months WHERE id=?1", params![m.id])?;
    println!(
        "Removed month {} ({} movements, {} balances)",
        m.ym(),
        movs,
        bals
    );
    Ok(())
}
