// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Account, AccountBalance, AccountType, Month, Movement};
use crate::settings;
use crate::taxonomy::{Category, MovementKind};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok((d.year(), d.month()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Cent rounding used across every derivation: half away from zero.
pub fn round_cents(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// num/den as a cent-rounded percentage, 0 when the denominator is not
/// positive. Keeps zero-plan progress at 0% instead of dividing.
pub fn ratio_pct(num: Decimal, den: Decimal) -> Decimal {
    if den <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_cents(num / den * Decimal::ONE_HUNDRED)
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d)
}

pub fn fmt_ym(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

pub fn current_ym() -> (i32, u32) {
    let today = chrono::Local::now().date_naive();
    (today.year(), today.month())
}

/// Reads an optional `--month YYYY-MM` argument, defaulting to the current
/// month.
pub fn month_arg_or_current(sub: &clap::ArgMatches) -> Result<(i32, u32)> {
    match sub.get_one::<String>("month") {
        Some(s) => parse_month(s),
        None => Ok(current_ym()),
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

pub fn month_end(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
        .with_context(|| format!("Invalid month {}-{}", year, month))
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn get_currency(conn: &Connection) -> Result<String> {
    settings::get(conn, "currency")
}

pub fn id_for_account(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM accounts WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Account '{}' not found", name))?;
    Ok(id)
}

pub fn month_by_ym(conn: &Connection, year: i32, month: u32) -> Result<Option<Month>> {
    let mut stmt = conn.prepare("SELECT * FROM months WHERE year=?1 AND month=?2")?;
    let m = stmt
        .query_row(params![year, month], Month::from_row)
        .optional()?;
    Ok(m)
}

pub fn require_month(conn: &Connection, year: i32, month: u32) -> Result<Month> {
    month_by_ym(conn, year, month)?.with_context(|| {
        format!(
            "Month {} does not exist; create it with 'bucketeer month new --month {}'",
            fmt_ym(year, month),
            fmt_ym(year, month)
        )
    })
}

pub fn ensure_open(month: &Month) -> Result<()> {
    if month.closed {
        bail!(
            "Month {} is closed; run 'bucketeer month reopen --month {}' first",
            month.ym(),
            month.ym()
        );
    }
    Ok(())
}

pub fn insert_month(conn: &Connection, m: &Month) -> Result<i64> {
    conn.execute(
        "INSERT INTO months(
            year, month, closed, closed_at,
            income_base, income_meal_card, income_extra,
            subsidy_applied, subsidy_amount,
            fixed_expenses, planned_food, actual_fixed, actual_food, available_cash,
            planned_rent, planned_utilities, planned_leisure, planned_shit_money,
            planned_transport, planned_health, planned_shopping, planned_subscriptions,
            planned_buffer, planned_savings, planned_crypto_core, planned_crypto_shit,
            dist_core, dist_shit, dist_savings, dist_fun, dist_buffer,
            sub_dist_savings, sub_dist_core, sub_dist_shit, sub_dist_fun
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,
                  ?21,?22,?23,?24,?25,?26,?27,?28,?29,?30,?31,?32,?33,?34,?35)",
        params![
            m.year,
            m.month,
            m.closed as i64,
            m.closed_at,
            m.income_base.to_string(),
            m.income_meal_card.to_string(),
            m.income_extra.to_string(),
            m.subsidy_applied as i64,
            m.subsidy_amount.to_string(),
            m.fixed_expenses.to_string(),
            m.planned_food.to_string(),
            m.actual_fixed.to_string(),
            m.actual_food.to_string(),
            m.available_cash.to_string(),
            m.planned_rent.to_string(),
            m.planned_utilities.to_string(),
            m.planned_leisure.to_string(),
            m.planned_shit_money.to_string(),
            m.planned_transport.to_string(),
            m.planned_health.to_string(),
            m.planned_shopping.to_string(),
            m.planned_subscriptions.to_string(),
            m.planned_buffer.to_string(),
            m.planned_savings.to_string(),
            m.planned_crypto_core.to_string(),
            m.planned_crypto_shit.to_string(),
            m.dist_core.to_string(),
            m.dist_shit.to_string(),
            m.dist_savings.to_string(),
            m.dist_fun.to_string(),
            m.dist_buffer.to_string(),
            m.sub_dist_savings.to_string(),
            m.sub_dist_core.to_string(),
            m.sub_dist_shit.to_string(),
            m.sub_dist_fun.to_string(),
        ],
    )
    .with_context(|| format!("Month {} already exists", m.ym()))?;
    Ok(conn.last_insert_rowid())
}

pub fn save_month(conn: &Connection, m: &Month) -> Result<()> {
    let n = conn.execute(
        "UPDATE months SET
            closed=?1, closed_at=?2,
            income_base=?3, income_meal_card=?4, income_extra=?5,
            subsidy_applied=?6, subsidy_amount=?7,
            fixed_expenses=?8, planned_food=?9, actual_fixed=?10, actual_food=?11,
            available_cash=?12,
            planned_rent=?13, planned_utilities=?14, planned_leisure=?15,
            planned_shit_money=?16, planned_transport=?17, planned_health=?18,
            planned_shopping=?19, planned_subscriptions=?20, planned_buffer=?21,
            planned_savings=?22, planned_crypto_core=?23, planned_crypto_shit=?24,
            dist_core=?25, dist_shit=?26, dist_savings=?27, dist_fun=?28, dist_buffer=?29,
            sub_dist_savings=?30, sub_dist_core=?31, sub_dist_shit=?32, sub_dist_fun=?33
         WHERE id=?34",
        params![
            m.closed as i64,
            m.closed_at,
            m.income_base.to_string(),
            m.income_meal_card.to_string(),
            m.income_extra.to_string(),
            m.subsidy_applied as i64,
            m.subsidy_amount.to_string(),
            m.fixed_expenses.to_string(),
            m.planned_food.to_string(),
            m.actual_fixed.to_string(),
            m.actual_food.to_string(),
            m.available_cash.to_string(),
            m.planned_rent.to_string(),
            m.planned_utilities.to_string(),
            m.planned_leisure.to_string(),
            m.planned_shit_money.to_string(),
            m.planned_transport.to_string(),
            m.planned_health.to_string(),
            m.planned_shopping.to_string(),
            m.planned_subscriptions.to_string(),
            m.planned_buffer.to_string(),
            m.planned_savings.to_string(),
            m.planned_crypto_core.to_string(),
            m.planned_crypto_shit.to_string(),
            m.dist_core.to_string(),
            m.dist_shit.to_string(),
            m.dist_savings.to_string(),
            m.dist_fun.to_string(),
            m.dist_buffer.to_string(),
            m.sub_dist_savings.to_string(),
            m.sub_dist_core.to_string(),
            m.sub_dist_shit.to_string(),
            m.sub_dist_fun.to_string(),
            m.id,
        ],
    )?;
    if n == 0 {
        bail!("Month {} has no stored row to update", m.ym());
    }
    Ok(())
}

pub fn accounts_all(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare("SELECT id, name, type, active FROM accounts ORDER BY id")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        let kind_s: String = r.get(2)?;
        let active: i64 = r.get(3)?;
        let Some(kind) = AccountType::parse(&kind_s) else {
            eprintln!("Skipping account {}: unknown type '{}'", id, kind_s);
            continue;
        };
        out.push(Account {
            id,
            name,
            kind,
            active: active != 0,
        });
    }
    Ok(out)
}

pub fn balances_for_month(conn: &Connection, year: i32, month: u32) -> Result<Vec<AccountBalance>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, year, month, opening, current
         FROM balances WHERE year=?1 AND month=?2 ORDER BY account_id",
    )?;
    let mut rows = stmt.query(params![year, month])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let opening_s: String = r.get(4)?;
        let current_s: String = r.get(5)?;
        out.push(AccountBalance {
            id: r.get(0)?,
            account_id: r.get(1)?,
            year: r.get(2)?,
            month: r.get(3)?,
            opening: opening_s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid opening balance '{}'", opening_s))?,
            current: current_s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid current balance '{}'", current_s))?,
        });
    }
    Ok(out)
}

/// Loads a month's movements. Rows that no longer decode (bad kind, category
/// or amount text) are skipped with a warning; `doctor` lists them.
pub fn movements_for_month(conn: &Connection, year: i32, month: u32) -> Result<Vec<Movement>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, year, month, kind, category, amount, from_account, to_account,
                note, auto, subsidy_tag
         FROM movements WHERE year=?1 AND month=?2 ORDER BY date, id",
    )?;
    let mut rows = stmt.query(params![year, month])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date_s: String = r.get(1)?;
        let kind_s: String = r.get(4)?;
        let category_s: String = r.get(5)?;
        let amount_s: String = r.get(6)?;

        let Ok(date) = NaiveDate::parse_from_str(&date_s, "%Y-%m-%d") else {
            eprintln!("Skipping movement {}: invalid date '{}'", id, date_s);
            continue;
        };
        let Some(kind) = MovementKind::parse(&kind_s) else {
            eprintln!("Skipping movement {}: unknown kind '{}'", id, kind_s);
            continue;
        };
        let Some(category) = Category::parse(kind, &category_s) else {
            eprintln!(
                "Skipping movement {}: unknown category '{}' for kind '{}'",
                id, category_s, kind_s
            );
            continue;
        };
        let Ok(amount) = amount_s.parse::<Decimal>() else {
            eprintln!("Skipping movement {}: invalid amount '{}'", id, amount_s);
            continue;
        };

        let auto: i64 = r.get(10)?;
        let subsidy_tag: i64 = r.get(11)?;
        out.push(Movement {
            id,
            date,
            year: r.get(2)?,
            month: r.get(3)?,
            category,
            amount,
            from_account: r.get(7)?,
            to_account: r.get(8)?,
            note: r.get(9)?,
            auto: auto != 0,
            subsidy_tag: subsidy_tag != 0,
        });
    }
    Ok(out)
}
