// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::distribution;
use crate::models::{AccountType, Month, account_of_type};
use crate::settings;
use crate::taxonomy::IncomeCategory;
use crate::utils::{
    accounts_all, days_in_month, ensure_open, fmt_money, get_currency, month_arg_or_current,
    parse_decimal, require_month, save_month,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("fund-cards", sub)) => fund_cards(conn, sub),
        _ => run(conn, m),
    }
}

fn run(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = month_arg_or_current(sub)?;
    let mut m = require_month(conn, year, month)?;
    ensure_open(&m)?;

    if let Some(v) = sub.get_one::<String>("base") {
        m.income_base = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("meal-card") {
        m.income_meal_card = parse_decimal(v)?;
    }
    let extra_flag = sub.get_one::<String>("extra");
    if let Some(v) = extra_flag {
        m.income_extra = parse_decimal(v)?;
    }

    // June and December: extra pay is the subsidy, not a windfall. An
    // explicit zero takes a previously booked subsidy away again.
    if month == 6 || month == 12 {
        if m.income_extra > Decimal::ZERO {
            m.subsidy_applied = true;
            m.subsidy_amount = m.income_extra;
            m.income_extra = Decimal::ZERO;
        } else if extra_flag.is_some() {
            m.subsidy_applied = false;
            m.subsidy_amount = Decimal::ZERO;
        }
    }

    let d = distribution::apply(&mut m);
    save_month(conn, &m)?;

    let date = payday_date(conn, year, month)?;
    let accounts = accounts_all(conn)?;
    let current = account_of_type(&accounts, AccountType::Current)
        .context("No current account configured; run 'bucketeer init' first")?;

    upsert_auto_income(
        conn,
        &m,
        date,
        IncomeCategory::Salary,
        m.income_base,
        current.id,
        false,
    )?;
    upsert_auto_income(
        conn,
        &m,
        date,
        IncomeCategory::Extraordinary,
        m.income_extra,
        current.id,
        false,
    )?;
    let subsidy = if m.subsidy_applied {
        m.subsidy_amount
    } else {
        Decimal::ZERO
    };
    upsert_auto_income(
        conn,
        &m,
        date,
        IncomeCategory::Subsidy,
        subsidy,
        current.id,
        true,
    )?;

    let ccy = get_currency(conn)?;
    println!(
        "Payday booked for {}: total income {}, available cash {}",
        m.ym(),
        fmt_money(&d.total_income, &ccy),
        fmt_money(&d.available_cash, &ccy)
    );
    if d.subsidy_month {
        println!(
            "Subsidy of {} distributed on its own split",
            fmt_money(&m.subsidy_amount, &ccy)
        );
    }
    Ok(())
}

fn fund_cards(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = month_arg_or_current(sub)?;
    let mut m = require_month(conn, year, month)?;
    ensure_open(&m)?;

    let meal = match sub.get_one::<String>("meal") {
        Some(v) => parse_decimal(v)?,
        None => m.income_meal_card,
    };
    let credit = match sub.get_one::<String>("credit") {
        Some(v) => parse_decimal(v)?,
        None => Decimal::ZERO,
    };

    // The funded amount is the month's meal-card income, so the card
    // budget follows what was actually loaded.
    m.income_meal_card = meal;
    distribution::apply(&mut m);
    save_month(conn, &m)?;

    let date = payday_date(conn, year, month)?;
    let accounts = accounts_all(conn)?;
    let ccy = get_currency(conn)?;

    let meal_acc = account_of_type(&accounts, AccountType::MealCard)
        .context("No meal card account configured; run 'bucketeer init' first")?;
    upsert_auto_income(
        conn,
        &m,
        date,
        IncomeCategory::MealCard,
        meal,
        meal_acc.id,
        false,
    )?;
    if meal > Decimal::ZERO {
        println!("Meal card funded with {}", fmt_money(&meal, &ccy));
    }

    if credit > Decimal::ZERO {
        let credit_acc = account_of_type(&accounts, AccountType::CreditCard)
            .context("No credit card account configured; run 'bucketeer init' first")?;
        upsert_auto_income(
            conn,
            &m,
            date,
            IncomeCategory::CreditCard,
            credit,
            credit_acc.id,
            false,
        )?;
        println!("Credit card funded with {}", fmt_money(&credit, &ccy));
    } else {
        conn.execute(
            "DELETE FROM movements
             WHERE year=?1 AND month=?2 AND kind='income' AND category='credit_card' AND auto=1",
            params![year, month],
        )?;
    }
    Ok(())
}

/// Payday falls on the configured day, pulled in for shorter months.
fn payday_date(conn: &Connection, year: i32, month: u32) -> Result<NaiveDate> {
    let day = settings::get_u32(conn, "payday_day")?.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day.max(1))
        .with_context(|| format!("Invalid payday date {}-{}-{}", year, month, day))
}

/// One auto movement per income category and month. Re-running payday
/// replaces the previous figures; a zero amount removes the row.
fn upsert_auto_income(
    conn: &Connection,
    m: &Month,
    date: NaiveDate,
    cat: IncomeCategory,
    amount: Decimal,
    to_account: i64,
    subsidy_tag: bool,
) -> Result<()> {
    if amount <= Decimal::ZERO {
        conn.execute(
            "DELETE FROM movements
             WHERE year=?1 AND month=?2 AND kind='income' AND category=?3 AND auto=1",
            params![m.year, m.month, cat.as_str()],
        )?;
        return Ok(());
    }
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM movements
             WHERE year=?1 AND month=?2 AND kind='income' AND category=?3 AND auto=1",
            params![m.year, m.month, cat.as_str()],
            |r| r.get(0),
        )
        .optional()?;
    match existing {
        Some(id) => {
            conn.execute(
                "UPDATE movements SET date=?1, amount=?2, to_account=?3, subsidy_tag=?4
                 WHERE id=?5",
                params![
                    date.to_string(),
                    amount.to_string(),
                    to_account,
                    subsidy_tag as i64,
                    id
                ],
            )?;
        }
        None => {
            conn.execute(
                "INSERT INTO movements(date, year, month, kind, category, amount,
                                       from_account, to_account, note, auto, subsidy_tag)
                 VALUES (?1, ?2, ?3, 'income', ?4, ?5, NULL, ?6, NULL, 1, ?7)",
                params![
                    date.to_string(),
                    m.year,
                    m.month,
                    cat.as_str(),
                    amount.to_string(),
                    to_account,
                    subsidy_tag as i64
                ],
            )?;
        }
    }
    Ok(())
}
