// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;

use crate::utils::{
    accounts_all, balances_for_month, ensure_open, fmt_money, fmt_ym, id_for_account,
    maybe_print_json, month_arg_or_current, parse_decimal, pretty_table, require_month,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set-balance", sub)) => set_balance(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct AccountRow {
    pub name: String,
    pub kind: String,
    pub active: bool,
    pub opening: Option<String>,
    pub current: Option<String>,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (year, month) = month_arg_or_current(sub)?;
    let balances = balances_for_month(conn, year, month)?;

    let data: Vec<AccountRow> = accounts_all(conn)?
        .into_iter()
        .map(|a| {
            let bal = balances.iter().find(|b| b.account_id == a.id);
            AccountRow {
                name: a.name,
                kind: a.kind.as_str().to_string(),
                active: a.active,
                opening: bal.map(|b| b.opening.to_string()),
                current: bal.map(|b| b.current.to_string()),
            }
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.kind.clone(),
                    r.opening.clone().unwrap_or_else(|| "-".into()),
                    r.current.clone().unwrap_or_else(|| "-".into()),
                    if r.active { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!("Balances for {}", fmt_ym(year, month));
        println!(
            "{}",
            pretty_table(&["Account", "Type", "Opening", "Current", "Active"], rows)
        );
    }
    Ok(())
}

fn set_balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("account").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let (year, month) = month_arg_or_current(sub)?;
    let m = require_month(conn, year, month)?;
    ensure_open(&m)?;
    let account_id = id_for_account(conn, name)?;

    if sub.get_flag("opening") {
        conn.execute(
            "INSERT INTO balances(account_id, year, month, opening, current)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(account_id, year, month) DO UPDATE SET opening=excluded.opening",
            params![account_id, year, month, amount.to_string()],
        )?;
    } else {
        conn.execute(
            "INSERT INTO balances(account_id, year, month, opening, current)
             VALUES (?1, ?2, ?3, '0', ?4)
             ON CONFLICT(account_id, year, month) DO UPDATE SET current=excluded.current",
            params![account_id, year, month, amount.to_string()],
        )?;
    }

    let which = if sub.get_flag("opening") {
        "opening"
    } else {
        "current"
    };
    let ccy = crate::utils::get_currency(conn)?;
    println!(
        "Set {} balance of '{}' for {} to {}",
        which,
        name,
        fmt_ym(year, month),
        fmt_money(&amount, &ccy)
    );
    Ok(())
}
