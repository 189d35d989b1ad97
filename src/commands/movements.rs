// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::models::Movement;
use crate::taxonomy::{Category, MovementKind};
use crate::utils::{
    ensure_open, fmt_money, get_currency, id_for_account, maybe_print_json, month_by_ym,
    parse_date, parse_decimal, parse_month, pretty_table, require_month,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let kind_s = sub.get_one::<String>("kind").unwrap();
    let category_s = sub.get_one::<String>("category").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let note = sub.get_one::<String>("note").map(|s| s.to_string());

    let kind = MovementKind::parse(kind_s)
        .with_context(|| format!("Unknown kind '{}' (use income, expense or transfer)", kind_s))?;
    let category = Category::parse(kind, category_s).with_context(|| {
        format!(
            "Unknown {} category '{}' (known: {})",
            kind.as_str(),
            category_s,
            Category::keys_for(kind).join(", ")
        )
    })?;

    let from = sub
        .get_one::<String>("from")
        .map(|n| id_for_account(conn, n))
        .transpose()?;
    let to = sub
        .get_one::<String>("to")
        .map(|n| id_for_account(conn, n))
        .transpose()?;

    let mv = Movement::new(date, category, amount, from, to, note)?;
    let month = require_month(conn, mv.year, mv.month)?;
    ensure_open(&month)?;

    conn.execute(
        "INSERT INTO movements(date, year, month, kind, category, amount,
                               from_account, to_account, note, auto, subsidy_tag)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, 0)",
        params![
            mv.date.to_string(),
            mv.year,
            mv.month,
            mv.kind().as_str(),
            mv.category.as_str(),
            mv.amount.to_string(),
            mv.from_account,
            mv.to_account,
            mv.note,
        ],
    )?;
    let ccy = get_currency(conn)?;
    println!(
        "Recorded {} {} of {} on {}",
        mv.kind().as_str(),
        mv.category.as_str(),
        fmt_money(&mv.amount, &ccy),
        mv.date
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.from.clone(),
                    r.to.clone(),
                    r.note.clone(),
                    if r.auto { "yes".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Kind", "Category", "Amount", "From", "To", "Note", "Auto"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct MovementRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub from: String,
    pub to: String,
    pub note: String,
    pub auto: bool,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<MovementRow>> {
    let mut sql = String::from(
        "SELECT m.id, m.date, m.kind, m.category, m.amount, fa.name, ta.name, m.note, m.auto FROM movements m LEFT JOIN accounts fa ON m.from_account=fa.id LEFT JOIN accounts ta ON m.to_account=ta.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        let (year, mo) = parse_month(month)?;
        sql.push_str(" AND m.year=? AND m.month=?");
        params_vec.push(year.to_string());
        params_vec.push(mo.to_string());
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        sql.push_str(" AND m.kind=?");
        params_vec.push(kind.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND m.category=?");
        params_vec.push(cat.into());
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND (fa.name=? OR ta.name=?)");
        params_vec.push(acct.into());
        params_vec.push(acct.into());
    }
    sql.push_str(" ORDER BY m.date DESC, m.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let kind: String = r.get(2)?;
        let category: String = r.get(3)?;
        let amount: String = r.get(4)?;
        let from: Option<String> = r.get(5)?;
        let to: Option<String> = r.get(6)?;
        let note: Option<String> = r.get(7)?;
        let auto: i64 = r.get(8)?;
        data.push(MovementRow {
            id,
            date,
            kind,
            category,
            amount,
            from: from.unwrap_or_default(),
            to: to.unwrap_or_default(),
            note: note.unwrap_or_default(),
            auto: auto != 0,
        });
    }
    Ok(data)
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let ym: Option<(i64, i64)> = conn
        .query_row(
            "SELECT year, month FROM movements WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let Some((year, month)) = ym else {
        bail!("Movement {} not found", id);
    };
    if let Some(m) = month_by_ym(conn, year as i32, month as u32)? {
        ensure_open(&m)?;
    }
    conn.execute("DELETE FROM movements WHERE id=?1", params![id])?;
    println!("Removed movement {}", id);
    Ok(())
}
