// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::models::Month;
use crate::taxonomy::{Category, MovementKind};
use crate::utils::{accounts_all, balances_for_month, fmt_ym, pretty_table};

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Movements pointing at deleted accounts
    let mut stmt = conn.prepare(
        "SELECT id FROM movements
         WHERE (from_account IS NOT NULL AND from_account NOT IN (SELECT id FROM accounts))
            OR (to_account IS NOT NULL AND to_account NOT IN (SELECT id FROM accounts))
         ORDER BY id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["orphan_account_ref".into(), format!("movement {}", id)]);
    }

    // 2) Rows the loaders would skip
    let mut stmt2 =
        conn.prepare("SELECT id, date, kind, category, amount FROM movements ORDER BY id")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let kind_s: String = r.get(2)?;
        let category: String = r.get(3)?;
        let amount: String = r.get(4)?;
        if chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
            rows.push(vec!["bad_movement_date".into(), format!("{} '{}'", id, date)]);
        }
        match MovementKind::parse(&kind_s) {
            None => rows.push(vec![
                "bad_movement_kind".into(),
                format!("{} '{}'", id, kind_s),
            ]),
            Some(kind) => {
                if Category::parse(kind, &category).is_none() {
                    rows.push(vec![
                        "bad_movement_category".into(),
                        format!("{} '{}'", id, category),
                    ]);
                }
            }
        }
        if amount.trim().parse::<Decimal>().is_err() {
            rows.push(vec![
                "bad_movement_amount".into(),
                format!("{} '{}'", id, amount),
            ]);
        }
    }

    // 3) Distribution schedules drifting from 100%
    let tolerance = Decimal::new(1, 3);
    let mut stmt3 = conn.prepare("SELECT * FROM months ORDER BY year, month")?;
    let months: Vec<Month> = stmt3
        .query_map([], Month::from_row)?
        .collect::<rusqlite::Result<_>>()?;
    for m in &months {
        let base = m.dist_core + m.dist_shit + m.dist_savings + m.dist_fun + m.dist_buffer;
        if (base - Decimal::ONE).abs() > tolerance {
            rows.push(vec![
                "distribution_sum".into(),
                format!("{} base {}", m.ym(), base),
            ]);
        }
        let sub = m.sub_dist_savings + m.sub_dist_core + m.sub_dist_shit + m.sub_dist_fun;
        if (sub - Decimal::ONE).abs() > tolerance {
            rows.push(vec![
                "distribution_sum".into(),
                format!("{} subsidy {}", m.ym(), sub),
            ]);
        }
    }

    // 4) Accounts without a balance row for a stored month
    let accounts = accounts_all(conn)?;
    for m in &months {
        let balances = balances_for_month(conn, m.year, m.month)?;
        for a in &accounts {
            if !balances.iter().any(|b| b.account_id == a.id) {
                rows.push(vec![
                    "missing_balance".into(),
                    format!("{} {}", m.ym(), a.name),
                ]);
            }
        }
    }

    // 5) Movements booked outside any stored month
    let mut stmt5 = conn.prepare(
        "SELECT DISTINCT year, month FROM movements
         EXCEPT SELECT year, month FROM months ORDER BY year, month",
    )?;
    let mut cur5 = stmt5.query([])?;
    while let Some(r) = cur5.next()? {
        let y: i64 = r.get(0)?;
        let mo: i64 = r.get(1)?;
        rows.push(vec!["movement_no_month".into(), fmt_ym(y as i32, mo as u32)]);
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
