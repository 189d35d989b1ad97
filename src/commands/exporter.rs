// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

use crate::utils::parse_month;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("movements", sub)) => export_movements(conn, sub),
        _ => Ok(()),
    }
}

fn export_movements(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let mut sql = String::from(
        "SELECT m.id, m.date, m.kind, m.category, m.amount, fa.name, ta.name, m.note, m.auto
         FROM movements m
         LEFT JOIN accounts fa ON m.from_account=fa.id
         LEFT JOIN accounts ta ON m.to_account=ta.id",
    );
    let mut filter: Vec<i64> = Vec::new();
    if let Some(month) = sub.get_one::<String>("month") {
        let (year, mo) = parse_month(month)?;
        sql.push_str(" WHERE m.year=?1 AND m.month=?2");
        filter.push(year as i64);
        filter.push(mo as i64);
    }
    sql.push_str(" ORDER BY m.date, m.id");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if filter.is_empty() {
        stmt.query([])?
    } else {
        stmt.query(rusqlite::params_from_iter(filter.iter()))?
    };

    let mut items = Vec::new();
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
        items.push((id, date, kind, category, amount, from, to, note, auto));
    }

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "date", "kind", "category", "amount", "from", "to", "note", "auto",
            ])?;
            for (id, date, kind, category, amount, from, to, note, auto) in items {
                wtr.write_record([
                    id.to_string(),
                    date,
                    kind,
                    category,
                    amount,
                    from.unwrap_or_default(),
                    to.unwrap_or_default(),
                    note.unwrap_or_default(),
                    auto.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let objs: Vec<serde_json::Value> = items
                .into_iter()
                .map(|(id, date, kind, category, amount, from, to, note, auto)| {
                    json!({
                        "id": id, "date": date, "kind": kind, "category": category,
                        "amount": amount, "from": from, "to": to, "note": note,
                        "auto": auto != 0
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&objs)?)?;
        }
    }
    println!("Exported movements to {}", out);
    Ok(())
}
