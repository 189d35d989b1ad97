// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct SettingRow {
    pub key: String,
    pub value: String,
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data: Vec<SettingRow> = crate::settings::all(conn)?
        .into_iter()
        .map(|(key, value)| SettingRow { key, value })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| vec![r.key.clone(), r.value.clone()])
            .collect();
        println!("{}", pretty_table(&["Key", "Value"], rows));
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("key").unwrap();
    let value = sub.get_one::<String>("value").unwrap();
    crate::settings::set(conn, key, value)?;
    println!(
        "Setting {} = {} (used by months created from now on)",
        key, value
    );
    Ok(())
}
