// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

/// Known settings keys with their stock values. The table only stores
/// overrides; reads fall back to this list so a fresh database needs no
/// seeding pass.
pub const DEFAULTS: &[(&str, &str)] = &[
    ("currency", "EUR"),
    ("income_base", "1168"),
    ("income_meal_card", "0"),
    ("income_extra", "0"),
    ("subsidy_amount", "934"),
    ("fixed_expenses", "480"),
    ("planned_food", "0"),
    ("payday_day", "30"),
    ("dist_core", "0.25"),
    ("dist_shit", "0.10"),
    ("dist_savings", "0.25"),
    ("dist_fun", "0.25"),
    ("dist_buffer", "0.15"),
    ("sub_dist_savings", "0.35"),
    ("sub_dist_core", "0.30"),
    ("sub_dist_shit", "0.10"),
    ("sub_dist_fun", "0.25"),
    ("planned_rent", "0"),
    ("planned_utilities", "0"),
    ("planned_transport", "0"),
    ("planned_health", "0"),
    ("planned_shopping", "0"),
    ("planned_subscriptions", "0"),
    ("planned_crypto_shit", "0"),
];

pub fn default_for(key: &str) -> Option<&'static str> {
    DEFAULTS.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn get(conn: &Connection, key: &str) -> Result<String> {
    let default = default_for(key).with_context(|| format!("Unknown setting '{}'", key))?;
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v.unwrap_or_else(|| default.to_string()))
}

pub fn get_decimal(conn: &Connection, key: &str) -> Result<Decimal> {
    let s = get(conn, key)?;
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}' for setting '{}'", s, key))
}

pub fn get_u32(conn: &Connection, key: &str) -> Result<u32> {
    let s = get(conn, key)?;
    s.parse::<u32>()
        .with_context(|| format!("Invalid integer '{}' for setting '{}'", s, key))
}

pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    if default_for(key).is_none() {
        bail!(
            "Unknown setting '{}' (known keys: {})",
            key,
            DEFAULTS
                .iter()
                .map(|(k, _)| *k)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    if key != "currency" {
        value
            .parse::<Decimal>()
            .with_context(|| format!("Setting '{}' needs a numeric value, got '{}'", key, value))?;
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Every known key with its effective value, stored overrides applied.
pub fn all(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut out = Vec::with_capacity(DEFAULTS.len());
    for (key, _) in DEFAULTS {
        out.push((key.to_string(), get(conn, key)?));
    }
    Ok(out)
}
