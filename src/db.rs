// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::PathBuf;

use crate::models::AccountType;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("app.bucketeer", "Bucketeer", "bucketeer"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("bucketeer.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    seed_defaults(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        type TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS months(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        year INTEGER NOT NULL,
        month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
        closed INTEGER NOT NULL DEFAULT 0,
        closed_at TEXT,
        income_base TEXT NOT NULL DEFAULT '0',
        income_meal_card TEXT NOT NULL DEFAULT '0',
        income_extra TEXT NOT NULL DEFAULT '0',
        subsidy_applied INTEGER NOT NULL DEFAULT 0,
        subsidy_amount TEXT NOT NULL DEFAULT '0',
        fixed_expenses TEXT NOT NULL DEFAULT '0',
        planned_food TEXT NOT NULL DEFAULT '0',
        actual_fixed TEXT,
        actual_food TEXT,
        available_cash TEXT,
        planned_rent TEXT,
        planned_utilities TEXT,
        planned_leisure TEXT,
        planned_shit_money TEXT,
        planned_transport TEXT,
        planned_health TEXT,
        planned_shopping TEXT,
        planned_subscriptions TEXT,
        planned_buffer TEXT,
        planned_savings TEXT,
        planned_crypto_core TEXT,
        planned_crypto_shit TEXT,
        dist_core TEXT,
        dist_shit TEXT,
        dist_savings TEXT,
        dist_fun TEXT,
        dist_buffer TEXT,
        sub_dist_savings TEXT,
        sub_dist_core TEXT,
        sub_dist_shit TEXT,
        sub_dist_fun TEXT,
        UNIQUE(year, month)
    );

    CREATE TABLE IF NOT EXISTS balances(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER NOT NULL,
        year INTEGER NOT NULL,
        month INTEGER NOT NULL,
        opening TEXT NOT NULL DEFAULT '0',
        current TEXT NOT NULL DEFAULT '0',
        UNIQUE(account_id, year, month),
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_balances_ym ON balances(year, month);

    -- Account references are loose on purpose: a movement may outlive the
    -- account it pointed at and is then ignored by account lookups.
    CREATE TABLE IF NOT EXISTS movements(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        year INTEGER NOT NULL,
        month INTEGER NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense','transfer')),
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        from_account INTEGER,
        to_account INTEGER,
        note TEXT,
        auto INTEGER NOT NULL DEFAULT 0,
        subsidy_tag INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_movements_ym ON movements(year, month);
    CREATE INDEX IF NOT EXISTS idx_movements_date ON movements(date);
    "#,
    )?;
    Ok(())
}

/// Seeds the fixed account set on an empty database.
pub fn seed_defaults(conn: &Connection) -> Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |r| r.get(0))?;
    if count > 0 {
        return Ok(());
    }
    let defaults: [(&str, AccountType); 6] = [
        ("Main account", AccountType::Current),
        ("Meal card", AccountType::MealCard),
        ("Credit card", AccountType::CreditCard),
        ("Savings", AccountType::Savings),
        ("Crypto core", AccountType::CryptoCore),
        ("Crypto shit", AccountType::CryptoShit),
    ];
    for (name, kind) in defaults {
        conn.execute(
            "INSERT INTO accounts(name, type) VALUES (?1, ?2)",
            params![name, kind.as_str()],
        )?;
    }
    Ok(())
}
