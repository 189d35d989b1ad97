// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bucketeer::models::Month;
use bucketeer::{cli, commands, db, utils};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    db::seed_defaults(&conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("month", sub)) => commands::months::handle(conn, sub),
        Some(("mov", sub)) => commands::movements::handle(conn, sub),
        Some(("account", sub)) => commands::accounts::handle(conn, sub),
        _ => panic!("unhandled command"),
    }
}

fn month(conn: &Connection, year: i32, mo: u32) -> Month {
    utils::month_by_ym(conn, year, mo).unwrap().unwrap()
}

#[test]
fn new_month_seeds_from_settings() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();

    let m = month(&conn, 2025, 3);
    assert_eq!(m.income_base, dec("1168"));
    assert_eq!(m.fixed_expenses, dec("480"));
    assert_eq!(m.actual_fixed, dec("480"));
    assert_eq!(m.subsidy_amount, dec("934"));
    assert!(!m.subsidy_applied);
    // no rent setting yet, so the whole fixed block is the rent plan
    assert_eq!(m.planned_rent, dec("480"));
    assert_eq!(m.available_cash, dec("688.00"));
    assert_eq!(m.planned_savings, dec("172.00"));

    let balances = utils::balances_for_month(&conn, 2025, 3).unwrap();
    assert_eq!(balances.len(), 6);
    assert!(balances.iter().all(|b| b.opening == Decimal::ZERO));
}

#[test]
fn creating_the_same_month_twice_errs() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    let err = run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap_err();
    assert!(err.to_string().contains("already exists"), "{}", err);
}

#[test]
fn set_food_reshapes_the_pool() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(
        &conn,
        &[
            "bucketeer", "month", "set", "--month", "2025-03", "--food", "100",
        ],
    )
    .unwrap();

    let m = month(&conn, 2025, 3);
    assert_eq!(m.actual_food, dec("100"));
    // 1168 - 480 - 100
    assert_eq!(m.available_cash, dec("588.00"));
    assert_eq!(m.planned_savings, dec("147.00"));
}

#[test]
fn plan_overrides_rederive_the_split() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-04"]).unwrap();
    run(
        &conn,
        &[
            "bucketeer",
            "month",
            "set",
            "--month",
            "2025-04",
            "--plan-savings",
            "300",
            "--plan-crypto-core",
            "100",
            "--plan-shit-money",
            "50",
            "--plan-leisure",
            "100",
            "--plan-buffer",
            "50",
        ],
    )
    .unwrap();

    let m = month(&conn, 2025, 4);
    // 300 of 600 -> half the pool
    assert_eq!(m.dist_savings, dec("0.5"));
    assert_eq!(m.planned_savings, dec("344.00"));
    // 100 of 600 -> 0.1667, times the 688 pool
    assert_eq!(m.dist_core, dec("0.1667"));
    assert_eq!(m.planned_crypto_core, dec("114.69"));
}

#[test]
fn plan_overrides_need_a_positive_total() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-04"]).unwrap();
    let err = run(
        &conn,
        &[
            "bucketeer",
            "month",
            "set",
            "--month",
            "2025-04",
            "--plan-savings",
            "0",
            "--plan-crypto-core",
            "0",
            "--plan-shit-money",
            "0",
            "--plan-leisure",
            "0",
            "--plan-buffer",
            "0",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("positive total"), "{}", err);
}

#[test]
fn subsidy_toggles_on_a_june_month() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2024-06"]).unwrap();
    assert_eq!(month(&conn, 2024, 6).available_cash, dec("688.00"));

    run(
        &conn,
        &[
            "bucketeer", "month", "set", "--month", "2024-06", "--subsidy", "934",
        ],
    )
    .unwrap();
    let m = month(&conn, 2024, 6);
    assert!(m.subsidy_applied);
    assert_eq!(m.available_cash, dec("1622.00"));

    run(
        &conn,
        &[
            "bucketeer",
            "month",
            "set",
            "--month",
            "2024-06",
            "--no-subsidy",
        ],
    )
    .unwrap();
    let m = month(&conn, 2024, 6);
    assert!(!m.subsidy_applied);
    assert_eq!(m.subsidy_amount, Decimal::ZERO);
    assert_eq!(m.available_cash, dec("688.00"));
}

#[test]
fn close_seals_the_month_and_rolls_forward() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(
        &conn,
        &[
            "bucketeer",
            "account",
            "set-balance",
            "--account",
            "Main account",
            "--month",
            "2025-03",
            "--amount",
            "250",
        ],
    )
    .unwrap();
    run(&conn, &["bucketeer", "month", "close", "--month", "2025-03"]).unwrap();

    let m = month(&conn, 2025, 3);
    assert!(m.closed);
    assert!(m.closed_at.is_some());

    // the next month exists and opens with March's closing balance
    let next = month(&conn, 2025, 4);
    assert!(!next.closed);
    let main_id = utils::id_for_account(&conn, "Main account").unwrap();
    let balances = utils::balances_for_month(&conn, 2025, 4).unwrap();
    let main = balances.iter().find(|b| b.account_id == main_id).unwrap();
    assert_eq!(main.opening, dec("250"));
}

#[test]
fn closing_twice_errs() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(&conn, &["bucketeer", "month", "close", "--month", "2025-03"]).unwrap();
    let err = run(&conn, &["bucketeer", "month", "close", "--month", "2025-03"]).unwrap_err();
    assert!(err.to_string().contains("already closed"), "{}", err);
}

#[test]
fn closed_month_rejects_edits_until_reopened() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(&conn, &["bucketeer", "month", "close", "--month", "2025-03"]).unwrap();

    let err = run(
        &conn,
        &[
            "bucketeer", "month", "set", "--month", "2025-03", "--food", "10",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("is closed"), "{}", err);

    run(
        &conn,
        &["bucketeer", "month", "reopen", "--month", "2025-03"],
    )
    .unwrap();
    run(
        &conn,
        &[
            "bucketeer", "month", "set", "--month", "2025-03", "--food", "10",
        ],
    )
    .unwrap();
    assert_eq!(month(&conn, 2025, 3).actual_food, dec("10"));
}

#[test]
fn reopening_an_open_month_errs() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    let err = run(
        &conn,
        &["bucketeer", "month", "reopen", "--month", "2025-03"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("not closed"), "{}", err);
}

#[test]
fn rm_needs_force_then_cascades() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(
        &conn,
        &[
            "bucketeer",
            "mov",
            "add",
            "--date",
            "2025-03-05",
            "--kind",
            "expense",
            "--category",
            "food",
            "--amount",
            "10",
            "--from",
            "Main account",
        ],
    )
    .unwrap();

    let err = run(&conn, &["bucketeer", "month", "rm", "--month", "2025-03"]).unwrap_err();
    assert!(err.to_string().contains("--force"), "{}", err);
    assert!(utils::month_by_ym(&conn, 2025, 3).unwrap().is_some());

    run(
        &conn,
        &[
            "bucketeer", "month", "rm", "--month", "2025-03", "--force",
        ],
    )
    .unwrap();
    assert!(utils::month_by_ym(&conn, 2025, 3).unwrap().is_none());
    assert!(utils::movements_for_month(&conn, 2025, 3).unwrap().is_empty());
    assert!(utils::balances_for_month(&conn, 2025, 3).unwrap().is_empty());
}

#[test]
fn missing_month_is_a_clear_error() {
    let conn = setup();
    let err = run(
        &conn,
        &[
            "bucketeer", "month", "set", "--month", "2030-01", "--food", "1",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("does not exist"), "{}", err);
}
