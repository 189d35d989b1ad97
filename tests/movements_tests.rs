// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bucketeer::models::{Movement, MovementError};
use bucketeer::taxonomy::{Category, ExpenseCategory};
use bucketeer::{cli, commands, db, utils};
use chrono::NaiveDate;
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
        _ => panic!("unhandled command"),
    }
}

fn add(conn: &Connection, date: &str, kind: &str, category: &str, amount: &str, extra: &[&str]) -> anyhow::Result<()> {
    let mut args = vec![
        "bucketeer", "mov", "add", "--date", date, "--kind", kind, "--category", category,
        "--amount", amount,
    ];
    args.extend_from_slice(extra);
    run(conn, &args)
}

fn list_rows(conn: &Connection, extra: &[&str]) -> Vec<commands::movements::MovementRow> {
    let mut args = vec!["bucketeer", "mov", "list"];
    args.extend_from_slice(extra);
    let matches = cli::build_cli().get_matches_from(args);
    if let Some(("mov", mov_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = mov_m.subcommand() {
            commands::movements::query_rows(conn, list_m).unwrap()
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no mov subcommand");
    }
}

#[test]
fn list_limit_respects_newest_first() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-01"]).unwrap();
    for day in 1..=3 {
        add(
            &conn,
            &format!("2025-01-0{}", day),
            "expense",
            "food",
            "10",
            &["--from", "Main account"],
        )
        .unwrap();
    }

    let rows = list_rows(&conn, &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-03");
}

#[test]
fn filters_narrow_the_listing() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-01"]).unwrap();
    add(
        &conn,
        "2025-01-05",
        "expense",
        "food",
        "12.50",
        &["--from", "Main account", "--note", "groceries"],
    )
    .unwrap();
    add(
        &conn,
        "2025-01-06",
        "expense",
        "leisure",
        "30",
        &["--from", "Main account"],
    )
    .unwrap();
    add(
        &conn,
        "2025-01-07",
        "transfer",
        "savings",
        "86",
        &["--from", "Main account", "--to", "Savings"],
    )
    .unwrap();

    assert_eq!(list_rows(&conn, &["--kind", "expense"]).len(), 2);

    let food = list_rows(&conn, &["--category", "food"]);
    assert_eq!(food.len(), 1);
    assert_eq!(food[0].category, "food");
    assert_eq!(food[0].amount, "12.50");
    assert_eq!(food[0].note, "groceries");
    assert!(!food[0].auto);

    let via_savings = list_rows(&conn, &["--account", "Savings"]);
    assert_eq!(via_savings.len(), 1);
    assert_eq!(via_savings[0].kind, "transfer");
    assert_eq!(via_savings[0].from, "Main account");
    assert_eq!(via_savings[0].to, "Savings");
}

#[test]
fn account_shape_is_checked_per_kind() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-01"]).unwrap();

    // expense: exactly one source
    assert!(add(&conn, "2025-01-05", "expense", "food", "10", &[]).is_err());
    assert!(
        add(
            &conn,
            "2025-01-05",
            "expense",
            "food",
            "10",
            &["--from", "Main account", "--to", "Savings"],
        )
        .is_err()
    );
    // income: exactly one destination
    assert!(
        add(
            &conn,
            "2025-01-05",
            "income",
            "salary",
            "10",
            &["--from", "Main account"],
        )
        .is_err()
    );
    // transfer: two distinct accounts
    assert!(
        add(
            &conn,
            "2025-01-05",
            "transfer",
            "savings",
            "10",
            &["--from", "Main account", "--to", "Main account"],
        )
        .is_err()
    );
}

#[test]
fn unknown_kind_and_category_err() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-01"]).unwrap();

    let err = add(
        &conn,
        "2025-01-05",
        "gift",
        "food",
        "10",
        &["--from", "Main account"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unknown kind"), "{}", err);

    let err = add(
        &conn,
        "2025-01-05",
        "expense",
        "beer",
        "10",
        &["--from", "Main account"],
    )
    .unwrap_err();
    assert!(
        err.to_string().contains("Unknown expense category"),
        "{}",
        err
    );
}

#[test]
fn zero_amount_is_rejected() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-01"]).unwrap();
    let err = add(
        &conn,
        "2025-01-05",
        "expense",
        "food",
        "0",
        &["--from", "Main account"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("positive"), "{}", err);
}

#[test]
fn negative_amount_is_rejected_at_the_model() {
    let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
    let err = Movement::new(
        date,
        Category::Expense(ExpenseCategory::Food),
        dec("-5"),
        Some(1),
        None,
        None,
    )
    .unwrap_err();
    assert_eq!(err, MovementError::NonPositiveAmount(dec("-5")));
}

#[test]
fn movements_need_an_existing_open_month() {
    let conn = setup();
    let err = add(
        &conn,
        "2025-01-05",
        "expense",
        "food",
        "10",
        &["--from", "Main account"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("does not exist"), "{}", err);

    run(&conn, &["bucketeer", "month", "new", "--month", "2025-01"]).unwrap();
    run(&conn, &["bucketeer", "month", "close", "--month", "2025-01"]).unwrap();
    let err = add(
        &conn,
        "2025-01-05",
        "expense",
        "food",
        "10",
        &["--from", "Main account"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("is closed"), "{}", err);
}

#[test]
fn rm_missing_movement_errs() {
    let conn = setup();
    let err = run(&conn, &["bucketeer", "mov", "rm", "--id", "99"]).unwrap_err();
    assert!(err.to_string().contains("not found"), "{}", err);
}

#[test]
fn rm_deletes_a_movement() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-01"]).unwrap();
    add(
        &conn,
        "2025-01-05",
        "expense",
        "food",
        "10",
        &["--from", "Main account"],
    )
    .unwrap();

    run(&conn, &["bucketeer", "mov", "rm", "--id", "1"]).unwrap();
    assert!(list_rows(&conn, &[]).is_empty());
}

#[test]
fn rm_on_a_closed_month_errs() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-01"]).unwrap();
    add(
        &conn,
        "2025-01-05",
        "expense",
        "food",
        "10",
        &["--from", "Main account"],
    )
    .unwrap();
    run(&conn, &["bucketeer", "month", "close", "--month", "2025-01"]).unwrap();

    let err = run(&conn, &["bucketeer", "mov", "rm", "--id", "1"]).unwrap_err();
    assert!(err.to_string().contains("is closed"), "{}", err);
}

#[test]
fn undecodable_rows_are_skipped_by_the_loader() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-01"]).unwrap();
    add(
        &conn,
        "2025-01-05",
        "expense",
        "food",
        "10",
        &["--from", "Main account"],
    )
    .unwrap();
    // a row written by hand with a category the app never produces
    conn.execute(
        "INSERT INTO movements(date, year, month, kind, category, amount,
                               from_account, to_account, note, auto, subsidy_tag)
         VALUES ('2025-01-06', 2025, 1, 'expense', 'beer', '5', 1, NULL, NULL, 0, 0)",
        [],
    )
    .unwrap();

    let movements = utils::movements_for_month(&conn, 2025, 1).unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].category, Category::Expense(ExpenseCategory::Food));
}
