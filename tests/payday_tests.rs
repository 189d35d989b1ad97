// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bucketeer::{cli, commands, db, settings, utils};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    db::seed_defaults(&conn).unwrap();
    settings::set(&conn, "income_meal_card", "210").unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("month", sub)) => commands::months::handle(conn, sub),
        Some(("payday", sub)) => commands::payday::handle(conn, sub),
        _ => panic!("unhandled command"),
    }
}

// (amount, to_account, subsidy_tag, date) of the auto booking, if any
fn auto_income(conn: &Connection, year: i32, month: u32, cat: &str) -> Option<(String, i64, i64, String)> {
    conn.query_row(
        "SELECT amount, to_account, subsidy_tag, date FROM movements
         WHERE year=?1 AND month=?2 AND kind='income' AND category=?3 AND auto=1",
        params![year, month, cat],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
    )
    .optional()
    .unwrap()
}

#[test]
fn payday_books_the_salary_to_the_main_account() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(&conn, &["bucketeer", "payday", "--month", "2025-03"]).unwrap();

    let main_id = utils::id_for_account(&conn, "Main account").unwrap();
    let (amount, to, tag, date) = auto_income(&conn, 2025, 3, "salary").unwrap();
    assert_eq!(amount, "1168");
    assert_eq!(to, main_id);
    assert_eq!(tag, 0);
    // payday_day 30 fits March
    assert_eq!(date, "2025-03-30");

    assert!(auto_income(&conn, 2025, 3, "extraordinary").is_none());
    assert!(auto_income(&conn, 2025, 3, "subsidy").is_none());
    // card funding is a separate step
    assert!(auto_income(&conn, 2025, 3, "meal_card").is_none());
}

#[test]
fn fund_cards_books_the_meal_card_income() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(
        &conn,
        &["bucketeer", "payday", "fund-cards", "--month", "2025-03"],
    )
    .unwrap();

    let meal_id = utils::id_for_account(&conn, "Meal card").unwrap();
    let (amount, to, tag, _) = auto_income(&conn, 2025, 3, "meal_card").unwrap();
    assert_eq!(amount, "210");
    assert_eq!(to, meal_id);
    assert_eq!(tag, 0);
    assert!(auto_income(&conn, 2025, 3, "credit_card").is_none());
}

#[test]
fn fund_cards_override_updates_the_month_figure() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(
        &conn,
        &[
            "bucketeer",
            "payday",
            "fund-cards",
            "--month",
            "2025-03",
            "--meal",
            "180",
        ],
    )
    .unwrap();

    let m = utils::month_by_ym(&conn, 2025, 3).unwrap().unwrap();
    assert_eq!(m.income_meal_card, dec("180"));
    let (amount, _, _, _) = auto_income(&conn, 2025, 3, "meal_card").unwrap();
    assert_eq!(amount, "180");
}

#[test]
fn rerunning_payday_replaces_instead_of_duplicating() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(&conn, &["bucketeer", "payday", "--month", "2025-03"]).unwrap();
    run(
        &conn,
        &[
            "bucketeer", "payday", "--month", "2025-03", "--base", "1200",
        ],
    )
    .unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM movements
             WHERE year=2025 AND month=3 AND category='salary' AND auto=1",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
    let (amount, _, _, _) = auto_income(&conn, 2025, 3, "salary").unwrap();
    assert_eq!(amount, "1200");
}

#[test]
fn zeroed_extra_pay_removes_its_booking() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(
        &conn,
        &["bucketeer", "payday", "--month", "2025-03", "--extra", "50"],
    )
    .unwrap();
    assert!(auto_income(&conn, 2025, 3, "extraordinary").is_some());

    run(
        &conn,
        &["bucketeer", "payday", "--month", "2025-03", "--extra", "0"],
    )
    .unwrap();
    assert!(auto_income(&conn, 2025, 3, "extraordinary").is_none());
}

#[test]
fn june_extra_pay_becomes_the_subsidy() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2024-06"]).unwrap();
    run(
        &conn,
        &[
            "bucketeer", "payday", "--month", "2024-06", "--extra", "934",
        ],
    )
    .unwrap();

    let m = utils::month_by_ym(&conn, 2024, 6).unwrap().unwrap();
    assert!(m.subsidy_applied);
    assert_eq!(m.subsidy_amount, dec("934"));
    assert_eq!(m.income_extra, Decimal::ZERO);
    assert_eq!(m.available_cash, dec("1622.00"));

    let main_id = utils::id_for_account(&conn, "Main account").unwrap();
    let (amount, to, tag, _) = auto_income(&conn, 2024, 6, "subsidy").unwrap();
    assert_eq!(amount, "934");
    assert_eq!(to, main_id);
    assert_eq!(tag, 1);
    assert!(auto_income(&conn, 2024, 6, "extraordinary").is_none());
}

#[test]
fn june_subsidy_survives_a_plain_rerun_but_not_an_explicit_zero() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2024-06"]).unwrap();
    run(
        &conn,
        &[
            "bucketeer", "payday", "--month", "2024-06", "--extra", "934",
        ],
    )
    .unwrap();

    // rerun without the flag: the earlier answer stands
    run(&conn, &["bucketeer", "payday", "--month", "2024-06"]).unwrap();
    let m = utils::month_by_ym(&conn, 2024, 6).unwrap().unwrap();
    assert!(m.subsidy_applied);
    assert!(auto_income(&conn, 2024, 6, "subsidy").is_some());

    // an explicit zero withdraws the subsidy
    run(
        &conn,
        &["bucketeer", "payday", "--month", "2024-06", "--extra", "0"],
    )
    .unwrap();
    let m = utils::month_by_ym(&conn, 2024, 6).unwrap().unwrap();
    assert!(!m.subsidy_applied);
    assert_eq!(m.subsidy_amount, Decimal::ZERO);
    assert_eq!(m.available_cash, dec("688.00"));
    assert!(auto_income(&conn, 2024, 6, "subsidy").is_none());
}

#[test]
fn march_extra_pay_stays_extraordinary() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(
        &conn,
        &[
            "bucketeer", "payday", "--month", "2025-03", "--extra", "100",
        ],
    )
    .unwrap();

    let m = utils::month_by_ym(&conn, 2025, 3).unwrap().unwrap();
    assert!(!m.subsidy_applied);
    // 1168 + 100 - 480
    assert_eq!(m.available_cash, dec("788.00"));

    let (amount, _, tag, _) = auto_income(&conn, 2025, 3, "extraordinary").unwrap();
    assert_eq!(amount, "100");
    assert_eq!(tag, 0);
    assert!(auto_income(&conn, 2025, 3, "subsidy").is_none());
}

#[test]
fn credit_card_funding_toggles_with_the_amount() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(
        &conn,
        &[
            "bucketeer",
            "payday",
            "fund-cards",
            "--month",
            "2025-03",
            "--credit",
            "150",
        ],
    )
    .unwrap();

    let credit_id = utils::id_for_account(&conn, "Credit card").unwrap();
    let (amount, to, _, _) = auto_income(&conn, 2025, 3, "credit_card").unwrap();
    assert_eq!(amount, "150");
    assert_eq!(to, credit_id);

    run(
        &conn,
        &[
            "bucketeer",
            "payday",
            "fund-cards",
            "--month",
            "2025-03",
            "--credit",
            "0",
        ],
    )
    .unwrap();
    assert!(auto_income(&conn, 2025, 3, "credit_card").is_none());
}

#[test]
fn payday_on_a_closed_month_errs() {
    let conn = setup();
    run(&conn, &["bucketeer", "month", "new", "--month", "2025-03"]).unwrap();
    run(&conn, &["bucketeer", "month", "close", "--month", "2025-03"]).unwrap();
    let err = run(&conn, &["bucketeer", "payday", "--month", "2025-03"]).unwrap_err();
    assert!(err.to_string().contains("is closed"), "{}", err);
}
