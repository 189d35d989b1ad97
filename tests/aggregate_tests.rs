// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bucketeer::aggregate;
use bucketeer::models::{Month, Movement};
use bucketeer::taxonomy::{
    Category, ExpenseCategory, IncomeCategory, MovementKind, TransferCategory,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn expense(cat: ExpenseCategory, amount: &str) -> Movement {
    Movement::new(day(10), Category::Expense(cat), dec(amount), Some(1), None, None).unwrap()
}

fn income(cat: IncomeCategory, amount: &str) -> Movement {
    Movement::new(day(1), Category::Income(cat), dec(amount), None, Some(1), None).unwrap()
}

fn transfer(cat: TransferCategory, amount: &str) -> Movement {
    Movement::new(
        day(15),
        Category::Transfer(cat),
        dec(amount),
        Some(1),
        Some(2),
        None,
    )
    .unwrap()
}

#[test]
fn actual_maps_cover_every_category() {
    let expenses = aggregate::actual_expenses(&[]);
    assert_eq!(expenses.len(), ExpenseCategory::ALL.len());
    assert!(expenses.values().all(|v| v.is_zero()));

    let incomes = aggregate::actual_income(&[]);
    assert_eq!(incomes.len(), IncomeCategory::ALL.len());

    let transfers = aggregate::actual_transfers(&[]);
    assert_eq!(transfers.len(), TransferCategory::ALL.len());
}

#[test]
fn amounts_accumulate_per_category() {
    let movements = vec![
        expense(ExpenseCategory::Food, "12.50"),
        expense(ExpenseCategory::Food, "7.50"),
        expense(ExpenseCategory::Leisure, "30"),
    ];
    let expenses = aggregate::actual_expenses(&movements);
    assert_eq!(expenses[&ExpenseCategory::Food], dec("20.00"));
    assert_eq!(expenses[&ExpenseCategory::Leisure], dec("30.00"));
    assert_eq!(expenses[&ExpenseCategory::Rent], Decimal::ZERO);
}

#[test]
fn kinds_stay_separate() {
    let movements = vec![
        income(IncomeCategory::Salary, "1168"),
        transfer(TransferCategory::Savings, "172"),
    ];
    let expenses = aggregate::actual_expenses(&movements);
    assert!(expenses.values().all(|v| v.is_zero()));
    assert_eq!(
        aggregate::actual_transfers(&movements)[&TransferCategory::Savings],
        dec("172")
    );
    assert_eq!(
        aggregate::actual_income(&movements)[&IncomeCategory::Salary],
        dec("1168")
    );
    assert_eq!(movements[0].kind(), MovementKind::Income);
}

#[test]
fn planned_income_includes_subsidy_only_when_applied() {
    let mut m = Month::new(2025, 6);
    m.income_base = dec("1168");
    m.income_meal_card = dec("210");
    m.subsidy_amount = dec("934");

    let planned = aggregate::planned_income(&m);
    assert_eq!(planned[&IncomeCategory::Subsidy], Decimal::ZERO);
    // card funding has no planned figure of its own
    assert_eq!(planned[&IncomeCategory::CreditCard], Decimal::ZERO);

    m.subsidy_applied = true;
    let planned = aggregate::planned_income(&m);
    assert_eq!(planned[&IncomeCategory::Subsidy], dec("934"));
    assert_eq!(aggregate::total(&planned), dec("2312.00"));
}

#[test]
fn planned_expense_map_reads_the_month_plan() {
    let mut m = Month::new(2025, 3);
    m.planned_rent = dec("480");
    m.planned_food = dec("120");
    m.planned_leisure = dec("172");

    let planned = aggregate::planned_expenses(&m);
    assert_eq!(planned[&ExpenseCategory::Rent], dec("480"));
    assert_eq!(planned[&ExpenseCategory::Food], dec("120"));
    assert_eq!(aggregate::total(&planned), dec("772.00"));
}

#[test]
fn total_of_sums_only_the_requested_keys() {
    let movements = vec![
        expense(ExpenseCategory::Rent, "480"),
        expense(ExpenseCategory::Food, "120"),
        expense(ExpenseCategory::Leisure, "50"),
        expense(ExpenseCategory::ShitMoney, "20"),
    ];
    let expenses = aggregate::actual_expenses(&movements);
    assert_eq!(
        aggregate::total_of(&expenses, &ExpenseCategory::FUN),
        dec("70.00")
    );
    assert_eq!(
        aggregate::total_of(&expenses, &ExpenseCategory::FIXED),
        dec("480.00")
    );
    assert_eq!(aggregate::total(&expenses), dec("670.00"));
}
