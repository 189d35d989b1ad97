// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rusqlite::Row;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::taxonomy::{Category, ExpenseCategory, MovementKind, TransferCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Current,
    MealCard,
    CreditCard,
    Savings,
    CryptoCore,
    CryptoShit,
}

impl AccountType {
    pub const ALL: [AccountType; 6] = [
        AccountType::Current,
        AccountType::MealCard,
        AccountType::CreditCard,
        AccountType::Savings,
        AccountType::CryptoCore,
        AccountType::CryptoShit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Current => "current",
            AccountType::MealCard => "meal_card",
            AccountType::CreditCard => "credit_card",
            AccountType::Savings => "savings",
            AccountType::CryptoCore => "crypto_core",
            AccountType::CryptoShit => "crypto_shit",
        }
    }

    pub fn parse(s: &str) -> Option<AccountType> {
        Self::ALL.iter().find(|t| t.as_str() == s).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub kind: AccountType,
    pub active: bool,
}

/// First account of the given type wins; duplicates are tolerated.
pub fn account_of_type(accounts: &[Account], kind: AccountType) -> Option<&Account> {
    accounts.iter().find(|a| a.kind == kind)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountBalance {
    pub id: i64,
    pub account_id: i64,
    pub year: i32,
    pub month: u32,
    pub opening: Decimal,
    pub current: Decimal,
}

#[derive(Debug, Error, PartialEq)]
pub enum MovementError {
    #[error("movement amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("expense movements debit exactly one source account")]
    ExpenseAccounts,
    #[error("income movements credit exactly one destination account")]
    IncomeAccounts,
    #[error("transfer movements need distinct source and destination accounts")]
    TransferAccounts,
}

/// A single ledger entry. The category carries the movement kind, so a
/// category/kind mismatch cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movement {
    pub id: i64,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub category: Category,
    pub amount: Decimal,
    pub from_account: Option<i64>,
    pub to_account: Option<i64>,
    pub note: Option<String>,
    pub auto: bool,
    pub subsidy_tag: bool,
}

impl Movement {
    pub fn new(
        date: NaiveDate,
        category: Category,
        amount: Decimal,
        from_account: Option<i64>,
        to_account: Option<i64>,
        note: Option<String>,
    ) -> Result<Movement, MovementError> {
        if amount <= Decimal::ZERO {
            return Err(MovementError::NonPositiveAmount(amount));
        }
        match category.kind() {
            MovementKind::Expense => {
                if from_account.is_none() || to_account.is_some() {
                    return Err(MovementError::ExpenseAccounts);
                }
            }
            MovementKind::Income => {
                if to_account.is_none() || from_account.is_some() {
                    return Err(MovementError::IncomeAccounts);
                }
            }
            MovementKind::Transfer => {
                if from_account.is_none() || to_account.is_none() || from_account == to_account {
                    return Err(MovementError::TransferAccounts);
                }
            }
        }
        Ok(Movement {
            id: 0,
            date,
            year: date.year(),
            month: date.month(),
            category,
            amount,
            from_account,
            to_account,
            note,
            auto: false,
            subsidy_tag: false,
        })
    }

    pub fn kind(&self) -> MovementKind {
        self.category.kind()
    }
}

/// One budget month. Loading goes through `from_row`, which back-fills every
/// nullable column once so the rest of the code never null-coalesces:
/// percentages fall back to the stock split, actual fixed/food spend falls
/// back to the planned figures, planned rent falls back to the fixed total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Month {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub closed: bool,
    pub closed_at: Option<String>,
    pub income_base: Decimal,
    pub income_meal_card: Decimal,
    pub income_extra: Decimal,
    pub subsidy_applied: bool,
    pub subsidy_amount: Decimal,
    pub fixed_expenses: Decimal,
    pub actual_fixed: Decimal,
    pub actual_food: Decimal,
    pub available_cash: Decimal,
    pub planned_rent: Decimal,
    pub planned_utilities: Decimal,
    pub planned_food: Decimal,
    pub planned_leisure: Decimal,
    pub planned_shit_money: Decimal,
    pub planned_transport: Decimal,
    pub planned_health: Decimal,
    pub planned_shopping: Decimal,
    pub planned_subscriptions: Decimal,
    pub planned_buffer: Decimal,
    pub planned_savings: Decimal,
    pub planned_crypto_core: Decimal,
    pub planned_crypto_shit: Decimal,
    pub dist_core: Decimal,
    pub dist_shit: Decimal,
    pub dist_savings: Decimal,
    pub dist_fun: Decimal,
    pub dist_buffer: Decimal,
    pub sub_dist_savings: Decimal,
    pub sub_dist_core: Decimal,
    pub sub_dist_shit: Decimal,
    pub sub_dist_fun: Decimal,
}

impl Month {
    /// A blank month with the stock distribution split and zeroed figures.
    pub fn new(year: i32, month: u32) -> Month {
        Month {
            id: 0,
            year,
            month,
            closed: false,
            closed_at: None,
            income_base: Decimal::ZERO,
            income_meal_card: Decimal::ZERO,
            income_extra: Decimal::ZERO,
            subsidy_applied: false,
            subsidy_amount: Decimal::ZERO,
            fixed_expenses: Decimal::ZERO,
            actual_fixed: Decimal::ZERO,
            actual_food: Decimal::ZERO,
            available_cash: Decimal::ZERO,
            planned_rent: Decimal::ZERO,
            planned_utilities: Decimal::ZERO,
            planned_food: Decimal::ZERO,
            planned_leisure: Decimal::ZERO,
            planned_shit_money: Decimal::ZERO,
            planned_transport: Decimal::ZERO,
            planned_health: Decimal::ZERO,
            planned_shopping: Decimal::ZERO,
            planned_subscriptions: Decimal::ZERO,
            planned_buffer: Decimal::ZERO,
            planned_savings: Decimal::ZERO,
            planned_crypto_core: Decimal::ZERO,
            planned_crypto_shit: Decimal::ZERO,
            dist_core: Decimal::new(25, 2),
            dist_shit: Decimal::new(10, 2),
            dist_savings: Decimal::new(25, 2),
            dist_fun: Decimal::new(25, 2),
            dist_buffer: Decimal::new(15, 2),
            sub_dist_savings: Decimal::new(35, 2),
            sub_dist_core: Decimal::new(30, 2),
            sub_dist_shit: Decimal::new(10, 2),
            sub_dist_fun: Decimal::new(25, 2),
        }
    }

    pub fn from_row(r: &Row) -> rusqlite::Result<Month> {
        let stock = Month::new(0, 1);
        let fixed_expenses = dec_col(r, "fixed_expenses")?.unwrap_or(Decimal::ZERO);
        let planned_food = dec_col(r, "planned_food")?.unwrap_or(Decimal::ZERO);
        Ok(Month {
            id: r.get("id")?,
            year: r.get("year")?,
            month: r.get("month")?,
            closed: r.get::<_, i64>("closed")? != 0,
            closed_at: r.get("closed_at")?,
            income_base: dec_col(r, "income_base")?.unwrap_or(Decimal::ZERO),
            income_meal_card: dec_col(r, "income_meal_card")?.unwrap_or(Decimal::ZERO),
            income_extra: dec_col(r, "income_extra")?.unwrap_or(Decimal::ZERO),
            subsidy_applied: r.get::<_, i64>("subsidy_applied")? != 0,
            subsidy_amount: dec_col(r, "subsidy_amount")?.unwrap_or(Decimal::ZERO),
            fixed_expenses,
            actual_fixed: dec_col(r, "actual_fixed")?.unwrap_or(fixed_expenses),
            actual_food: dec_col(r, "actual_food")?.unwrap_or(planned_food),
            available_cash: dec_col(r, "available_cash")?.unwrap_or(Decimal::ZERO),
            planned_rent: dec_col(r, "planned_rent")?.unwrap_or(fixed_expenses),
            planned_utilities: dec_col(r, "planned_utilities")?.unwrap_or(Decimal::ZERO),
            planned_food,
            planned_leisure: dec_col(r, "planned_leisure")?.unwrap_or(Decimal::ZERO),
            planned_shit_money: dec_col(r, "planned_shit_money")?.unwrap_or(Decimal::ZERO),
            planned_transport: dec_col(r, "planned_transport")?.unwrap_or(Decimal::ZERO),
            planned_health: dec_col(r, "planned_health")?.unwrap_or(Decimal::ZERO),
            planned_shopping: dec_col(r, "planned_shopping")?.unwrap_or(Decimal::ZERO),
            planned_subscriptions: dec_col(r, "planned_subscriptions")?.unwrap_or(Decimal::ZERO),
            planned_buffer: dec_col(r, "planned_buffer")?.unwrap_or(Decimal::ZERO),
            planned_savings: dec_col(r, "planned_savings")?.unwrap_or(Decimal::ZERO),
            planned_crypto_core: dec_col(r, "planned_crypto_core")?.unwrap_or(Decimal::ZERO),
            planned_crypto_shit: dec_col(r, "planned_crypto_shit")?.unwrap_or(Decimal::ZERO),
            dist_core: dec_col(r, "dist_core")?.unwrap_or(stock.dist_core),
            dist_shit: dec_col(r, "dist_shit")?.unwrap_or(stock.dist_shit),
            dist_savings: dec_col(r, "dist_savings")?.unwrap_or(stock.dist_savings),
            dist_fun: dec_col(r, "dist_fun")?.unwrap_or(stock.dist_fun),
            dist_buffer: dec_col(r, "dist_buffer")?.unwrap_or(stock.dist_buffer),
            sub_dist_savings: dec_col(r, "sub_dist_savings")?.unwrap_or(stock.sub_dist_savings),
            sub_dist_core: dec_col(r, "sub_dist_core")?.unwrap_or(stock.sub_dist_core),
            sub_dist_shit: dec_col(r, "sub_dist_shit")?.unwrap_or(stock.sub_dist_shit),
            sub_dist_fun: dec_col(r, "sub_dist_fun")?.unwrap_or(stock.sub_dist_fun),
        })
    }

    pub fn planned_expense(&self, cat: ExpenseCategory) -> Decimal {
        match cat {
            ExpenseCategory::Rent => self.planned_rent,
            ExpenseCategory::Utilities => self.planned_utilities,
            ExpenseCategory::Food => self.planned_food,
            ExpenseCategory::Leisure => self.planned_leisure,
            ExpenseCategory::ShitMoney => self.planned_shit_money,
            ExpenseCategory::Transport => self.planned_transport,
            ExpenseCategory::Health => self.planned_health,
            ExpenseCategory::Shopping => self.planned_shopping,
            ExpenseCategory::Subscriptions => self.planned_subscriptions,
        }
    }

    pub fn planned_transfer(&self, cat: TransferCategory) -> Decimal {
        match cat {
            TransferCategory::Savings => self.planned_savings,
            TransferCategory::CryptoCore => self.planned_crypto_core,
            TransferCategory::CryptoShit => self.planned_crypto_shit,
            TransferCategory::Buffer => self.planned_buffer,
        }
    }

    pub fn ym(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

fn dec_col(r: &Row, col: &'static str) -> rusqlite::Result<Option<Decimal>> {
    let v: Option<String> = r.get(col)?;
    match v {
        None => Ok(None),
        Some(s) => s.trim().parse::<Decimal>().map(Some).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        }),
    }
}
