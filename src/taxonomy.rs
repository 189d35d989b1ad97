// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Serialize;

/// The three ledger movement kinds. A movement's category fixes its kind,
/// so an income category can never end up on an expense row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Income,
    Expense,
    Transfer,
}

impl MovementKind {
    pub const ALL: [MovementKind; 3] = [
        MovementKind::Income,
        MovementKind::Expense,
        MovementKind::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Income => "income",
            MovementKind::Expense => "expense",
            MovementKind::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Option<MovementKind> {
        Self::ALL.iter().find(|k| k.as_str() == s).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeCategory {
    Salary,
    Subsidy,
    MealCard,
    CreditCard,
    Extraordinary,
}

impl IncomeCategory {
    pub const ALL: [IncomeCategory; 5] = [
        IncomeCategory::Salary,
        IncomeCategory::Subsidy,
        IncomeCategory::MealCard,
        IncomeCategory::CreditCard,
        IncomeCategory::Extraordinary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeCategory::Salary => "salary",
            IncomeCategory::Subsidy => "subsidy",
            IncomeCategory::MealCard => "meal_card",
            IncomeCategory::CreditCard => "credit_card",
            IncomeCategory::Extraordinary => "extraordinary",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncomeCategory::Salary => "Salary",
            IncomeCategory::Subsidy => "Subsidy",
            IncomeCategory::MealCard => "Meal card",
            IncomeCategory::CreditCard => "Credit card",
            IncomeCategory::Extraordinary => "Extraordinary",
        }
    }

    pub fn parse(s: &str) -> Option<IncomeCategory> {
        Self::ALL.iter().find(|c| c.as_str() == s).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Rent,
    Utilities,
    Food,
    Leisure,
    ShitMoney,
    Transport,
    Health,
    Shopping,
    Subscriptions,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::Rent,
        ExpenseCategory::Utilities,
        ExpenseCategory::Food,
        ExpenseCategory::Leisure,
        ExpenseCategory::ShitMoney,
        ExpenseCategory::Transport,
        ExpenseCategory::Health,
        ExpenseCategory::Shopping,
        ExpenseCategory::Subscriptions,
    ];

    /// Day-to-day necessities, used for the essential-share metric.
    pub const ESSENTIAL: [ExpenseCategory; 6] = [
        ExpenseCategory::Rent,
        ExpenseCategory::Utilities,
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Health,
        ExpenseCategory::Shopping,
    ];

    /// Recurring commitments with a fixed monthly size.
    pub const FIXED: [ExpenseCategory; 3] = [
        ExpenseCategory::Rent,
        ExpenseCategory::Utilities,
        ExpenseCategory::Subscriptions,
    ];

    pub const FUN: [ExpenseCategory; 2] = [ExpenseCategory::Leisure, ExpenseCategory::ShitMoney];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Food => "food",
            ExpenseCategory::Leisure => "leisure",
            ExpenseCategory::ShitMoney => "shit_money",
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Health => "health",
            ExpenseCategory::Shopping => "shopping",
            ExpenseCategory::Subscriptions => "subscriptions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Leisure => "Leisure",
            ExpenseCategory::ShitMoney => "Shit money",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Health => "Health",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Subscriptions => "Subscriptions",
        }
    }

    pub fn parse(s: &str) -> Option<ExpenseCategory> {
        Self::ALL.iter().find(|c| c.as_str() == s).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferCategory {
    Savings,
    CryptoCore,
    CryptoShit,
    Buffer,
}

impl TransferCategory {
    pub const ALL: [TransferCategory; 4] = [
        TransferCategory::Savings,
        TransferCategory::CryptoCore,
        TransferCategory::CryptoShit,
        TransferCategory::Buffer,
    ];

    pub const CRYPTO: [TransferCategory; 2] =
        [TransferCategory::CryptoCore, TransferCategory::CryptoShit];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferCategory::Savings => "savings",
            TransferCategory::CryptoCore => "crypto_core",
            TransferCategory::CryptoShit => "crypto_shit",
            TransferCategory::Buffer => "buffer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransferCategory::Savings => "Savings transfer",
            TransferCategory::CryptoCore => "Crypto core buy",
            TransferCategory::CryptoShit => "Crypto shit buy",
            TransferCategory::Buffer => "Buffer top-up",
        }
    }

    pub fn parse(s: &str) -> Option<TransferCategory> {
        Self::ALL.iter().find(|c| c.as_str() == s).copied()
    }
}

/// A category tagged with the movement kind it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Category {
    Income(IncomeCategory),
    Expense(ExpenseCategory),
    Transfer(TransferCategory),
}

impl Category {
    pub fn kind(&self) -> MovementKind {
        match self {
            Category::Income(_) => MovementKind::Income,
            Category::Expense(_) => MovementKind::Expense,
            Category::Transfer(_) => MovementKind::Transfer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Income(c) => c.as_str(),
            Category::Expense(c) => c.as_str(),
            Category::Transfer(c) => c.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Income(c) => c.label(),
            Category::Expense(c) => c.label(),
            Category::Transfer(c) => c.label(),
        }
    }

    /// Resolve a stored category key for a given kind. Returns None for keys
    /// that do not exist under that kind, e.g. a transfer key on an expense.
    pub fn parse(kind: MovementKind, s: &str) -> Option<Category> {
        match kind {
            MovementKind::Income => IncomeCategory::parse(s).map(Category::Income),
            MovementKind::Expense => ExpenseCategory::parse(s).map(Category::Expense),
            MovementKind::Transfer => TransferCategory::parse(s).map(Category::Transfer),
        }
    }

    /// Every valid key for a kind, for CLI help and error messages.
    pub fn keys_for(kind: MovementKind) -> Vec<&'static str> {
        match kind {
            MovementKind::Income => IncomeCategory::ALL.iter().map(|c| c.as_str()).collect(),
            MovementKind::Expense => ExpenseCategory::ALL.iter().map(|c| c.as_str()).collect(),
            MovementKind::Transfer => TransferCategory::ALL.iter().map(|c| c.as_str()).collect(),
        }
    }
}
