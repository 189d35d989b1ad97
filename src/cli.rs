// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Month to act on (defaults to the current month)")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn amount_opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).value_name("AMOUNT").help(help)
}

pub fn build_cli() -> Command {
    Command::new("bucketeer")
        .about("Monthly pay distribution, bucket budgeting, and savings nudges")
        .version(clap::crate_version!())
        .arg_required_else_help(true)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(month_cmd())
        .subcommand(payday_cmd())
        .subcommand(mov_cmd())
        .subcommand(account_cmd())
        .subcommand(dashboard_cmd())
        .subcommand(settings_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}

fn month_cmd() -> Command {
    Command::new("month")
        .about("Create, inspect and manage budget months")
        .subcommand(
            Command::new("new")
                .about("Create a month seeded from settings, carrying forward balances")
                .arg(month_arg()),
        )
        .subcommand(json_flags(
            Command::new("list").about("List all stored months"),
        ))
        .subcommand(json_flags(
            Command::new("show")
                .about("Show a month's inputs, plan and distribution")
                .arg(month_arg()),
        ))
        .subcommand(
            Command::new("set")
                .about("Edit a month's income and plan figures")
                .arg(month_arg())
                .arg(amount_opt("base", "Base income"))
                .arg(amount_opt("meal-card", "Meal card income"))
                .arg(amount_opt("extra", "Extraordinary income"))
                .arg(amount_opt("fixed", "Actual fixed expenses"))
                .arg(amount_opt("food", "Actual food expenses"))
                .arg(amount_opt("subsidy", "Subsidy amount (sets the applied flag)"))
                .arg(
                    Arg::new("no-subsidy")
                        .long("no-subsidy")
                        .action(ArgAction::SetTrue)
                        .help("Clear the subsidy"),
                )
                .arg(amount_opt(
                    "plan-savings",
                    "Planned savings target (re-derives the base split)",
                ))
                .arg(amount_opt(
                    "plan-crypto-core",
                    "Planned crypto core target (re-derives the base split)",
                ))
                .arg(amount_opt(
                    "plan-shit-money",
                    "Planned shit money target (re-derives the base split)",
                ))
                .arg(amount_opt(
                    "plan-leisure",
                    "Planned leisure target (re-derives the base split)",
                ))
                .arg(amount_opt(
                    "plan-buffer",
                    "Planned buffer target (re-derives the base split)",
                ))
                .arg(amount_opt("plan-crypto-shit", "Planned crypto shit amount"))
                .arg(amount_opt("plan-rent", "Planned rent"))
                .arg(amount_opt("plan-utilities", "Planned utilities"))
                .arg(amount_opt("plan-food", "Planned food"))
                .arg(amount_opt("plan-transport", "Planned transport"))
                .arg(amount_opt("plan-health", "Planned health"))
                .arg(amount_opt("plan-shopping", "Planned shopping"))
                .arg(amount_opt("plan-subscriptions", "Planned subscriptions")),
        )
        .subcommand(
            Command::new("close")
                .about("Close a month and create the next one")
                .arg(month_arg()),
        )
        .subcommand(
            Command::new("reopen")
                .about("Reopen a closed month")
                .arg(month_arg()),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a month with its movements and balances")
                .arg(month_arg().required(true))
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Confirm the deletion"),
                ),
        )
}

fn payday_cmd() -> Command {
    Command::new("payday")
        .about("Book the month's incomes and apply the distribution")
        .arg(month_arg())
        .arg(amount_opt("base", "Override the base income"))
        .arg(amount_opt("meal-card", "Override the meal card income"))
        .arg(amount_opt(
            "extra",
            "Extra income received (becomes the subsidy in June/December)",
        ))
        .subcommand(
            Command::new("fund-cards")
                .about("Record meal/credit card funding for the month")
                .arg(month_arg())
                .arg(amount_opt("meal", "Meal card funding amount"))
                .arg(amount_opt("credit", "Credit card funding amount")),
        )
}

fn mov_cmd() -> Command {
    Command::new("mov")
        .about("Record and browse ledger movements")
        .subcommand(
            Command::new("add")
                .about("Record a movement")
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD")
                        .required(true),
                )
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_name("KIND")
                        .required(true)
                        .help("income, expense or transfer"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_name("KEY")
                        .required(true),
                )
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .value_name("AMOUNT")
                        .required(true),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_name("ACCOUNT")
                        .help("Source account name (expenses, transfers)"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_name("ACCOUNT")
                        .help("Destination account name (incomes, transfers)"),
                )
                .arg(Arg::new("note").long("note").value_name("TEXT")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List movements")
                .arg(month_arg())
                .arg(Arg::new("kind").long("kind").value_name("KIND"))
                .arg(Arg::new("category").long("category").value_name("KEY"))
                .arg(Arg::new("account").long("account").value_name("ACCOUNT"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_name("N")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("rm").about("Delete a movement").arg(
                Arg::new("id")
                    .long("id")
                    .value_name("ID")
                    .required(true)
                    .value_parser(value_parser!(i64)),
            ),
        )
}

fn account_cmd() -> Command {
    Command::new("account")
        .about("List accounts and edit their monthly balances")
        .subcommand(json_flags(
            Command::new("list")
                .about("List accounts with balances for a month")
                .arg(month_arg()),
        ))
        .subcommand(
            Command::new("set-balance")
                .about("Record a manually checked account balance")
                .arg(
                    Arg::new("account")
                        .long("account")
                        .value_name("ACCOUNT")
                        .required(true),
                )
                .arg(month_arg())
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .value_name("AMOUNT")
                        .required(true),
                )
                .arg(
                    Arg::new("opening")
                        .long("opening")
                        .action(ArgAction::SetTrue)
                        .help("Set the opening balance instead of the current one"),
                ),
        )
}

fn dashboard_cmd() -> Command {
    json_flags(
        Command::new("dashboard")
            .about("Month at a glance: totals, buckets and suggestions")
            .arg(month_arg()),
    )
}

fn settings_cmd() -> Command {
    Command::new("settings")
        .about("Show and change the seeding defaults")
        .subcommand(json_flags(
            Command::new("show").about("List every setting with its effective value"),
        ))
        .subcommand(
            Command::new("set")
                .about("Change a setting")
                .arg(Arg::new("key").long("key").value_name("KEY").required(true))
                .arg(
                    Arg::new("value")
                        .long("value")
                        .value_name("VALUE")
                        .required(true),
                ),
        )
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Export stored data to files")
        .subcommand(
            Command::new("movements")
                .about("Export movements as CSV or JSON")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_name("FMT")
                        .required(true)
                        .help("csv or json"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_name("PATH")
                        .required(true),
                )
                .arg(month_arg()),
        )
}
