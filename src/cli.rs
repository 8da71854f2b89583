// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn movement_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("amount")
            .long("amount")
            .required(true)
            .help("Positive decimal amount"),
    )
    .arg(
        Arg::new("method")
            .long("method")
            .required(true)
            .help("Payment method: cash|card"),
    )
    .arg(Arg::new("card").long("card").help("Card name (with --method card)"))
    .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
    .arg(Arg::new("note").long("note"))
}

fn credit_tree(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand(movement_args(
            Command::new("add")
                .arg(Arg::new("person").long("person").required(true))
                .arg(
                    Arg::new("due")
                        .long("due")
                        .required(true)
                        .help("Due date, YYYY-MM-DD"),
                ),
        ))
        .subcommand(movement_args(
            Command::new("repay")
                .about("Record a repayment against an entry")
                .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64))),
        ))
        .subcommand(json_flags(Command::new("list")))
        .subcommand(json_flags(Command::new("history").arg(
            Arg::new("id").required(true).value_parser(clap::value_parser!(i64)),
        )))
        .subcommand(
            Command::new("rm")
                .about("Delete an entry, its history, and its mirrored transactions")
                .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64))),
        )
}

pub fn build_cli() -> Command {
    Command::new("pocketledger")
        .about("Personal income/expense, card, and peer-credit tracker")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("profile")
                .about("Manage profiles")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email")),
                )
                .subcommand(Command::new("use").arg(Arg::new("name").required(true)))
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("card")
                .about("Manage payment cards")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("number").long("number").required(true))
                        .arg(
                            Arg::new("expiry")
                                .long("expiry")
                                .required(true)
                                .help("MM/YY"),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("e.g. debit|credit"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income|expense"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("rename")
                        .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64)))
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64)))
                        .arg(
                            Arg::new("cascade")
                                .long("cascade")
                                .action(ArgAction::SetTrue)
                                .help("Also delete transactions using this category"),
                        ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    movement_args(
                        Command::new("add")
                            .arg(
                                Arg::new("type")
                                    .long("type")
                                    .required(true)
                                    .help("income|expense"),
                            )
                            .arg(Arg::new("category").long("category").required(true)),
                    ),
                )
                .subcommand(
                    json_flags(Command::new("list"))
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64))),
                ),
        )
        .subcommand(credit_tree("credit", "Money lent out, with repayment history"))
        .subcommand(credit_tree("owed", "Money the user owes, with repayment history"))
        .subcommand(json_flags(
            Command::new("balances").about("Derived balance per payment source"),
        ))
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Audit ledger invariants, read-only"))
}
