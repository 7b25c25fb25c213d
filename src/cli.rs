// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, Command, command};

fn db_arg() -> Arg {
    Arg::new("db")
        .long("db")
        .env("BUDGETCLIP_DB")
        .help("Path to the SQLite database (defaults to the platform data dir)")
}

pub fn build_cli() -> Command {
    command!()
        .name("budgetclip")
        .about("Personal monthly budgeting: JSON API server and terminal client")
        .subcommand(
            Command::new("init")
                .about("Create the database if needed and print its location")
                .arg(db_arg()),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the JSON API server")
                .arg(db_arg())
                .arg(
                    Arg::new("listen")
                        .long("listen")
                        .env("BUDGETCLIP_LISTEN")
                        .help("Address to bind, e.g. 127.0.0.1:3000"),
                ),
        )
        .subcommand(
            Command::new("app")
                .about("Interactive client for a running server")
                .arg(
                    Arg::new("api")
                        .long("api")
                        .env("BUDGETCLIP_API")
                        .help("Base URL of the API server"),
                )
                .arg(
                    Arg::new("month")
                        .long("month")
                        .help("Month to open with (YYYY-MM), defaults to the current one"),
                ),
        )
}
