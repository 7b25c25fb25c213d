// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::io;

use budgetclip::client::{self, Session, api::HttpApi};
use budgetclip::config::{ClientConfig, ServerConfig};
use budgetclip::{api, cli, config, db};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli::build_cli().get_matches();

    match matches.subcommand() {
        Some(("init", sub)) => {
            let path = config::resolve_db(sub)?;
            db::open_or_init(&path)?;
            println!("Database initialized at {}", path.display());
        }
        Some(("serve", sub)) => {
            let cfg = ServerConfig::from_matches(sub)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(api::serve(cfg))?;
        }
        Some(("app", sub)) => {
            let cfg = ClientConfig::from_matches(sub)?;
            log::debug!("client talking to {}", cfg.api_url);
            let mut session = Session::new(HttpApi::new(&cfg.api_url)?, &cfg.month)?;
            client::run(&mut session, io::stdin().lock(), io::stdout().lock())?;
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
