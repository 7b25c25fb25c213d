// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_API: &str = "http://127.0.0.1:3000";

/// Where the server keeps its data and listens.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub listen: SocketAddr,
}

impl ServerConfig {
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let db_path = resolve_db(m)?;
        let raw = m
            .get_one::<String>("listen")
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_LISTEN);
        let listen = raw
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid listen address '{}'", raw))?;
        Ok(Self { db_path, listen })
    }
}

/// Settings for the interactive client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub month: String,
}

impl ClientConfig {
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let api_url = m
            .get_one::<String>("api")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API.to_string());
        let month = match m.get_one::<String>("month") {
            Some(s) => crate::utils::parse_month(s)?,
            None => crate::utils::current_month(),
        };
        Ok(Self { api_url, month })
    }
}

pub fn resolve_db(m: &clap::ArgMatches) -> Result<PathBuf> {
    match m.get_one::<String>("db") {
        Some(p) => Ok(PathBuf::from(p.trim())),
        None => crate::db::db_path(),
    }
}
