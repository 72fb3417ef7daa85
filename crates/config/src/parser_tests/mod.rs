// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

mod formats;
mod loading;
mod validation;

/// Parse HCL content, panicking with the error on failure.
fn parse_hcl(content: &str) -> Config {
    match parse_config_with_format(content, Format::Hcl) {
        Ok(config) => config,
        Err(e) => panic!("HCL config failed to parse: {e}"),
    }
}

fn parse_toml(content: &str) -> Config {
    match parse_config_with_format(content, Format::Toml) {
        Ok(config) => config,
        Err(e) => panic!("TOML config failed to parse: {e}"),
    }
}

fn parse_json(content: &str) -> Config {
    match parse_config_with_format(content, Format::Json) {
        Ok(config) => config,
        Err(e) => panic!("JSON config failed to parse: {e}"),
    }
}

/// Expect an InvalidConfig error and return (location, message).
fn expect_invalid(result: Result<Config, ParseError>) -> (String, String) {
    match result {
        Err(ParseError::InvalidConfig { location, message }) => (location, message),
        Err(other) => panic!("expected InvalidConfig, got: {other}"),
        Ok(_) => panic!("expected InvalidConfig, config parsed"),
    }
}
