//! The proxy's command-line front end.
//!
//! [`command`] builds the full flag surface from [`ProxyConfig`]'s field table;
//! [`resolve`] turns the parsed matches into the final configuration:
//!
//! 1. start from the instance the flags were synthesized from,
//! 2. if `--config` (or `PROXY_CONFIG_FILE`) names a file, lay it over that instance,
//! 3. bind every explicitly-set flag on top.
//!
//! Any error means the proxy must not start.

use std::path::Path;

use clap::{ArgMatches, Command};

use crate::bind::{ParsedFlags, bind};
use crate::error::FlagbindError;
use crate::file::overlay_config_file;
use crate::proxy::{ENV_PREFIX, ProxyConfig};
use crate::synth::{FlagDefinition, synthesize};

pub const PROG: &str = "flagbind";
pub const DESCRIPTION: &str = "is a proxy using the openid service for auth and authorization";

pub fn command(defaults: &ProxyConfig) -> Result<Command, FlagbindError> {
    let flags = synthesize(defaults, ENV_PREFIX)?;
    Ok(Command::new(PROG)
        .version(env!("CARGO_PKG_VERSION"))
        .about(DESCRIPTION)
        .override_usage(format!("{PROG} [options]"))
        .args(flags.iter().map(FlagDefinition::to_arg)))
}

pub fn resolve(matches: &ArgMatches, defaults: ProxyConfig) -> Result<ProxyConfig, FlagbindError> {
    let config_file = matches.string("config");
    let mut config = if config_file.is_empty() {
        defaults
    } else {
        overlay_config_file(&defaults, Path::new(&config_file), true)?
    };

    bind(matches, &mut config)?;
    Ok(config)
}
