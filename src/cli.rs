//! Clap adapter for flagbind.
//!
//! This module is the **optional integration layer** between flagbind's
//! framework-agnostic core and the [clap](https://docs.rs/clap) CLI parser.
//! It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! It bridges both directions:
//!
//! - [`FlagDefinition::to_arg`] turns a synthesized flag into a `clap::Arg`,
//!   wiring up the value parser, default and environment variable.
//! - [`ParsedFlags`] is implemented for `clap::ArgMatches`, so the binder can
//!   read the parsed values back. A flag counts as explicitly set when its
//!   value came from the command line or from its environment variable.
//!
//! Repeatable flags are never split on commas: `--scopes a,b` yields the one
//! value `"a,b"`.

use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, value_parser};

use crate::bind::ParsedFlags;
use crate::duration::{format_duration, parse_duration};
use crate::synth::{FlagDefault, FlagDefinition, FlagKind};

impl FlagDefinition {
    pub fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name)
            .long(self.name)
            .help(self.usage.clone());

        // Bool flags take an optional `=value` so that a `true` default can be
        // switched off with `--flag=false`.
        let mut arg = match self.kind {
            FlagKind::Bool => arg
                .action(ArgAction::Set)
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(BoolishValueParser::new()),
            FlagKind::String => arg.action(ArgAction::Set).value_parser(value_parser!(String)),
            FlagKind::StringList => arg
                .action(ArgAction::Append)
                .value_parser(value_parser!(String)),
            FlagKind::Integer => arg.action(ArgAction::Set).value_parser(value_parser!(i64)),
            FlagKind::Duration => arg.action(ArgAction::Set).value_parser(parse_duration),
        };

        match &self.default {
            Some(FlagDefault::String(value)) if !value.is_empty() => {
                arg = arg.default_value(value.clone());
            }
            Some(FlagDefault::Duration(value)) => {
                arg = arg.default_value(format_duration(*value));
            }
            _ => {}
        }

        if let Some(env) = &self.env {
            arg = arg.env(env.clone());
        }
        arg
    }
}

impl ParsedFlags for ArgMatches {
    fn is_set(&self, name: &str) -> bool {
        // `value_source` asserts the id exists in debug builds; schema fields
        // without a flag are never in `ids()`.
        self.ids().any(|id| id.as_str() == name)
            && matches!(
                self.value_source(name),
                Some(ValueSource::CommandLine | ValueSource::EnvVariable)
            )
    }

    fn bool(&self, name: &str) -> bool {
        self.try_get_one::<bool>(name)
            .ok()
            .flatten()
            .copied()
            .unwrap_or_default()
    }

    fn string(&self, name: &str) -> String {
        self.try_get_one::<String>(name)
            .ok()
            .flatten()
            .cloned()
            .unwrap_or_default()
    }

    fn string_list(&self, name: &str) -> Vec<String> {
        self.try_get_many::<String>(name)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }

    fn int(&self, name: &str) -> i64 {
        self.try_get_one::<i64>(name)
            .ok()
            .flatten()
            .copied()
            .unwrap_or_default()
    }

    fn duration(&self, name: &str) -> Duration {
        self.try_get_one::<Duration>(name)
            .ok()
            .flatten()
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::bind;
    use crate::fixtures::test::SampleConfig;
    use crate::proxy::ProxyConfig;
    use crate::synth::synthesize;
    use clap::Command;

    fn command(config: &SampleConfig) -> Command {
        let flags = synthesize(config, "FLAGBIND_TEST_").unwrap();
        Command::new("test").args(flags.iter().map(FlagDefinition::to_arg))
    }

    fn parse(args: &[&str]) -> ArgMatches {
        command(&SampleConfig::default())
            .try_get_matches_from(args)
            .unwrap()
    }

    #[test]
    fn defaults_do_not_count_as_set() {
        let config = SampleConfig {
            name: "default-name".into(),
            ..SampleConfig::default()
        };
        let matches = command(&config).try_get_matches_from(["test"]).unwrap();
        assert!(!matches.is_set("name"));
        assert!(!matches.is_set("timeout"));
        assert_eq!(matches.string("name"), "default-name");
    }

    #[test]
    fn unknown_names_are_never_set() {
        let matches = parse(&["test"]);
        assert!(!matches.is_set("secret"));
        assert!(!matches.is_set("no-such-flag"));
        assert_eq!(matches.string("secret"), "");
    }

    #[test]
    fn typed_getters_read_parsed_values() {
        let matches = parse(&[
            "test",
            "--verbose",
            "--name",
            "edge",
            "--workers",
            "8",
            "--timeout",
            "1m30s",
            "--peers",
            "a:1",
            "--peers",
            "b:2,c:3",
        ]);
        assert!(matches.is_set("verbose"));
        assert!(matches.bool("verbose"));
        assert_eq!(matches.string("name"), "edge");
        assert_eq!(matches.int("workers"), 8);
        assert_eq!(matches.duration("timeout"), Duration::from_secs(90));
        assert_eq!(matches.string_list("peers"), vec!["a:1", "b:2,c:3"]);
    }

    #[test]
    fn bool_accepts_explicit_false() {
        let config = SampleConfig {
            verbose: true,
            ..SampleConfig::default()
        };
        let matches = command(&config)
            .try_get_matches_from(["test", "--verbose=false"])
            .unwrap();
        assert!(matches.is_set("verbose"));
        assert!(!matches.bool("verbose"));
    }

    #[test]
    fn bad_values_are_usage_errors() {
        let cmd = command(&SampleConfig::default());
        assert!(
            cmd.clone()
                .try_get_matches_from(["test", "--workers", "many"])
                .is_err()
        );
        assert!(
            cmd.try_get_matches_from(["test", "--timeout", "soon"])
                .is_err()
        );
    }

    #[test]
    fn undocumented_field_has_no_flag() {
        let result = command(&SampleConfig::default())
            .try_get_matches_from(["test", "--secret", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn end_to_end_binding() {
        let matches = parse(&[
            "test",
            "--name",
            "edge",
            "--labels",
            "b=3",
            "--labels",
            "c=4",
            "--rules",
            "uri=/admin|roles=admin",
        ]);
        let mut config = SampleConfig::default();
        config.labels.insert("a".into(), "1".into());
        bind(&matches, &mut config).unwrap();

        assert_eq!(config.name, "edge");
        assert_eq!(config.labels.len(), 3);
        assert_eq!(config.labels["c"], "4");
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].roles, vec!["admin"]);
        assert_eq!(config.timeout, Duration::ZERO);
    }

    #[test]
    fn environment_values_count_as_set() {
        // Names are unique to this test, so parallel tests never see them.
        unsafe {
            std::env::set_var("FLAGBIND_ENV_TEST_ENABLE_LOGGING", "true");
            std::env::set_var("FLAGBIND_ENV_TEST_UPSTREAM_TIMEOUT", "3s");
            std::env::set_var("FLAGBIND_ENV_TEST_MAX_IDLE_CONNS", "5");
            std::env::remove_var("FLAGBIND_ENV_TEST_SERVER_READ_TIMEOUT");
        }
        let defaults = ProxyConfig::default();
        let flags = synthesize(&defaults, "FLAGBIND_ENV_TEST_").unwrap();
        let matches = Command::new("test")
            .args(flags.iter().map(FlagDefinition::to_arg))
            .try_get_matches_from(["test"])
            .unwrap();

        assert!(matches.is_set("enable-logging"));
        assert!(matches.is_set("upstream-timeout"));
        assert!(matches.is_set("max-idle-connections"));
        assert!(!matches.is_set("server-read-timeout"));

        let mut config = defaults.clone();
        bind(&matches, &mut config).unwrap();
        assert!(config.enable_logging);
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
        assert_eq!(config.max_idle_connections, 5);
        assert_eq!(config.server_read_timeout, defaults.server_read_timeout);
        assert_eq!(config.max_idle_connections_per_host, 50);
    }
}
