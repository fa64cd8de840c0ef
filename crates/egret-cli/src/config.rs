//! Configuration loading helpers for the Egret CLI.
//!
//! Configuration flags lead the command line (`egret --log-filter debug
//! check ...`). They are split off here and handed to `ortho_config`, while
//! the remaining tokens go to `clap`.

use std::ffi::{OsStr, OsString};

use egret_config::Config;
use ortho_config::OrthoConfig;

use crate::errors::AppError;

pub(crate) trait ConfigLoader {
    /// Loads configuration for the CLI from the leading configuration flags.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Stop,
}

fn classify_flag(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    if !text.starts_with("--") {
        return FlagAction::Stop;
    }

    let (flag, has_inline_value) = text
        .split_once('=')
        .map_or((&*text, false), |(name, _)| (name, true));
    if super::CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !has_inline_value,
        }
    } else {
        FlagAction::Stop
    }
}

/// Leading configuration arguments and the index where the command starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

impl ConfigArgumentSplit {
    /// Returns the program name followed by the command tokens.
    pub(crate) fn command_arguments(&self, args: &[OsString]) -> Vec<OsString> {
        args.first()
            .into_iter()
            .chain(args.iter().skip(self.command_start))
            .cloned()
            .collect()
    }
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let mut tokens = args.iter();
    let Some(program) = tokens.next() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut command_start = 1;
    while let Some(argument) = tokens.next() {
        let FlagAction::Include { needs_value } = classify_flag(argument) else {
            break;
        };
        config_arguments.push(argument.clone());
        command_start += 1;
        if needs_value && let Some(value) = tokens.next() {
            config_arguments.push(value.clone());
            command_start += 1;
        }
    }

    ConfigArgumentSplit {
        config_arguments,
        command_start,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn os_args(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    #[rstest]
    #[case::inline("--log-filter=debug", FlagAction::Include { needs_value: false })]
    #[case::separate("--log-filter", FlagAction::Include { needs_value: true })]
    #[case::subcommand("check", FlagAction::Stop)]
    #[case::unknown("--unknown", FlagAction::Stop)]
    #[case::command_flag("--regex", FlagAction::Stop)]
    fn classifies_leading_flags(#[case] argument: &str, #[case] expected: FlagAction) {
        assert_eq!(classify_flag(OsStr::new(argument)), expected);
    }

    #[test]
    fn splits_configuration_from_command() {
        let args = os_args(&[
            "egret",
            "--log-filter",
            "debug",
            "--engine-program=/opt/engine",
            "check",
            "--regex",
            "a+",
        ]);
        let split = split_config_arguments(&args);
        assert_eq!(
            split.config_arguments,
            os_args(&["egret", "--log-filter", "debug", "--engine-program=/opt/engine"])
        );
        assert_eq!(
            split.command_arguments(&args),
            os_args(&["egret", "check", "--regex", "a+"])
        );
    }

    #[test]
    fn configuration_flags_after_the_command_stay_with_it() {
        let args = os_args(&["egret", "check", "--log-filter", "debug"]);
        let split = split_config_arguments(&args);
        assert_eq!(split.config_arguments, os_args(&["egret"]));
        assert_eq!(split.command_start, 1);
    }

    #[test]
    fn empty_arguments_split_cleanly() {
        let split = split_config_arguments(&[]);
        assert!(split.config_arguments.is_empty());
        assert!(split.command_arguments(&[]).is_empty());
    }
}
