/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::ArgMatches;
use log::{info, Level};

use crate::errors::CliErrors;
use crate::formats::{parse_format_pair, FormatPair};

#[derive(Debug, Clone)]
pub struct CmdOptions {
    pub input:       PathBuf,
    /// Derived from the input and the output format when absent
    pub output:      Option<PathBuf>,
    pub mode:        u16,
    pub formats:     FormatPair,
    pub overwrite:   bool,
    pub strict_mode: bool
}

impl CmdOptions {
    pub fn new(input: PathBuf, output: PathBuf) -> CmdOptions {
        CmdOptions::with_input(input, Some(output))
    }

    pub fn with_input(input: PathBuf, output: Option<PathBuf>) -> CmdOptions {
        CmdOptions {
            input,
            output,
            mode: 0,
            formats: (None, None),
            overwrite: false,
            strict_mode: false
        }
    }
}

pub fn parse_options(options: &ArgMatches) -> Result<CmdOptions, CliErrors> {
    let input = options
        .get_one::<PathBuf>("input")
        .ok_or_else(|| CliErrors::Usage("Missing input file".to_string()))?;
    let output = options.get_one::<PathBuf>("output").cloned();

    let mut cmd_options = CmdOptions::with_input(input.clone(), output);

    if let Some(mode) = options.get_one::<u16>("mode") {
        info!("Setting mode to {mode}");
        cmd_options.mode = *mode;
    }
    if let Some(pair) = options.get_one::<String>("format") {
        let formats = parse_format_pair(pair)?;
        info!("Formats given: {formats:?}");
        cmd_options.formats = formats;
    }
    if options.get_flag("overwrite") {
        info!("Overwriting existing output");
        cmd_options.overwrite = true;
    }
    if options.get_flag("strict") {
        info!("Enabling strict mode");
        cmd_options.strict_mode = true;
    }
    Ok(cmd_options)
}

/// Pick the log level from the logging flags, warnings when none is given
pub fn log_level(options: &ArgMatches) -> Level {
    if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("warn") {
        Level::Warn
    } else if options.get_flag("info") {
        Level::Info
    } else {
        Level::Warn
    }
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = log_level(options);

    if let Err(err) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not initialize logger: {err}");
        return;
    }
    info!("Initialized logger");
    info!("Log level :{}", log_level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd_args::create_cmd_args;
    use crate::formats::ImageFormat;

    fn matches(args: &[&str]) -> ArgMatches {
        create_cmd_args().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn defaults() {
        let options = parse_options(&matches(&["rdc", "a.bmp", "b.rdi"])).unwrap();

        assert_eq!(options.input, PathBuf::from("a.bmp"));
        assert_eq!(options.output, Some(PathBuf::from("b.rdi")));
        assert_eq!(options.mode, 0);
        assert_eq!(options.formats, (None, None));
        assert!(!options.overwrite);
        assert!(!options.strict_mode);
    }

    #[test]
    fn all_options() {
        let args = [
            "rdc",
            "--mode",
            "8",
            "--format",
            "bmp:rdi",
            "--overwrite",
            "--strict",
            "in",
            "out"
        ];
        let options = parse_options(&matches(&args)).unwrap();

        assert_eq!(options.mode, 8);
        assert_eq!(
            options.formats,
            (Some(ImageFormat::Bmp), Some(ImageFormat::Rdi))
        );
        assert!(options.overwrite);
        assert!(options.strict_mode);
    }

    #[test]
    fn output_and_half_formats_are_optional() {
        let options = parse_options(&matches(&["rdc", "-f", ":bmp", "a.rdi"])).unwrap();

        assert_eq!(options.output, None);
        assert_eq!(options.formats, (None, Some(ImageFormat::Bmp)));
    }

    #[test]
    fn bad_format_pair_is_a_usage_error() {
        let err = parse_options(&matches(&["rdc", "-f", "bmp:gif", "a", "b"])).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        let err = parse_options(&matches(&["rdc", "-f", ":", "a", "b"])).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn log_levels() {
        assert_eq!(log_level(&matches(&["rdc", "a", "b"])), Level::Warn);
        assert_eq!(log_level(&matches(&["rdc", "--trace", "a", "b"])), Level::Trace);
        assert_eq!(log_level(&matches(&["rdc", "--info", "a", "b"])), Level::Info);
        assert_eq!(log_level(&matches(&["rdc", "--debug", "a", "b"])), Level::Debug);
    }
}
