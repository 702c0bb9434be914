/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

static MODE_HELP: &str = "Transform mode used when writing RDI files

0 selects the default mode (3).
1 and 3 are lossless, 4 to 10 trade accuracy for size,
with 8 to 10 packing two deltas per byte.";

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("rdc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert images to and from the Root Delta Image format")
        .disable_version_flag(true)
        .arg(Arg::new("version")
            .long("version")
            .short('v')
            .action(ArgAction::Version)
            .help("Print version information"))
        .arg(Arg::new("input")
            .help("Input file to read data from")
            .value_parser(value_parser!(PathBuf))
            .required(true))
        .arg(Arg::new("output")
            .help("Output file to write the data to")
            .long_help("Output file to write the data to.\nDefaults to the input path with the extension of the output format.")
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("mode")
            .long("mode")
            .short('m')
            .help("Transform mode used when writing RDI files")
            .long_help(MODE_HELP)
            .value_parser(value_parser!(u16))
            .default_value("0"))
        .arg(Arg::new("format")
            .long("format")
            .short('f')
            .value_name("FROM:TO")
            .help("Input and output formats, e.g bmp:rdi")
            .long_help("Input and output formats, e.g bmp:rdi.\nEither side may be left out, as in bmp or :rdi.\nMissing formats are guessed from the file extensions."))
        .arg(Arg::new("overwrite")
            .long("overwrite")
            .short('y')
            .action(ArgAction::SetTrue)
            .help("Replace the output file if it exists"))
        .arg(Arg::new("strict")
            .long("strict")
            .action(ArgAction::SetTrue)
            .help_heading("ADVANCED")
            .help("Treat recoverable oddities in RDI files as errors"))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the conversion"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_command() {
        create_cmd_args().debug_assert();
    }

    #[test]
    fn parses_positionals_and_defaults() {
        let matches = create_cmd_args()
            .try_get_matches_from(["rdc", "in.bmp", "out.rdi"])
            .unwrap();

        assert_eq!(
            matches.get_one::<PathBuf>("input"),
            Some(&PathBuf::from("in.bmp"))
        );
        assert_eq!(matches.get_one::<u16>("mode"), Some(&0));
        assert!(!matches.get_flag("overwrite"));
        assert!(matches.get_one::<String>("format").is_none());
    }

    #[test]
    fn rejects_non_numeric_modes() {
        let result =
            create_cmd_args().try_get_matches_from(["rdc", "--mode", "fast", "a.bmp", "b.rdi"]);
        assert!(result.is_err());
    }

    #[test]
    fn output_is_optional() {
        let matches = create_cmd_args()
            .try_get_matches_from(["rdc", "in.bmp"])
            .unwrap();

        assert!(matches.get_one::<PathBuf>("output").is_none());
        assert!(create_cmd_args().try_get_matches_from(["rdc"]).is_err());
    }

    #[test]
    fn short_and_long_version_flags() {
        for flag in ["-v", "--version"] {
            let err = create_cmd_args()
                .try_get_matches_from(["rdc", flag])
                .unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        }
    }
}
