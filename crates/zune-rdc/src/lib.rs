/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::process::exit;

use log::error;

use crate::workflow::convert;

mod bmp;
mod cmd_args;
mod cmd_parsers;
mod errors;
mod formats;
mod workflow;

pub use errors::CliErrors;
pub use formats::ImageFormat;

pub fn main() {
    let cmd = cmd_args::create_cmd_args();

    let options = match cmd.try_get_matches() {
        Ok(options) => options,
        Err(err) => {
            // help and version requests land here too
            let _ = err.print();
            exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    cmd_parsers::global_options::setup_logger(&options);

    let result = cmd_parsers::global_options::parse_options(&options).and_then(|o| convert(&o));

    if let Err(err) = result {
        println!();
        error!(" Could not convert image, reason {:?}", err);
        println!();
        exit(err.exit_code());
    }
}
