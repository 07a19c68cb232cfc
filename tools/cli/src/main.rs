//! # vm-translate
//!
//! Translate a flat guest code image into IR blocks and print them

mod commands;
mod image;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command, value_parser};
use log::{info, warn};
use vm_core::{Config, GuestArch};
use vm_frontend::{TranslationOptions, Translator};

use crate::commands::translate::{self, TranslateRequest};
use crate::image::GuestImage;

fn parse_address(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

fn cli() -> Command {
    Command::new("vm-translate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate A32/A64 guest code into IR blocks")
        .arg(
            Arg::new("image")
                .value_name("FILE")
                .help("Flat little-endian code image")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("arch")
                .short('a')
                .long("arch")
                .value_name("ARCH")
                .help("Guest architecture (a32, a64)")
                .default_value("a64"),
        )
        .arg(
            Arg::new("base")
                .short('b')
                .long("base")
                .value_name("ADDR")
                .help("Guest address of the first image byte")
                .default_value("0")
                .value_parser(parse_address),
        )
        .arg(
            Arg::new("pc")
                .short('p')
                .long("pc")
                .value_name("ADDR")
                .help("Start address (defaults to the image base)")
                .value_parser(parse_address),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML file with translation options")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("blocks")
                .short('n')
                .long("blocks")
                .value_name("NUM")
                .help("Maximum number of linked blocks to translate")
                .default_value("1")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("thumb")
                .long("thumb")
                .help("Start in Thumb state (A32 only)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("single-step")
                .long("single-step")
                .help("Translate one instruction per block (A64 only)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("unpredictable")
                .long("define-unpredictable")
                .help("Interpret UNPREDICTABLE encodings instead of failing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("hook-hints")
                .long("hook-hints")
                .help("End blocks at hint instructions and interpret them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("eval")
                .short('e')
                .long("eval")
                .help("Run each block through the reference evaluator")
                .action(ArgAction::SetTrue),
        )
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli().get_matches();

    let arch: GuestArch = matches
        .get_one::<String>("arch")
        .map(String::as_str)
        .unwrap_or("a64")
        .parse()?;
    let base = matches.get_one::<u64>("base").copied().unwrap_or(0);
    let pc = matches.get_one::<u64>("pc").copied().unwrap_or(base);

    let file_options = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            TranslationOptions::from_toml(&text)?
        }
        None => TranslationOptions::defaults(),
    };
    let flag_options = TranslationOptions {
        define_unpredictable_behaviour: matches.get_flag("unpredictable"),
        hook_hint_instructions: matches.get_flag("hook-hints"),
    };
    let options = file_options.merge(&flag_options)?;
    info!("translation options: {:?}", options);

    let image_path = matches
        .get_one::<PathBuf>("image")
        .context("missing image argument")?;
    let image = GuestImage::load(image_path, base)?;
    if image.is_empty() {
        warn!("{} is empty, every fetch will be undefined", image_path.display());
    }
    info!(
        "loaded {} bytes at {:#x} from {}",
        image.len(),
        image.base(),
        image_path.display()
    );

    let request = TranslateRequest {
        arch,
        pc,
        thumb: matches.get_flag("thumb"),
        single_step: matches.get_flag("single-step"),
        max_blocks: matches.get_one::<usize>("blocks").copied().unwrap_or(1),
        evaluate: matches.get_flag("eval"),
    };

    let translator = Translator::new(options);
    translate::run(&translator, &image, &request)?;
    Ok(())
}
