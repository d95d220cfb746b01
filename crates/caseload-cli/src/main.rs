// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use caseload_app::AppState;
use caseload_store::PrefStore;
use config::Config;
use runtime::StoreRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `caseload --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.ephemeral {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let store = PrefStore::open(&db_path).with_context(|| {
        format!(
            "open settings database {} -- if this path is wrong, set [storage].db_path or CASELOAD_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if options.check_only {
        return Ok(());
    }

    let demo = caseload_testkit::demo_data(
        config.seed(),
        config.cases(),
        config.clients(),
        config.notices(),
    );

    let mut state = AppState {
        active_page: config.start_page(),
        ..AppState::default()
    };
    let mut runtime = StoreRuntime::new(demo, store);
    caseload_tui::run_app(&mut state, &mut runtime, config.breakpoints())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    print_example: bool,
    ephemeral: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        print_example: false,
        ephemeral: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--ephemeral" => {
                options.ephemeral = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("caseload");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved settings database path");
    println!("  --print-example-config   Print a config template");
    println!("  --ephemeral              Keep view settings in memory for this session");
    println!("  --check                  Validate config and settings database, then exit");
    println!("  --help                   Show this help");
}
