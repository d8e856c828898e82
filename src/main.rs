mod cli;
mod config;
mod model;
mod output;
mod parsers;
mod rc_config;
mod report;
mod resolve;
mod schema;
mod summary;

use std::path::Path;
use std::process;

use clap::Parser;
use colored::control;

use cli::Cli;
use rc_config::RcConfig;

fn main() {
    let mut cli = Cli::parse();

    let rc_dir = cli
        .export
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    apply_rc(&mut cli, RcConfig::load(&rc_dir));

    if cli.no_color {
        control::set_override(false);
    }

    let groups = match schema::select(&cli.group) {
        Ok(groups) => groups,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    if !cli.output_dir.is_dir() {
        eprintln!("Error: '{}' is not a directory", cli.output_dir.display());
        process::exit(2);
    }

    let inputs = match config::load(&cli.export, &cli.roles) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Error loading inputs: {:#}", e);
            process::exit(2);
        }
    };

    match report::run_all(&inputs, &groups, &cli.output_dir) {
        Ok(summary) => output::print_summary(&summary, cli.verbose, cli.json),
        Err(e) => {
            eprintln!("Error writing reports: {:#}", e);
            process::exit(2);
        }
    }
}

/// Fill in options the user left unset from `.rolecheckrc`. CLI wins.
fn apply_rc(cli: &mut Cli, rc: RcConfig) {
    if let Some(verbose) = rc.verbose {
        cli.verbose = cli.verbose || verbose;
    }
    if let Some(json) = rc.json {
        cli.json = cli.json || json;
    }
    if let Some(no_color) = rc.no_color {
        cli.no_color = cli.no_color || no_color;
    }
    if let Some(output_dir) = rc.output_dir {
        if cli.output_dir == Path::new(".") {
            cli.output_dir = output_dir.into();
        }
    }
    if let Some(group) = rc.group {
        if cli.group.is_empty() {
            cli.group = group;
        }
    }
}
