//! `retro` command-line tool

mod commands;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use retro_core::{RetroConfig, RetroService};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn file_arg() -> Arg {
    Arg::new("file")
        .long("file")
        .short('f')
        .value_parser(clap::value_parser!(PathBuf))
        .help("Input file (stdin when omitted)")
}

fn template_arg() -> Arg {
    Arg::new("template")
        .long("template")
        .short('t')
        .required(true)
        .help("Template name: KPT, CSS or FOUR_LS")
}

fn cli() -> Command {
    Command::new("retro")
        .version(retro_core::VERSION)
        .about("Retrospective templates, section parsing and advice")
        .subcommand_required(true)
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("templates")
                .about("List registered templates")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("parse")
                .about("Split a document into template fields")
                .arg(template_arg())
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("render")
                .about("Render JSON answers as a document")
                .arg(template_arg())
                .arg(
                    Arg::new("sprint")
                        .long("sprint")
                        .short('s')
                        .required(true)
                        .help("Sprint name used in the title"),
                )
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("extract")
                .about("Print the body of one section")
                .arg(
                    Arg::new("header")
                        .long("header")
                        .required(true)
                        .help("Section header, e.g. \"## Problem\""),
                )
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("advice")
                .about("Ask for advice on the template's advice section")
                .arg(template_arg())
                .arg(
                    Arg::new("field")
                        .long("field")
                        .help("Field the advice is for"),
                )
                .arg(
                    Arg::new("config-dir")
                        .long("config-dir")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Directory holding retro.{APP_ENV}.toml"),
                )
                .arg(file_arg()),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_input(args: &ArgMatches) -> Result<String> {
    match args.get_one::<PathBuf>("file") {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{name}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    let output = match matches.subcommand() {
        Some(("templates", args)) => commands::templates(args.get_flag("json"))?,
        Some(("parse", args)) => {
            commands::parse_document(required(args, "template")?, &read_input(args)?)?
        }
        Some(("render", args)) => commands::render_document(
            required(args, "template")?,
            required(args, "sprint")?,
            &read_input(args)?,
        )?,
        Some(("extract", args)) => commands::extract(required(args, "header")?, &read_input(args)?)?,
        Some(("advice", args)) => {
            let dir = args
                .get_one::<PathBuf>("config-dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("."));
            let config = RetroConfig::load_profile(&dir)?;
            let service = RetroService::from_config(&config)?;
            let field = args.get_one::<String>("field").map(String::as_str);
            commands::advice(&service, required(args, "template")?, field, &read_input(args)?)
                .await?
        }
        _ => return Ok(()),
    };

    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn parses_render_arguments() {
        let matches = cli()
            .try_get_matches_from(["retro", "render", "-t", "KPT", "--sprint", "S1", "-f", "a.json"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "render");
        assert_eq!(required(args, "template").unwrap(), "KPT");
        assert_eq!(required(args, "sprint").unwrap(), "S1");
        assert_eq!(args.get_one::<PathBuf>("file"), Some(&PathBuf::from("a.json")));
    }

    #[test]
    fn template_is_required() {
        assert!(cli().try_get_matches_from(["retro", "parse"]).is_err());
    }
}
