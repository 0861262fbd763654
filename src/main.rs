// Main CLI entry point for openapi-bruno
// Uses clap for argument parsing

use clap::{Arg, ArgAction, Command};
use openapi_bruno::importer::{import_collection, ImportOptions};
use openapi_bruno::materialize::build_directory;
use openapi_bruno::utils::pluralize;
use std::path::Path;
use std::process::exit;

const INVALID_HEADER: &str = "the header provided is not valid, it must be: key=value";

/// Split `key=value` at the first `=`.
fn parse_header(raw: &str) -> Option<(String, String)> {
    let (key, value) = raw.split_once('=')?;
    Some((key.to_string(), value.to_string()))
}


#[tokio::main]
async fn main() {
    let matches = Command::new("openapi-bruno")
        .version(clap::crate_version!())
        .author("Jake Abendroth")
        .about("Convert an OpenAPI v3 document into a Bruno collection directory")
        .after_help("EXAMPLES:\n  openapi-bruno ./openapi.yaml -o ./collection\n  openapi-bruno https://api.example.com/openapi.json -H Authorization=TOKEN --validate")
        .arg(Arg::new("input")
            .required(true)
            .num_args(1)
            .help("Path or URL of the OpenAPI document (JSON or YAML)"))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .num_args(1)
            .default_value(".bruno")
            .help("Directory the collection is written to"))
        .arg(Arg::new("header")
            .short('H')
            .long("header")
            .num_args(1)
            .action(ArgAction::Append)
            .help("Header sent when fetching the document, as key=value (repeatable)"))
        .arg(Arg::new("validate")
            .long("validate")
            .action(ArgAction::SetTrue)
            .help("Validate the collection before writing it"))
        .arg(Arg::new("env_from_servers")
            .long("env-from-servers")
            .action(ArgAction::SetTrue)
            .help("Create one environment per server declared in the document"))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .help("Log every operation and file written"))
        .get_matches();

    let level = if matches.get_flag("verbose") { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let input = match matches.get_one::<String>("input") {
        Some(input) => input,
        None => {
            eprintln!("an input document is required");
            exit(1);
        }
    };
    let output = matches
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or(".bruno");

    let mut headers = Vec::new();
    for raw in matches.get_many::<String>("header").into_iter().flatten() {
        match parse_header(raw) {
            Some(header) => headers.push(header),
            None => {
                eprintln!("{}", INVALID_HEADER);
                exit(1);
            }
        }
    }

    let options = ImportOptions {
        headers,
        validate: matches.get_flag("validate"),
        environments_from_servers: matches.get_flag("env_from_servers"),
    };

    let collection = import_collection(input, &options).await.unwrap_or_else(|e| {
        eprintln!("{}", e);
        exit(1);
    });

    let summary = build_directory(&collection, Path::new(output)).unwrap_or_else(|e| {
        eprintln!("{}", e);
        exit(1);
    });

    println!(
        "Bruno directory is done! {} {}, {} {} and {} {} written to {}",
        summary.requests,
        pluralize("request", summary.requests),
        summary.folders,
        pluralize("folder", summary.folders),
        summary.environments,
        pluralize("environment", summary.environments),
        output
    );
}
