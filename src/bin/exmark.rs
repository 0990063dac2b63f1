//! Command-line interface for exmark
//! This binary converts markup files to HTML, dumps their token trees, and
//! segments annotated source listings.
//!
//! Usage:
//!   exmark render `<path>`                      - Convert a markup file to HTML
//!   exmark tokens `<path>`                      - Print the token tree as JSON
//!   exmark segment `<path>` [--marker `<m>`]      - Print listing segments as JSON

use clap::{Arg, Command};
use exmark::markdown::{extensions, Markdown};
use exmark::segment::segment;

fn main() {
    let matches = Command::new("exmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting and inspecting example-documentation markup")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("render")
                .about("Convert a markup file to HTML")
                .arg(
                    Arg::new("path")
                        .help("Path to the markup file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the parsed token tree as JSON")
                .arg(
                    Arg::new("path")
                        .help("Path to the markup file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("segment")
                .about("Split an annotated source listing into labeled segments")
                .arg(
                    Arg::new("path")
                        .help("Path to the source listing")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("marker")
                        .long("marker")
                        .short('m')
                        .help("Comment marker prefixing label lines")
                        .default_value("//"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("render", render_matches)) => {
            let path = render_matches.get_one::<String>("path").unwrap();
            handle_render_command(path);
        }
        Some(("tokens", tokens_matches)) => {
            let path = tokens_matches.get_one::<String>("path").unwrap();
            handle_tokens_command(path);
        }
        Some(("segment", segment_matches)) => {
            let path = segment_matches.get_one::<String>("path").unwrap();
            let marker = segment_matches.get_one::<String>("marker").unwrap();
            handle_segment_command(path, marker);
        }
        _ => unreachable!(),
    }
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    })
}

/// Engine with both bundled extensions installed
fn engine(renderer: bool) -> Markdown {
    let mut md = if renderer {
        Markdown::html()
    } else {
        Markdown::tokens_only()
    };
    md.install(extensions::math)
        .and_then(|md| md.install(extensions::aside))
        .map(|_| ())
        .unwrap_or_else(|e| {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        });
    md
}

/// Handle the render command
fn handle_render_command(path: &str) {
    let source = read_source(path);
    let html = engine(true).convert(&source).unwrap_or_else(|e| {
        eprintln!("Render error: {}", e);
        std::process::exit(1);
    });
    print!("{}", html);
}

/// Handle the tokens command
fn handle_tokens_command(path: &str) {
    let source = read_source(path);
    let tokens = engine(false).parse(&source);
    let json = serde_json::to_string_pretty(&tokens).unwrap_or_else(|e| {
        eprintln!("Serialization error: {}", e);
        std::process::exit(1);
    });
    println!("{}", json);
}

/// Handle the segment command
fn handle_segment_command(path: &str, marker: &str) {
    let source = read_source(path);
    let lines: Vec<&str> = source.lines().collect();
    let segments = segment(&lines, marker);
    let json = serde_json::to_string_pretty(&segments).unwrap_or_else(|e| {
        eprintln!("Serialization error: {}", e);
        std::process::exit(1);
    });
    println!("{}", json);
}
