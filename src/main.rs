use std::env;
use std::fs;
use std::process;

use cavaco::{api, fingering, harmonic_field, identify, ChordStore, Extension, KeyMode};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

const USAGE: &str = "\
Usage: cavaco [--config <file.yaml>] [--import <file.json>] [-v] <command>

Commands:
  show <chord>                  fingerings for a chord symbol (C, F#m7, Bbdim)
  identify <f1> <f2> <f3> <f4>  name a fret pattern, low string first (x = muted)
  field <key> [minor] [sevenths]
  export                        print the database as import-format JSON";

fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let verbose = take_flag(&mut args, "-v");
    let config_path = take_option(&mut args, "--config");
    let import_path = take_option(&mut args, "--import");

    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let log_config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    // Fails only when a logger is already installed.
    let _ = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto);

    if args.is_empty() {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let config_yaml = config_path.as_deref().map(read_file);
    let import_json = import_path.as_deref().map(read_file);
    let store = match api::open_store(config_yaml.as_deref(), import_json.as_deref()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(message) = run(&store, &args) {
        eprintln!("{}", message);
        process::exit(1);
    }
}

fn run(store: &ChordStore, args: &[String]) -> Result<(), String> {
    let db = store.database();
    match args[0].as_str() {
        "show" => {
            let symbol = args.get(1).ok_or("Usage: cavaco show <chord>")?;
            match db.lookup_symbol(symbol).map_err(|e| format!("Error: {}", e))? {
                Some(entry) => print!("{}", api::describe(entry)),
                None => println!("No playable fingering for {}", symbol),
            }
        }
        "identify" => {
            let pattern = args[1..].join(" ");
            let frets = fingering::parse_frets(&pattern)
                .ok_or("Usage: cavaco identify <f1> <f2> <f3> <f4>  (fret numbers or x)")?;
            let exact = identify::identify_exact(&db, &frets);
            if exact.is_empty() {
                println!("No exact match for {}", fingering::format_frets(&frets));
            } else {
                let names: Vec<&str> = exact.iter().map(|e| e.key.as_str()).collect();
                println!("Exact: {}", names.join(", "));
            }
            for m in identify::identify_by_notes(&db, &frets, &store.config().validator()).iter().take(5) {
                println!(
                    "Sounds like {} ({:.0}% of chord tones{})",
                    m.entry.key,
                    m.validation.coverage * 100.0,
                    if m.validation.has_root { "" } else { ", no root" }
                );
            }
            for m in identify::identify_nearest(&db, &frets, 3) {
                println!(
                    "Near: {} {} (distance {})",
                    m.entry.key, m.entry.variations[m.variation], m.distance
                );
            }
        }
        "field" => {
            let key = args.get(1).ok_or("Usage: cavaco field <key> [minor] [sevenths]")?;
            let rest = &args[2..];
            let mode = if rest.iter().any(|a| a == "minor") { KeyMode::Minor } else { KeyMode::Major };
            let extension = if rest.iter().any(|a| a == "sevenths") {
                Extension::Sevenths
            } else {
                Extension::Triads
            };
            let field = harmonic_field(key, mode, extension).map_err(|e| format!("Error: {}", e))?;
            for (degree, entry) in field.resolve(&db) {
                match entry {
                    Some(entry) => println!("{:8} {:8} {}", degree.numeral, entry.key, entry.primary()),
                    None => println!("{:8} {} (no fingering)", degree.numeral, degree.chord_name(db.catalog())),
                }
            }
        }
        "export" => {
            let json = db.to_json().map_err(|e| format!("Error: {}", e))?;
            println!("{}", json);
        }
        other => return Err(format!("Unknown command '{}'\n\n{}", other, USAGE)),
    }
    Ok(())
}

fn read_file(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    match args.iter().position(|a| a == flag) {
        Some(i) => {
            args.remove(i);
            true
        }
        None => false,
    }
}

fn take_option(args: &mut Vec<String>, name: &str) -> Option<String> {
    let i = args.iter().position(|a| a == name)?;
    if i + 1 >= args.len() {
        eprintln!("Missing value for {}", name);
        process::exit(1);
    }
    let value = args.remove(i + 1);
    args.remove(i);
    Some(value)
}
