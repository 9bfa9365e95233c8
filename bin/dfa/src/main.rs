use std::process::ExitCode;

use dfa_sim::prelude::*;
use owo_colors::OwoColorize;
use tracing::{debug, error, info, trace};
use tracing_subscriber::{filter::LevelFilter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

mod session;
use session::{Session, SessionError};

fn file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .help("JSON file containing the definition of the automaton")
}

fn cli() -> clap::Command {
    Command::new("dfa")
    .about("Deterministic finite automaton simulator")
    .subcommand_required(true)
    .arg(
        Arg::new("verbosity")
        .short('v')
        .long("verbosity")
        .num_args(0..=1)
        .require_equals(true)
        .value_parser(|level: &str| level.parse::<LevelFilter>())
        .default_missing_value("info")
        .help("log level written to stderr, one of off, error, warn, info, debug or trace")
    )
    .subcommand(
        Command::new("check")
        .about("loads a definition, validates it and prints the transition table")
        .arg(file_arg())
    )
    .subcommand(
        Command::new("run")
        .about("evaluates the given words, or words read line by line from stdin if none are given")
        .arg(file_arg())
        .arg(Arg::new("words").num_args(0..).action(ArgAction::Append))
    )
    .subcommand(
        Command::new("define")
        .about("defines an automaton interactively and tests words on it")
        .arg(
            Arg::new("save")
            .long("save")
            .value_name("FILE")
            .help("writes the definition as JSON to FILE")
        )
    )
    .subcommand(
        Command::new("dot")
        .about("prints the automaton in the graphviz DOT format")
        .arg(file_arg())
        .arg(
            Arg::new("render")
            .long("render")
            .value_name("PNG")
            .help("renders the automaton to PNG using the dot executable")
        )
    )
}

/// Warnings are always shown, `-v` alone raises the level to info.
fn setup_logging(matches: &ArgMatches) {
    let level = matches
        .get_one::<LevelFilter>("verbosity")
        .copied()
        .unwrap_or(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(level),
        )
        .init();

    trace!("logging at level {level}");
}

fn load(matches: &ArgMatches) -> Result<Automaton, DefinitionError> {
    let file = matches
        .get_one::<String>("file")
        .expect("file is a required argument");
    let start = std::time::Instant::now();
    let dfa = Definition::from_path(file)?.build()?;
    info!(
        "loading and validating {file} took {}µs",
        start.elapsed().as_micros()
    );
    Ok(dfa)
}

fn check(dfa: &Automaton) {
    if let Some(description) = dfa.description() {
        println!("{}", description.bold());
    }
    println!("{dfa}");
    println!("{}", dfa.show());
    let missing = dfa.missing_transitions().count();
    if missing > 0 {
        println!(
            "{} {missing} transition(s) undefined, words reaching them will fail",
            "note:".yellow()
        );
    }
}

fn execute(matches: &ArgMatches) -> Result<(), SessionError> {
    let stdin = std::io::stdin();

    match matches.subcommand() {
        Some(("check", sub_matches)) => {
            let dfa = load(sub_matches)?;
            check(&dfa);
            println!("{}", "Automaton defined and validated successfully!".green());
        }
        Some(("run", sub_matches)) => {
            let dfa = load(sub_matches)?;
            let mut session = Session::new(stdin.lock(), std::io::stdout());
            match sub_matches.get_many::<String>("words") {
                Some(words) => {
                    for word in words {
                        println!("{word}");
                        session.report(&dfa, word)?;
                    }
                }
                None => session.test_loop(&dfa)?,
            }
        }
        Some(("define", sub_matches)) => {
            let mut session = Session::new(stdin.lock(), std::io::stdout());
            let definition = session.define()?;
            if let Some(path) = sub_matches.get_one::<String>("save") {
                debug!("saving definition to {path}");
                std::fs::write(path, definition.to_json()?)?;
            }
            let dfa = definition.build()?;
            println!(
                "\n{}",
                "Automaton defined and validated successfully!".green()
            );
            session.test_loop(&dfa)?;
        }
        Some(("dot", sub_matches)) => {
            let dfa = load(sub_matches)?;
            match sub_matches.get_one::<String>("render") {
                Some(png) => {
                    if let Err(err) = dfa.render_to_file(png) {
                        error!("could not render automaton: {err}");
                        println!("{}", dfa.dot_representation());
                    }
                }
                None => println!("{}", dfa.dot_representation()),
            }
        }
        _ => unreachable!("a subcommand is required"),
    }
    Ok(())
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match execute(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
