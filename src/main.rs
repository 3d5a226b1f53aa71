mod cli;

use std::io::{self, BufRead};
use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use log::{info, LevelFilter};
use parsnip::grammar::Grammar;
use parsnip::lexer::Munch;
use parsnip::parser::Options;
use parsnip::{generator, loader};

use cli::{Cli, Command};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_grammar(cli: &Cli) -> Result<Grammar, String> {
    let mut grammar = loader::load_file(&cli.file)
        .map_err(|errors| errors.iter().map(ToString::to_string).join("\n"))?;

    if cli.anti_left_recurse {
        grammar = grammar.anti_left_recurse().map_err(|e| e.to_string())?;
    }
    if let Some(head) = &cli.start {
        grammar = grammar
            .with_start(head)
            .ok_or_else(|| format!("No nonterminal `{}` in {}", head, cli.file.display()))?;
    }

    info!("using grammar from {}", cli.file.display());
    Ok(grammar)
}

fn parse(grammar: &Grammar, input: Option<&str>, options: &Options) -> Result<(), String> {
    let resolved = grammar.resolve().map_err(|e| e.to_string())?;

    match input {
        Some(text) => {
            let tree = resolved.parse_ast_with(text, options).map_err(|e| e.to_string())?;
            println!("{}", tree);
            Ok(())
        }
        // One sentence per line, keep going past bad ones
        None => {
            let mut failed = false;
            for line in io::stdin().lock().lines() {
                let line = line.map_err(|e| e.to_string())?;
                if line.trim().is_empty() {
                    continue;
                }
                match resolved.parse_ast_with(&line, options) {
                    Ok(tree) => println!("{}", tree),
                    Err(e) => {
                        eprintln!("{}", e);
                        failed = true;
                    }
                }
            }
            if failed {
                Err("Some lines could not be parsed".to_string())
            } else {
                Ok(())
            }
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let grammar = load_grammar(cli)?;

    match &cli.command {
        Command::Show { color } => println!("{}", grammar.styled(*color)),
        Command::Parse { input, longest_match, max_depth } => {
            let options = Options {
                munch: if *longest_match { Munch::Longest } else { Munch::Earliest },
                max_depth: *max_depth
            };
            parse(&grammar, input.as_deref(), &options)?;
        }
        Command::Transform => {
            let transformed = grammar.anti_left_recurse().map_err(|e| e.to_string())?;
            println!("{}", transformed);
        }
        Command::Generate { amount, depth } => {
            let mut rng = rand::thread_rng();
            for _ in 0..*amount {
                let sentence = generator::generate(&grammar, &mut rng, *depth).map_err(|e| e.to_string())?;
                println!("{}", sentence);
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
