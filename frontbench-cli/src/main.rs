//! Command-line interface for frontbench
//! Runs each workbench operation on JSON or YAML documents and prints the result.
//!
//! Usage:
//!   frontbench nfa `<patterns>`                                  - Thompson NFA for token patterns
//!   frontbench dfa `<automaton>` [--minimize]                    - Subset construction
//!   frontbench regex `<automaton>`                               - Regex per token type
//!   frontbench dot `<automaton>`                                 - Graphviz rendering
//!   frontbench tokenize `<source>` (--rules `<r>` | --automaton `<a>`)
//!   frontbench parse `<tokens>` --grammar `<g>` [--format `<f>`]
//!   frontbench translate `<tree>` --rules `<r>`
//!   frontbench run `<source>` (--rules `<r>` | --automaton `<a>`) --grammar `<g>` [--translation `<t>`]
//!
//! Failures print `error[<kind>]: <detail>` and exit with 2 for runtime mismatches
//! (syntax errors, untranslated tokens) and 1 for everything else.

mod commands;

use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use commands::CliError;
use frontbench_config::{Loader, WorkbenchConfig, LOCAL_CONFIG};
use log::LevelFilter;

fn lexer_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("rules")
                .long("rules")
                .short('r')
                .help("Token rules: a list of {type, pattern} or a type -> pattern object"),
        )
        .arg(
            Arg::new("automaton")
                .long("automaton")
                .short('a')
                .help("A deterministic automaton document"),
        )
        .group(
            ArgGroup::new("lexer")
                .args(["rules", "automaton"])
                .required(true),
        )
}

fn cli() -> Command {
    Command::new("frontbench")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A compiler-frontend workbench: automata, tokenizers, parsing and translation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("nfa")
                .about("Build an NFA from token patterns (Thompson construction)")
                .arg(Arg::new("patterns").required(true).help("Token patterns document")),
        )
        .subcommand(
            Command::new("dfa")
                .about("Determinize an automaton (subset construction)")
                .arg(Arg::new("automaton").required(true).help("Automaton document"))
                .arg(
                    Arg::new("minimize")
                        .long("minimize")
                        .short('m')
                        .action(ArgAction::SetTrue)
                        .help("Also minimize the result; overrides automata.minimize"),
                ),
        )
        .subcommand(
            Command::new("regex")
                .about("Recover a regex per token type from a DFA (state elimination)")
                .arg(Arg::new("automaton").required(true).help("Automaton document")),
        )
        .subcommand(
            Command::new("dot")
                .about("Render an automaton as Graphviz DOT")
                .arg(Arg::new("automaton").required(true).help("Automaton document")),
        )
        .subcommand(lexer_args(
            Command::new("tokenize")
                .about("Tokenize a source file")
                .arg(Arg::new("source").required(true).help("Source text file")),
        ))
        .subcommand(
            Command::new("parse")
                .about("Parse a token list into a syntax tree")
                .arg(Arg::new("tokens").required(true).help("Tokens document"))
                .arg(
                    Arg::new("grammar")
                        .long("grammar")
                        .short('g')
                        .required(true)
                        .help("Grammar document"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Tree format (treeviz, json); overrides output.format"),
                ),
        )
        .subcommand(
            Command::new("translate")
                .about("Translate a syntax tree with translation rules")
                .arg(Arg::new("tree").required(true).help("Syntax tree document"))
                .arg(
                    Arg::new("rules")
                        .long("rules")
                        .short('r')
                        .required(true)
                        .help("Translation rules document"),
                ),
        )
        .subcommand(lexer_args(
            Command::new("run")
                .about("Tokenize, parse and translate a source file in one go")
                .arg(Arg::new("source").required(true).help("Source text file"))
                .arg(
                    Arg::new("grammar")
                        .long("grammar")
                        .short('g')
                        .required(true)
                        .help("Grammar document"),
                )
                .arg(
                    Arg::new("translation")
                        .long("translation")
                        .short('t')
                        .help("Translation rules document"),
                ),
        ))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Defaults, then `./frontbench.toml`, then `--config`, then subcommand flags
fn load_config(matches: &ArgMatches) -> Result<WorkbenchConfig, CliError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some((_, sub)) = matches.subcommand() {
        if let Ok(Some(format)) = sub.try_get_one::<String>("format") {
            loader = loader.set_override("output.format", format.as_str())?;
        }
        if let Ok(Some(&true)) = sub.try_get_one::<bool>("minimize") {
            loader = loader.set_override("automata.minimize", true)?;
        }
    }
    Ok(loader.build()?)
}

fn execute(matches: &ArgMatches) -> Result<String, CliError> {
    let config = load_config(matches)?;
    commands::formats(&config).require(&config.output.format)?;
    match matches.subcommand() {
        Some(("nfa", sub)) => commands::nfa(sub, &config),
        Some(("dfa", sub)) => commands::dfa(sub, &config),
        Some(("regex", sub)) => commands::regex(sub, &config),
        Some(("dot", sub)) => commands::dot(sub),
        Some(("tokenize", sub)) => commands::tokenize(sub, &config),
        Some(("parse", sub)) => commands::parse(sub, &config),
        Some(("translate", sub)) => commands::translate(sub),
        Some(("run", sub)) => commands::run(sub, &config),
        Some((other, _)) => Err(CliError::Usage(format!("unknown command '{}'", other))),
        None => Err(CliError::Usage("no command given".to_string())),
    }
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));

    match execute(&matches) {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
        Err(err) => {
            eprintln!("error[{}]: {}", err.label(), err);
            std::process::exit(err.exit_code());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        cli().debug_assert();
    }

    #[test]
    fn subcommand_flags_become_overrides() {
        let matches = cli()
            .try_get_matches_from(["frontbench", "dfa", "nfa.json", "--minimize"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert!(config.automata.minimize);

        let matches = cli()
            .try_get_matches_from(["frontbench", "parse", "t.json", "-g", "g.json", "-f", "json"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.output.format, "json");
        assert!(!config.automata.minimize);
    }

    #[test]
    fn lexer_is_required_and_exclusive() {
        assert!(cli()
            .try_get_matches_from(["frontbench", "tokenize", "src.txt"])
            .is_err());
        assert!(cli()
            .try_get_matches_from(["frontbench", "tokenize", "src.txt", "-r", "a", "-a", "b"])
            .is_err());
        assert!(cli()
            .try_get_matches_from(["frontbench", "tokenize", "src.txt", "-r", "a"])
            .is_ok());
    }
}
