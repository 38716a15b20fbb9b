use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use log::debug;

use ll1_check::grammar::{ConflictPolicy, EpsilonMode};
use ll1_check::{Error, Ll1Parser, Options, Result, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Productions
    Prod,
    /// Nullable, first and follow
    Ff,
    /// LL(1) parsing table
    Table,
    /// Stack, input and action for every step of the parse
    Trace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    Latex,
    Json,
}

/// Checks a pre-lexed token stream against an LL(1) grammar and prints YES or NO.
#[derive(Debug, clap::Parser)]
#[command(version, about)]
struct Args {
    /// Grammar file, one `LHS -> RHS ...` production per line ("-" for stdin)
    grammar: PathBuf,
    /// Token file, one `<line> <type> <value>` record per line
    tokens: Option<PathBuf>,
    /// Where the syntax error goes; stderr when omitted
    error_file: Option<PathBuf>,
    /// Also print these, in order
    #[arg(short, long, value_enum)]
    print: Vec<Output>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
    /// How FIRST sets treat epsilon
    #[arg(long, value_enum, default_value_t = EpsilonMode::Propagate)]
    epsilon: EpsilonMode,
    /// What to do with productions competing for the same table cell
    #[arg(long, value_enum, default_value_t = ConflictPolicy::Overwrite)]
    conflicts: ConflictPolicy,
}

fn read(path: &Path) -> Result<String> {
    let io_error = |source| Error::Io {
        path: path.display().to_string(),
        source,
    };
    if path == Path::new("-") {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input).map_err(io_error)?;
        Ok(input)
    } else {
        fs::read_to_string(path).map_err(io_error)
    }
}

fn to_json(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn print_outputs(args: &Args, parser: &Ll1Parser, tokens: Option<&[Token]>) {
    let g = parser.grammar();
    for output in &args.print {
        let text = match output {
            Output::Prod => {
                let t = g.to_production_output_vec();
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => to_json(&t),
                }
            }
            Output::Ff => {
                let t = g.to_non_terminal_output_vec(parser.first(), parser.follow());
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            }
            Output::Table => {
                let t = parser.table().to_output(g);
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => to_json(&t),
                }
            }
            Output::Trace => match tokens {
                Some(tokens) => {
                    let (_, trace) = parser.parse_traced(tokens);
                    match args.format {
                        OutputFormat::Json => to_json(&trace),
                        _ => trace.to_plaintext(),
                    }
                }
                None => {
                    debug!("no token file, nothing to trace");
                    continue;
                }
            },
        };
        println!("{}", text);
    }
}

fn run(args: &Args) -> Result<()> {
    let options = Options {
        epsilon: args.epsilon,
        conflicts: args.conflicts,
    };
    let parser = Ll1Parser::from_grammar_text(&read(&args.grammar)?, options)?;
    debug!(
        "{} productions, FIRST in {} passes, FOLLOW in {} passes, {} table cells",
        parser.grammar().productions.len(),
        parser.first().passes(),
        parser.follow().passes(),
        parser.table().len()
    );

    let tokens = match &args.tokens {
        Some(path) => Some(Token::parse_stream(&read(path)?)?),
        None => None,
    };
    print_outputs(args, &parser, tokens.as_deref());

    let tokens = match tokens {
        Some(tokens) => tokens,
        None => return Ok(()),
    };

    let file_error = |path: &Path, source| Error::Io {
        path: path.display().to_string(),
        source,
    };
    let mut error_file = match &args.error_file {
        Some(path) => Some(fs::File::create(path).map_err(|e| file_error(path, e))?),
        None => None,
    };

    match parser.parse(&tokens) {
        Ok(()) => println!("YES"),
        Err(e) => {
            match (&mut error_file, &args.error_file) {
                (Some(file), Some(path)) => {
                    writeln!(file, "{}", e).map_err(|source| file_error(path, source))?
                }
                _ => eprintln!("{}", e),
            }
            println!("NO");
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
