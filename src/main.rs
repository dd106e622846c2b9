use ember::frontend::{strip_comments, tokenize};
use ember::treewalk_interpreter::{Environment, Interpreter};
use ember::{init_tracing, parse_source, run, LangError};

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::{fs, process};

const REPL_BANNER: &str = "Repl v0.1: ";

/// Runs an ember script, or starts the line-buffered shell when no script is given.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Cli {
    /// Script to run.
    script: Option<PathBuf>,

    /// Print the tokens before evaluating.
    #[clap(long)]
    dump_tokens: bool,

    /// Print the syntax tree before evaluating.
    #[clap(long)]
    dump_ast: bool,

    /// Print the value of the last statement.
    #[clap(long)]
    print_result: bool,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match &cli.script {
        Some(path) => run_file(&cli, path),
        None => run_prompt(&cli).map_err(|e| {
            eprintln!("{}", e);
            74
        }),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn exit_code(error: &LangError) -> i32 {
    match error {
        LangError::Tokenizer(_) | LangError::Parser(_) => 65,
        LangError::Runtime(_) => 70,
    }
}

fn run_file(cli: &Cli, path: &Path) -> Result<(), i32> {
    let source = fs::read_to_string(path).map_err(|e| {
        eprintln!("Failed to read '{}': {}", path.display(), e);
        74
    })?;

    let mut interpreter = Interpreter::new();
    let env = Environment::global();
    match execute(cli, &source, &mut interpreter, &env) {
        Ok(value) => {
            if cli.print_result {
                println!("{}", value);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            Err(exit_code(&e))
        }
    }
}

fn execute(
    cli: &Cli,
    source: &str,
    interpreter: &mut Interpreter,
    env: &Environment,
) -> Result<ember::treewalk_interpreter::RuntimeValue, LangError> {
    if cli.dump_tokens {
        for token in tokenize(&strip_comments(source))? {
            println!("{:>8}  {}", token.span.to_string(), token.token);
        }
    }
    if cli.dump_ast {
        println!("{}", parse_source(source)?.ast_string());
    }
    run(source, interpreter, env)
}

fn print_banner(clear: bool) -> io::Result<()> {
    let mut stdout = io::stdout();
    if clear {
        write!(stdout, "\x1B[2J\x1B[1;1H")?;
    }
    write!(stdout, "{}\n> ", REPL_BANNER)?;
    stdout.flush()
}

fn run_prompt(cli: &Cli) -> io::Result<()> {
    let mut interpreter = Interpreter::new();
    let mut env = Environment::global();
    let mut buffer = String::new();

    print_banner(false)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();

        match input {
            "exit" => return Ok(()),
            "run" => {
                report(execute(cli, &buffer, &mut interpreter, &env));
                buffer.clear();
            }
            "restart" | "reset" => {
                env = Environment::global();
                buffer.clear();
                print_banner(true)?;
                continue;
            }
            "clear" => {
                print_banner(true)?;
                continue;
            }
            _ => match input.strip_prefix("runfile ") {
                Some(file) => match fs::read_to_string(file) {
                    Ok(source) => report(execute(cli, &source, &mut interpreter, &env)),
                    Err(_) => println!("File Not Found: '{}'", file),
                },
                None => {
                    buffer.push('\n');
                    buffer.push_str(input);
                }
            },
        }

        print!("> ");
        io::stdout().flush()?;
    }

    Ok(())
}

fn report(result: Result<ember::treewalk_interpreter::RuntimeValue, LangError>) {
    match result {
        Ok(value) => println!("{}", value),
        Err(e) => eprintln!("{}", e),
    }
}
