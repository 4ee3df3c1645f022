use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use bfkit::config::load_config;
use bfkit::{compile, encode, execute_with_limits, shorten, ExecutionResult, Limits};
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bfkit", about = "Run, synthesize and shorten Brainfuck programs")]
struct Cli {
    /// Config file (defaults to ./bfkit.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the executed-instruction ceiling.
    #[arg(long, global = true)]
    max_instructions: Option<usize>,

    /// Override the touched-cell ceiling.
    #[arg(long, global = true)]
    max_memory_cells: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile and run a program.
    Exec {
        /// Comma-separated integers fed to ',' round-robin (e.g. 5,7).
        #[arg(long)]
        input: Option<String>,

        /// Print the execution result as JSON.
        #[arg(long)]
        json: bool,

        /// Print the compiled instruction listing instead of running.
        #[arg(long)]
        disassemble: bool,

        #[arg(allow_hyphen_values = true)]
        program: String,
    },
    /// Generate a program that prints the given text.
    Encode {
        #[arg(required = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Run-length compress a program for display.
    Shorten {
        #[arg(allow_hyphen_values = true)]
        program: String,
    },
}

/// Parse a "5,7,-1" input list.
fn parse_inputs(s: &str) -> anyhow::Result<Vec<i64>> {
    s.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<i64>()
                .with_context(|| format!("could not parse input '{part}' as int"))
        })
        .collect()
}

/// Make trailing whitespace visible and name empty output.
fn render_output(output: &str) -> String {
    if output.is_empty() {
        return "No output".to_string();
    }
    if output.ends_with(char::is_whitespace) {
        return format!("{output}<EOF>");
    }
    output.to_string()
}

/// Command-line ceilings win over the config file.
fn override_limits(mut limits: Limits, cli: &Cli) -> Limits {
    if let Some(n) = cli.max_instructions {
        limits.max_instructions = n;
    }
    if let Some(n) = cli.max_memory_cells {
        limits.max_memory_cells = n;
    }
    limits
}

fn resolve_limits(cli: &Cli) -> anyhow::Result<Limits> {
    let limits = override_limits(load_config(cli.config.as_deref())?.limits, cli);
    debug!(?limits, "resolved execution limits");
    Ok(limits)
}

fn run_exec(
    limits: Limits,
    program: &str,
    input: Option<&str>,
    json: bool,
    disassemble: bool,
) -> anyhow::Result<()> {
    let inputs = match input {
        Some(s) => parse_inputs(s).context("input parsing error")?,
        None => Vec::new(),
    };

    let start = Instant::now();
    let compiled = compile(program).context("compilation error")?;
    let compile_elapsed = start.elapsed();

    if disassemble {
        print!("{compiled}");
        return Ok(());
    }

    let start = Instant::now();
    let result: ExecutionResult =
        execute_with_limits(&compiled, &inputs, limits).context("execution error")?;
    let execute_elapsed = start.elapsed();

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", render_output(&result.output));
    eprintln!("  Cells used:        {}", result.memory_cells_used);
    eprintln!("  Instructions:      {}", result.instructions_executed);
    eprintln!("  Compilation in:    {compile_elapsed:.2?}");
    eprintln!("  Execution in:      {execute_elapsed:.2?}");
    eprintln!("  Total:             {:.2?}", compile_elapsed + execute_elapsed);
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let limits = resolve_limits(&cli)?;
    match cli.command {
        Command::Exec {
            input,
            json,
            disassemble,
            program,
        } => run_exec(limits, &program, input.as_deref(), json, disassemble),
        Command::Encode { text } => {
            let text = text.join(" ");
            println!("{}", encode(&text)?);
            Ok(())
        }
        Command::Shorten { program } => {
            println!("{}", shorten(&program));
            Ok(())
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bfkit=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inputs() {
        assert_eq!(parse_inputs("5,7").unwrap(), vec![5, 7]);
        assert_eq!(parse_inputs(" -1 , 300").unwrap(), vec![-1, 300]);
    }

    #[test]
    fn test_parse_inputs_rejects_garbage() {
        let err = parse_inputs("5,x").unwrap_err();
        assert_eq!(err.to_string(), "could not parse input 'x' as int");
    }

    #[test]
    fn test_render_output() {
        assert_eq!(render_output(""), "No output");
        assert_eq!(render_output("hi\n"), "hi\n<EOF>");
        assert_eq!(render_output("hi"), "hi");
    }

    #[test]
    fn test_cli_parses_exec() {
        let cli = Cli::try_parse_from(["bfkit", "exec", "--input", "5,7", ",.,."]).unwrap();
        match cli.command {
            Command::Exec { input, program, .. } => {
                assert_eq!(input.as_deref(), Some("5,7"));
                assert_eq!(program, ",.,.");
            }
            _ => panic!("expected exec"),
        }
    }

    #[test]
    fn test_cli_accepts_leading_minus() {
        let cli = Cli::try_parse_from(["bfkit", "shorten", "---."]).unwrap();
        assert!(matches!(cli.command, Command::Shorten { ref program } if program == "---."));
    }

    #[test]
    fn test_cli_overrides_limits() {
        let cli = Cli::try_parse_from([
            "bfkit",
            "--max-instructions",
            "99",
            "shorten",
            "+++",
        ])
        .unwrap();
        let limits = override_limits(Limits::default(), &cli);
        assert_eq!(limits.max_instructions, 99);
        assert_eq!(limits.max_memory_cells, Limits::default().max_memory_cells);
    }

    #[test]
    fn test_no_flags_keep_file_limits() {
        let cli = Cli::try_parse_from(["bfkit", "shorten", "+++"]).unwrap();
        let from_file = Limits {
            max_instructions: 5,
            max_memory_cells: 7,
        };
        assert_eq!(override_limits(from_file, &cli), from_file);
    }
}
