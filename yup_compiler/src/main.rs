use clap::Parser;
use std::io::Read;
use std::process::ExitCode;
use yup_compiler::config::runtime::{parse_log_level, LogLevel, RuntimeConfig};
use yup_compiler::logging;
use yup_compiler::pipeline::{self, PipelineError, PipelineOutput, PipelineResult, ProcessingGate};

static GATE: ProcessingGate = ProcessingGate::new();

/// Lex and parse a Yup++ program and report syntax diagnostics
#[derive(Parser, Debug)]
#[command(
    name = "yup_compiler",
    version,
    after_help = "Exit status is 0 when the program is valid, 1 on diagnostics or failure.\n\
                  Logs go to stderr; the report goes to stdout."
)]
struct Cli {
    /// Source file, or `-` to read from stdin
    #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
    input: Option<String>,

    /// Read the program from stdin
    #[arg(long)]
    stdin: bool,

    /// Print the syntax tree on success (default)
    #[arg(long)]
    tree: bool,

    /// Print only the success line
    #[arg(long, conflicts_with = "tree")]
    no_tree: bool,

    /// Print a JSON document instead of text
    #[arg(long)]
    json: bool,

    /// Print the token list before the report
    #[arg(long)]
    tokens: bool,

    /// Show each diagnostic against its source line
    #[arg(long)]
    explain: bool,

    /// Report true line/column instead of legacy positions
    #[arg(long)]
    source_positions: bool,

    /// error, warning, info or debug
    #[arg(long, value_name = "LEVEL", value_parser = parse_level_arg)]
    log_level: Option<LogLevel>,

    /// Runtime preferences file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    File(String),
    Stdin,
}

impl Cli {
    fn input(&self) -> Input {
        match self.input.as_deref() {
            Some("-") | None => Input::Stdin,
            Some(path) => Input::File(path.to_string()),
        }
    }

    fn show_tree(&self) -> bool {
        self.tree || !self.no_tree
    }
}

fn parse_level_arg(value: &str) -> Result<LogLevel, String> {
    parse_log_level(value).ok_or_else(|| format!("invalid log level '{}'", value))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("Error: {}", message);
            return ExitCode::FAILURE;
        }
    };

    if let Err(message) = init_logging(&config) {
        eprintln!("Error: {}", message);
        return ExitCode::FAILURE;
    }

    GATE.try_process(|| run(&cli, &config)).unwrap_or(ExitCode::FAILURE)
}

/// Preferences file first, then command-line overrides
fn build_config(cli: &Cli) -> Result<RuntimeConfig, String> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::load_from_file(path).map_err(|e| e.to_string())?,
        None => RuntimeConfig::default(),
    };

    if cli.source_positions {
        config.syntax.legacy_positions = false;
    }

    if let Some(level) = cli.log_level {
        config.logging.min_log_level = level;
        config.logging.enable_console_logging = true;
    }

    Ok(config)
}

fn init_logging(config: &RuntimeConfig) -> Result<(), String> {
    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;
    pipeline::validate_pipeline()
}

fn run(cli: &Cli, config: &RuntimeConfig) -> ExitCode {
    let outcome = match cli.input() {
        Input::File(path) => pipeline::process_file_with_config(&path, config),
        Input::Stdin => read_stdin()
            .and_then(|source| pipeline::process_source_with_config(&source, config)),
    };

    match outcome {
        Ok(result) => {
            print!("{}", render(&result, cli));
            if result.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(error) => {
            logging::safe_log_error(error.error_code(), &error.to_string());
            print!("{}", render_error(&error, cli));
            ExitCode::FAILURE
        }
    }
}

fn read_stdin() -> Result<String, PipelineError> {
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .map_err(|e| PipelineError::pipeline_error(&format!("Failed to read stdin: {}", e)))?;
    Ok(source)
}

fn render(result: &PipelineResult, cli: &Cli) -> String {
    if cli.json {
        return json_line(&PipelineOutput::from_result(result));
    }

    let mut out = String::new();
    if cli.tokens {
        out.push_str(&result.token_dump());
        out.push_str("\n\n");
    }
    out.push_str(&pipeline::format_report(result, cli.show_tree()));
    if cli.explain && !result.is_valid() {
        out.push('\n');
        out.push_str(&result.explain());
    }
    out
}

fn render_error(error: &PipelineError, cli: &Cli) -> String {
    if cli.json {
        json_line(&PipelineOutput::from_error(error))
    } else {
        pipeline::format_error_report(&[error.user_message()])
    }
}

fn json_line(output: &PipelineOutput) -> String {
    match output.to_json() {
        Ok(json) => format!("{}\n", json),
        Err(e) => format!("Error during processing: {}\n", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("yup_compiler").chain(args.iter().copied())).unwrap()
    }

    fn rejects(args: &[&str]) -> bool {
        Cli::try_parse_from(std::iter::once("yup_compiler").chain(args.iter().copied())).is_err()
    }

    #[test]
    fn test_file_with_flags() {
        let cli = cli(&["--tokens", "prog.yup", "--log-level", "debug", "--source-positions"]);

        assert_eq!(cli.input(), Input::File("prog.yup".to_string()));
        assert!(cli.tokens);
        assert!(cli.show_tree());
        assert!(cli.source_positions);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn test_stdin_forms() {
        assert_eq!(cli(&["-"]).input(), Input::Stdin);
        assert_eq!(cli(&["--stdin", "--json"]).input(), Input::Stdin);
    }

    #[test]
    fn test_invalid_command_lines() {
        assert!(rejects(&[]));
        assert!(rejects(&["a.yup", "b.yup"]));
        assert!(rejects(&["--bogus", "a.yup"]));
        assert!(rejects(&["a.yup", "--log-level"]));
        assert!(rejects(&["a.yup", "--log-level", "loud"]));
        assert!(rejects(&["a.yup", "--stdin"]));
        assert!(rejects(&["a.yup", "--tree", "--no-tree"]));
    }

    #[test]
    fn test_build_config_overrides() {
        let config = build_config(&cli(&["--source-positions", "--log-level", "warn", "a.yup"])).unwrap();

        assert!(!config.syntax.legacy_positions);
        assert_eq!(config.logging.min_log_level, LogLevel::Warning);
        assert!(config.logging.enable_console_logging);
    }

    #[test]
    fn test_build_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "[file_processor]\nrequire_yup_extension = true\n").unwrap();

        let config = build_config(&cli(&["--config", path.to_str().unwrap(), "a.yup"])).unwrap();
        assert!(config.file_processor.require_yup_extension);
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let error = build_config(&cli(&["--config", "no_such_prefs.toml", "a.yup"])).unwrap_err();
        assert!(error.contains("no_such_prefs.toml"));
    }

    #[test]
    fn test_render_text_and_tokens() {
        let result = pipeline::process_source("print(x);").unwrap();

        assert_eq!(
            render(&result, &cli(&["--tokens", "a.yup"])),
            "[PRINT(print), LEFT_PAREN((), IDENTIFIER(x), RIGHT_PAREN()), SEMICOLON(;)]\n\n\
             No errors - code is valid\n\nProgram\n  PrintStatement\n    Identifier (x)\n"
        );
        assert_eq!(
            render(&result, &cli(&["--no-tree", "a.yup"])),
            "No errors - code is valid\n"
        );
    }

    #[test]
    fn test_render_errors_with_explain() {
        let result = pipeline::process_source("let x = 5").unwrap();

        let text = render(&result, &cli(&["--explain", "a.yup"]));
        assert!(text.starts_with(
            "Parsing Errors:\n\n• Line 4, Column 8: Expected ';' after declaration\n"
        ));
        assert!(text.contains("1 | let x = 5"));
    }

    #[test]
    fn test_render_json() {
        let result = pipeline::process_source("x = 1;").unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&render(&result, &cli(&["--json", "a.yup"]))).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["tree"]["kind"], "Program");
    }

    #[test]
    fn test_render_pipeline_error() {
        let error = PipelineError::pipeline_error("Failed to read stdin: closed");

        assert_eq!(
            render_error(&error, &cli(&["-"])),
            "Parsing Errors:\n\n• Error during processing: Pipeline error: Failed to read stdin: closed\n"
        );
    }
}
