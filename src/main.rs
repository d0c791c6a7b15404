use std::{fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use clap::Parser;
use log::info;
use minic::{
    ast::ast::Stmt,
    errors::diagnostics::Diagnostic,
    lexer::lexer::tokenize,
    parser::parser::{parse_with_options, ParserOptions},
};

#[derive(Debug, Parser)]
#[command(name = "minic")]
#[command(about = "Front end for a small C-like language")]
#[command(version = "0.1.0")]
struct Cli {
    /// Source file to check
    file: PathBuf,

    /// Parse only, skipping the array/function/argument checks
    #[arg(long)]
    no_semantics: bool,

    /// Print the AST as S-expressions
    #[arg(long)]
    ast: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let options = ParserOptions {
        check_semantics: !cli.no_semantics,
    };

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("failed to read {}: {}", cli.file.display(), error);
            return ExitCode::from(2);
        }
    };

    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.to_string_lossy().into_owned());

    let start = Instant::now();

    let tokens = match tokenize(source.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => {
            println!("{}", Diagnostic::from(error).render(&source));
            return ExitCode::from(1);
        }
    };

    info!("tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let (parser, program) = parse_with_options(tokens, Rc::new(file_name), options);

    info!("parsed in {:?}", parse_start.elapsed());

    for diagnostic in parser.diagnostics() {
        println!("{}", diagnostic.render(&source));
    }

    let program = match program {
        Ok(program) => program,
        Err(error) => {
            println!("{}", Diagnostic::from(error).render(&source));
            return ExitCode::from(1);
        }
    };

    if cli.ast {
        for global in &program.globals {
            println!("{}", global.sexpr());
        }
        for function in &program.functions {
            println!("{}", function.sexpr());
        }
    }

    info!("total time: {:?}", start.elapsed());

    if parser.diagnostics().is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, CommandFactory, Parser};

    use super::Cli;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["minic", "--no-semantics", "--ast", "prog.c"]).unwrap();
        assert!(cli.no_semantics);
        assert!(cli.ast);
        assert_eq!(cli.file.to_str(), Some("prog.c"));

        let cli = Cli::try_parse_from(["minic", "prog.c"]).unwrap();
        assert!(!cli.no_semantics);
        assert!(!cli.ast);
    }

    #[test]
    fn test_cli_usage_errors() {
        let error = Cli::try_parse_from(["minic", "--bogus", "prog.c"]).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::UnknownArgument);

        let error = Cli::try_parse_from(["minic"]).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);

        let error = Cli::try_parse_from(["minic", "a.c", "b.c"]).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::UnknownArgument);
    }
}
