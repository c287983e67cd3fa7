use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;

use stock::query::{self, QueryCli};

fn main() -> ExitCode {
    stock::logging::init("warn");

    let cli = match QueryCli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                return ExitCode::SUCCESS;
            }
            _ => {
                // 參數錯誤：用法印到 stdout，原因印到 stderr
                println!("{}", QueryCli::command().render_help());
                eprintln!("{}", err.render());
                return ExitCode::FAILURE;
            }
        },
    };

    match query::run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("錯誤: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
