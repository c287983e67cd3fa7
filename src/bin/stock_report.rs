use clap::Parser;
use std::process::ExitCode;

use stock::report::{self, ReportCli};

fn main() -> ExitCode {
    stock::logging::init("info");
    let cli = ReportCli::parse();

    match report::run(&cli) {
        Ok(paths) => {
            for path in paths {
                println!("\n已輸出 {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("錯誤: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
