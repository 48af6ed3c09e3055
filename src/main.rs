#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Thermodynamics;
#[allow(non_snake_case)]
pub mod Utils;

use Examples::equilibrium_examples::equilibrium_examples;
use Utils::load_from_file::LoadData;
use log::error;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::process::ExitCode;

pub fn main() -> ExitCode {
    if let Err(e) = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("logger not initialised: {}", e);
    }
    // a task file path solves that task, otherwise the ammonia synthesis example runs
    match std::env::args().nth(1) {
        Some(file_name) => {
            let result = LoadData::new(file_name)
                .load_task()
                .and_then(|task| task.run());
            match result {
                Ok(result) => {
                    result.pretty_print();
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
        None => {
            let task: usize = 0;
            equilibrium_examples(task);
            ExitCode::SUCCESS
        }
    }
}
