//! Ace Engine exercises
//!
//! Lists the exercises, reads a choice from the first argument or stdin and
//! runs the chosen one in a 640x480 window.
//!
//! Run with: cargo run -p ace_demo -- 4

mod exercises;
mod menu;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use ace_engine::ace::platform::EngineConfig;
use ace_engine::{engine_error, engine_info};
use ace_engine_renderer_opengl::ace::OpenGlEngine;

use exercises::sorted_exercises;
use menu::{format_menu, parse_choice, MenuChoice};

const LOG_SOURCE: &str = "ace::Demo";

fn read_choice() -> String {
    if let Some(arg) = std::env::args().nth(1) {
        return arg;
    }

    print!("Choice: ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        line.clear();
    }
    line
}

fn main() -> ExitCode {
    let exercises = sorted_exercises();
    let names: Vec<&str> = exercises.iter().map(|exercise| exercise.name).collect();
    print!("{}", format_menu(&names));

    let input = read_choice();
    let index = match parse_choice(&input, exercises.len()) {
        Some(MenuChoice::Exit) => return ExitCode::SUCCESS,
        Some(MenuChoice::Run(index)) => index,
        None => {
            eprintln!("Invalid choice: '{}'", input.trim());
            return ExitCode::FAILURE;
        }
    };
    let exercise = exercises[index];

    let mut engine = OpenGlEngine::new();
    if let Err(e) = engine.init(EngineConfig::windowed(640, 480, exercise.name)) {
        eprintln!("Failed to initialize engine: {}", e);
        return ExitCode::FAILURE;
    }

    engine_info!(LOG_SOURCE, "Starting exercise {}", exercise.name);
    if let Err(e) = (exercise.run)(&mut engine) {
        eprintln!("{} failed: {:#}", exercise.name, e);
        engine_error!(LOG_SOURCE, "{} failed: {:#}", exercise.name, e);
    }

    engine.shutdown();
    ExitCode::SUCCESS
}
