use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use minish::error::ShellError;
use minish::flags::Flags;
use minish::shell::Shell;

fn main() -> ExitCode {
    let flags = Flags::parse();
    init_logging(flags.debug);

    match run(flags) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("minish: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module("minish", LevelFilter::Debug);
    }
    builder.init();
}

fn run(flags: Flags) -> Result<ExitCode, ShellError> {
    let command = flags.execute.clone();
    let mut shell = Shell::new(flags)?;

    if let Some(line) = command {
        let outcome = shell.run_line(&line);
        return Ok(if outcome.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    shell.run()?;
    Ok(ExitCode::SUCCESS)
}
