use minemap::config::USAGE;
use minemap::{parse_args, pipeline, Command};
use minemap_logger::{log, set_min_severity, LogSeverity::*};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Render(config)) => config,
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            log(format!("{}", err), Fatal);
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    if config.verbose {
        set_min_severity(Debug);
    }

    log(format!("minemap: rendering {}", config.input.display()), Info);
    match pipeline::run(&config).await {
        Ok(summary) => {
            log(
                format!(
                    "Wrote {} ({}x{}, {} sectors, {} pixels)",
                    config.output.display(),
                    summary.width,
                    summary.height,
                    summary.sectors,
                    summary.pixels
                ),
                Info,
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log(format!("{}", err), Fatal);
            ExitCode::FAILURE
        }
    }
}
