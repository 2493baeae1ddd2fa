use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use trace_stats::{config, pipeline};

fn init_tracing(level: &str) {
    let level = tracing::Level::from_str(level).unwrap_or(tracing::Level::INFO);
    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> ExitCode {
    let mut config = match config::load_default() {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info");
            tracing::error!(
                config_path = config::DEFAULT_CONFIG_PATH,
                error = %err,
                "Failed to load config"
            );
            eprintln!("Execution halted: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging.level);

    // The only argument is an optional input file name.
    if let Some(input) = std::env::args_os().nth(1) {
        config.set_input_path(PathBuf::from(input));
    }
    tracing::info!(
        app = %config.app.name,
        input = %config.input_path().display(),
        output = %config.output_path().display(),
        "trace-stats starting"
    );

    match pipeline::run(&config) {
        Ok(summary) => {
            for line in summary.lines() {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Run aborted");
            eprintln!("Execution halted: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::config;

    #[test]
    fn default_config_is_valid_toml() -> Result<(), Box<dyn std::error::Error>> {
        let _config = config::load_default()?;
        Ok(())
    }
}
