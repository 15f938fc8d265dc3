use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flagbind::ProxyConfig;
use flagbind::app;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flagbind=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let defaults = ProxyConfig::default();

    // A schema field the synthesizer can't express is a build defect, not bad input.
    let command = match app::command(&defaults) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("[fatal] {e}");
            return ExitCode::FAILURE;
        }
    };

    let matches = match command.try_get_matches() {
        Ok(matches) => matches,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprintln!("[error] invalid options, {e}");
            return ExitCode::FAILURE;
        }
    };

    match app::resolve(&matches, defaults) {
        Ok(config) => {
            println!("{config:#?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("[error] {e}");
            ExitCode::FAILURE
        }
    }
}
