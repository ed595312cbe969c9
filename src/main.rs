use clap::Parser;
use folio::cli::commands::Cli;
use folio::cli::handlers::{self, Context};
use folio::model::config::LogConfig;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let ctx = match Context::load(cli.data_dir.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&ctx.config.log);

    if let Err(e) = handlers::dispatch(cli, &ctx) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// `FOLIO_LOG` wins, then `[log] level` from folio.toml, then `warn`.
fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| {
        config
            .level
            .as_deref()
            .and_then(|level| EnvFilter::try_new(level).ok())
            .unwrap_or_else(|| EnvFilter::new("warn"))
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
