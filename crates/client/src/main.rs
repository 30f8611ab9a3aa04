mod app;
mod config;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PAYDESK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{}", err.user_message());
        std::process::exit(1);
    }
}

async fn run() -> app::Result<()> {
    let (config, args) = config::load()?;
    app::App::new(&config, args.password)?.run(args.command).await
}
