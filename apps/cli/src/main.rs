use marketbrief_cli::config::Config;
use marketbrief_cli::watchlist::default_watchlist;
use marketbrief_cli::{build_fetcher, build_normalizer, init_tracing, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_format);
    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }

    let fetcher = build_fetcher(&config)?;
    let normalizer = build_normalizer(&config, fetcher);

    let mut stdout = std::io::stdout();
    run(&config, &normalizer, &default_watchlist(), &mut stdout).await
}
