#![warn(clippy::all)]

use clap::Parser;
use handle_errors::return_error;
use tracing_subscriber::fmt::format::FmtSpan;
use warp::Filter;

use trivia_api::config::{Args, Config};
use trivia_api::store::{MemoryStore, PgStore, QuestionStore};

#[tokio::main]
async fn main() -> Result<(), handle_errors::Error> {
    let config = Config::new(Args::parse())?;

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_filter());
    tracing_subscriber::fmt()
        // 위에 만든 필터로 어떤 추적을 기록할지 결정한다.
        .with_env_filter(log_filter)
        // 각 범위가 닫힐 때 이벤트를 기록한다.
        .with_span_events(FmtSpan::CLOSE)
        .init();

    match &config.database_url {
        Some(url) => {
            let store = PgStore::new(url).await?;
            sqlx::migrate!()
                .run(&store.connection)
                .await
                .map_err(handle_errors::Error::MigrationError)?;
            tracing::info!("using PostgreSQL question store");
            serve(store, &config).await
        }
        None => {
            let store = match &config.seed_file {
                Some(path) => MemoryStore::from_file(path)?,
                None => MemoryStore::bundled()?,
            };
            tracing::info!("using in-memory question store");
            serve(store, &config).await
        }
    }
}

async fn serve<S: QuestionStore>(store: S, config: &Config) -> Result<(), handle_errors::Error> {
    let address = config.address()?;

    let routes = trivia_api::routes(store, config.quiz_engine(), config.mutation_policy())
        .with(trivia_api::cors())
        .recover(return_error);

    tracing::info!(%address, "trivia api listening");
    warp::serve(routes).run(address).await;

    Ok(())
}
