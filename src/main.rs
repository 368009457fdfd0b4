use regserve::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env in development; absence is fine.
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;
    regserve::start_server(config).await?;

    Ok(())
}
