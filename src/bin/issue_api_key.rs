//! Issue an API key.
//!
//! Usage: `issue_api_key <name> <abilities>` where abilities is a comma-separated list
//! (e.g. `access_products,show_products`) or `*`. The plaintext key is printed once.

use anyhow::{anyhow, bail, Context};

use stockroom::config::Config;
use stockroom::middleware::auth::{issue_api_key, Ability, MySqlApiKeyRepository};
use stockroom::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(name), Some(abilities)) = (args.next(), args.next()) else {
        bail!("usage: issue_api_key <name> <abilities|*>");
    };

    let abilities = Ability::parse_list(&abilities).map_err(|e| anyhow!(e))?;

    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config.app).context("Failed to initialize tracing")?;

    let pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;
    let repository = MySqlApiKeyRepository::new(pool);

    let (record, plaintext) = issue_api_key(&repository, &name, &abilities).await?;

    println!("id:        {}", record.id);
    println!("name:      {}", record.name);
    println!("abilities: {}", record.abilities);
    println!("api key:   {}", plaintext);

    Ok(())
}
