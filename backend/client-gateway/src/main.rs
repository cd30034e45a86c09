use anyhow::{Context, Result};
use client_gateway::{init_tracing, Config, SocialClient};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config.app).context("Failed to initialize logging")?;

    tracing::info!("Starting social-demo v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let client = SocialClient::in_memory(&config);

    let alice = client
        .sign_up("alice@example.com", "wonderland", "alice")
        .await?;
    let bob = client.sign_up("bob@example.com", "builder1", "bob").await?;

    client.sign_in("bob@example.com", "builder1").await?;
    client.create_post("hi", "x").await?;
    client.sign_out().await;

    client.sign_in("alice@example.com", "wonderland").await?;
    client.follow(&bob).await?;

    let feed = client.home_feed().await?;
    println!("{}", serde_json::to_string_pretty(&feed)?);

    let profile = client.profile(Some(&bob)).await?;
    tracing::info!(
        viewer = %alice,
        user = %profile.user_id,
        followers = profile.followers_count(),
        is_following = profile.is_following,
        "Profile loaded"
    );

    client.shutdown().await;
    Ok(())
}
