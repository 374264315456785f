use groundwork::{Credentials, GroundsClient, MemoryStore, SessionStore as _};
use snafu::prelude::*;

#[snafu::report]
#[tokio::main]
pub async fn main() -> Result<(), snafu::Whatever> {
    let base_url = std::env::var("GROUNDS_API_URL").whatever_context("Failed to get GROUNDS_API_URL")?;
    let login = std::env::var("GROUNDS_LOGIN").whatever_context("Failed to get GROUNDS_LOGIN")?;
    let password =
        std::env::var("GROUNDS_PASSWORD").whatever_context("Failed to get GROUNDS_PASSWORD")?;

    let http_client = groundwork::http::default_client()
        .whatever_context("Failed to build the HTTP client")?;

    let client = GroundsClient::builder()
        .base_url(base_url)
        .whatever_context("Invalid base URL")?
        .http_client(http_client)
        .store(MemoryStore::new())
        .build();

    let user = client
        .login(Credentials::new(login, password))
        .await
        .whatever_context("Failed to log in")?;
    println!("Signed in as {} (id {})", user.name, user.id);

    let updates = client
        .social_updates(user.id)
        .await
        .whatever_context("Failed to fetch social updates")?;
    println!(
        "{} friends, {} pending requests, {} blacklisted",
        updates.friends.len(),
        updates.friend_requests.len(),
        updates.blacklist.len()
    );

    let parks = client.parks().await.whatever_context("Failed to fetch grounds")?;
    println!("{} workout grounds known to the server", parks.len());
    println!("has_parks flag: {}", client.store().has_parks());

    Ok(())
}
