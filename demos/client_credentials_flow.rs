use dotenvy::dotenv;
use spotwire::{client::SpotifyClientBuilder, prelude::*};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let client_id = std::env::var("CLIENT_ID").expect("Spotify client ID not in environment");
    let spotify_client = SpotifyClientBuilder::new(client_id)
        .client_secret(std::env::var("CLIENT_SECRET").expect("Spotify client secret not in environment"))
        .build()
        .expect("failed to build Spotify client");

    let token = spotify_client
        .client_credentials()
        .request_access_token()
        .await
        .expect("failed to request access token");

    println!("Token expires in {} seconds", token.expires_in);
    spotify_client.set_bearer_token(token.access_token);

    // the client credentials token only allows endpoints that don't access user information
    let track: serde_json::Value = spotify_client
        .tracks()
        .get("2PoYyfBkedDBPGAh0ZUoHW", None)
        .await
        .expect("failed to get track");

    println!("{} - {}", track["artists"][0]["name"], track["name"]);

    let results: serde_json::Value = spotify_client
        .search()
        .query("odesza")
        .types([ItemType::Artist])
        .limit(5)
        .send()
        .await
        .expect("failed to search");

    let artists: Page<serde_json::Value> =
        serde_json::from_value(results["artists"].clone()).expect("failed to parse artist page");

    for artist in &artists.items {
        println!("{}", artist["name"]);
    }
}
