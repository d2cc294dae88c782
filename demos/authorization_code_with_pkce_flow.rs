use dotenvy::dotenv;
use spotwire::{client::SpotifyClientBuilder, prelude::*};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let redirect_uri = std::env::var("REDIRECT_URI").unwrap_or_else(|_| "http://localhost/callback".to_owned());

    // the PKCE flow doesn't need the client secret
    let client_id = std::env::var("CLIENT_ID").expect("Spotify client ID not in environment");
    let spotify_client = SpotifyClientBuilder::new(client_id)
        .build()
        .expect("failed to build Spotify client");

    let flow = spotify_client.authorization_code_pkce();
    let authorization = flow.authorization_url(
        &redirect_uri,
        AuthorizeOptions::new().scopes([Scope::UserReadRecentlyPlayed]),
    );

    println!("Authorize URL: {}", authorization.url);

    let mut code = String::new();
    let mut state = String::new();

    println!("Code:");
    std::io::stdin().read_line(&mut code).unwrap();

    println!("State:");
    std::io::stdin().read_line(&mut state).unwrap();

    authorization
        .verify_state(state.trim())
        .expect("state returned in the callback doesn't match");

    let token = flow
        .exchange_code(code.trim(), &authorization.code_verifier, &redirect_uri)
        .await
        .expect("failed to exchange authorization code");

    spotify_client.set_bearer_token(token.access_token);

    let recently_played: Page<serde_json::Value> = spotify_client
        .player()
        .recently_played(Some(10), None, None)
        .await
        .unwrap();

    for item in recently_played.items {
        println!("{}", item["track"]["name"]);
    }
}
