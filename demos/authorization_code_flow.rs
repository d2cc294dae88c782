use dotenvy::dotenv;
use spotwire::{client::SpotifyClientBuilder, prelude::*};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let redirect_uri = std::env::var("REDIRECT_URI").unwrap_or_else(|_| "http://localhost/callback".to_owned());

    let client_id = std::env::var("CLIENT_ID").expect("Spotify client ID not in environment");
    let spotify_client = SpotifyClientBuilder::new(client_id)
        .client_secret(std::env::var("CLIENT_SECRET").expect("Spotify client secret not in environment"))
        .build()
        .expect("failed to build Spotify client");

    let flow = spotify_client.authorization_code();
    let authorization = flow.authorization_url(
        &redirect_uri,
        AuthorizeOptions::new()
            .scopes([Scope::UserReadPlaybackState, Scope::UserTopRead])
            .show_dialog(true),
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
        .exchange_code(code.trim(), &redirect_uri)
        .await
        .expect("failed to exchange authorization code");

    spotify_client.set_bearer_token(&token.access_token);

    let playback_state: Option<serde_json::Value> = spotify_client.player().playback_state(None).await.unwrap();
    println!("{playback_state:#?}");

    // the refresh token can be used later to get a new access token without asking the user again
    if let Some(refresh_token) = token.refresh_token {
        let refreshed = flow
            .refresh_access_token(&refresh_token)
            .await
            .expect("failed to refresh access token");

        spotify_client.set_bearer_token(refreshed.access_token);
    }

    let me: serde_json::Value = spotify_client.users().current_user().await.unwrap();
    println!("Logged in as {}", me["display_name"]);
}
