use dotenvy::dotenv;
use spotwire::{client::SpotifyClientBuilder, prelude::*};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let redirect_uri = std::env::var("REDIRECT_URI").unwrap_or_else(|_| "http://localhost/callback".to_owned());

    let client_id = std::env::var("CLIENT_ID").expect("Spotify client ID not in environment");
    let spotify_client = SpotifyClientBuilder::new(client_id)
        .build()
        .expect("failed to build Spotify client");

    let flow = spotify_client.implicit_grant();
    let authorization = flow.authorization_url(
        &redirect_uri,
        AuthorizeOptions::new().scopes([Scope::UserReadEmail, Scope::UserReadPrivate]),
    );

    println!("Authorize URL: {}", authorization.url);

    let mut fragment = String::new();

    println!("Callback URL fragment (the part after #):");
    std::io::stdin().read_line(&mut fragment).unwrap();

    let token = flow
        .parse_callback_fragment(fragment.trim(), &authorization.state)
        .expect("invalid callback");

    // implicit grant tokens cannot be refreshed
    spotify_client.set_bearer_token(token.access_token);

    let me: serde_json::Value = spotify_client.users().current_user().await.unwrap();
    println!("Logged in as {} ({})", me["display_name"], me["email"]);
}
