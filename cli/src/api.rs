use serde::Deserialize;
use url::Url;

use sidestacker_core::GameId;

#[derive(Debug, Deserialize)]
struct NewGameResponse {
    game_id: String,
}

/// Asks the server for a fresh game id. The returned id is the only input
/// needed to open the game channel.
pub async fn new_game(
    api_base: &str,
    vs_computer: bool,
) -> Result<GameId, Box<dyn std::error::Error>> {
    let mut url = Url::parse(api_base)?;
    let base_path = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{base_path}/api/new-game"));
    if vs_computer {
        url.query_pairs_mut().append_pair("vs-computer", "true");
    }
    let client = reqwest::Client::new();
    let response = client.post(url).send().await?.error_for_status()?;
    let body: NewGameResponse = response.json().await?;
    Ok(GameId::parse(&body.game_id)?)
}
