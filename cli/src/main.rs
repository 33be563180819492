use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sidestacker_cli::api;
use sidestacker_cli::bot::{self, PlayConfig};
use sidestacker_cli::client::GameClient;
use sidestacker_core::{GameId, DEFAULT_BOARD_SIZE};

#[derive(Parser)]
#[command(name = "sidestacker-cli", version, about = "Sidestacker client tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new game and print its id and shareable join link.
    NewGame {
        #[arg(long, env = "SIDESTACKER_API_BASE_URL", default_value = "http://localhost:5000")]
        api_base_url: String,
        /// Ask the server for a computer-controlled opponent.
        #[arg(long)]
        vs_computer: bool,
    },
    /// Join a game and play random legal moves until it ends.
    Play {
        #[arg(long, env = "SIDESTACKER_WS_BASE_URL", default_value = "ws://localhost:5000")]
        ws_base_url: String,
        #[arg(long)]
        game_id: String,
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        board_size: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 250)]
        think_min_ms: u64,
        #[arg(long, default_value_t = 1200)]
        think_max_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::NewGame {
            api_base_url,
            vs_computer,
        } => {
            let game_id = api::new_game(&api_base_url, vs_computer).await?;
            println!("game_id: {game_id}");
            println!("join_url: {api_base_url}/new-game?gameId={game_id}");
            Ok(())
        }
        Commands::Play {
            ws_base_url,
            game_id,
            board_size,
            seed,
            think_min_ms,
            think_max_ms,
        } => {
            let game_id = GameId::parse(&game_id)?;
            let client = GameClient::connect(&ws_base_url, game_id).await?;
            let config = PlayConfig {
                board_size,
                think_min_ms,
                think_max_ms,
            };
            let outcome = bot::run_match(client, config, seed).await?;
            println!("result: {outcome:?}");
            Ok(())
        }
    }
}
