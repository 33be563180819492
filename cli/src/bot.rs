use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::sleep;
use tracing::{debug, info};

use sidestacker_core::{
    ClientMsg, GameId, GameMachine, GamePhase, MatchOutcome, ServerMsg, SessionMachine,
    SessionPhase, Side,
};

use crate::client::GameClient;

#[derive(Debug, Clone, Copy)]
pub struct PlayConfig {
    pub board_size: usize,
    pub think_min_ms: u64,
    pub think_max_ms: u64,
}

/// Feeds the two state machines from a single ordered event stream. The
/// session machine always processes a message first so that the game
/// machine reads the identity and roster it derives.
pub struct MatchDriver {
    session: SessionMachine,
    game: GameMachine,
}

impl MatchDriver {
    pub fn new(board_size: usize) -> Self {
        Self {
            session: SessionMachine::new(),
            game: GameMachine::new(board_size),
        }
    }

    pub fn set_game_id(&mut self, game_id: GameId) {
        self.session.set_game_id(game_id);
    }

    pub fn dispatch(&mut self, msg: &ServerMsg) {
        self.session.apply(msg);
        if let Some(own) = self.session.identity() {
            self.game.set_identity(own);
        }
        if let ServerMsg::PlayerInfo { players } = msg {
            self.game.set_roster(players);
        }
        self.game.apply(msg);
    }

    pub fn request_placement(&mut self, row: usize, side: Side) -> Option<ClientMsg> {
        self.game.request_placement(row, side)
    }

    pub fn session(&self) -> &SessionMachine {
        &self.session
    }

    pub fn game(&self) -> &GameMachine {
        &self.game
    }
}

/// Plays one match to completion with random legal moves, returning the
/// outcome relative to this player.
pub async fn run_match(
    mut client: GameClient,
    config: PlayConfig,
    seed: Option<u64>,
) -> Result<MatchOutcome, Box<dyn std::error::Error>> {
    let mut rng = {
        let base_seed = seed.unwrap_or_else(|| rand::rng().random());
        StdRng::seed_from_u64(base_seed)
    };
    let mut driver = MatchDriver::new(config.board_size);
    driver.set_game_id(client.game_id().clone());

    loop {
        // Drain whatever already arrived before deciding on a move.
        while let Some(msg) = client.try_next() {
            driver.dispatch(&msg);
        }
        if driver.session().phase() == SessionPhase::GameResults {
            break;
        }
        if driver.session().phase() == SessionPhase::PlayingGame
            && driver.game().phase() == GamePhase::AwaitingPiece
        {
            think(&mut rng, config).await;
            if let Some((row, side)) = pick_move(&mut rng, driver.game().availability()) {
                if let Some(outbound) = driver.request_placement(row, side) {
                    debug!(row, ?side, "placing piece");
                    client.send(outbound);
                }
                continue;
            }
            debug!("no rows available, waiting for the server verdict");
        }
        let Some(msg) = client.recv().await else {
            break;
        };
        driver.dispatch(&msg);
    }

    if let Some(outcome) = driver.session().outcome() {
        info!(?outcome, turns = driver.game().turn(), "match finished");
        return Ok(outcome);
    }
    match client.last_error() {
        Some(error) => Err(error.into()),
        None => Err("connection closed before the game finished".into()),
    }
}

async fn think(rng: &mut StdRng, config: PlayConfig) {
    let min = config.think_min_ms.min(config.think_max_ms);
    let max = config.think_max_ms.max(config.think_min_ms);
    if max == 0 {
        return;
    }
    let delay = rng.random_range(min..=max);
    if delay > 0 {
        sleep(Duration::from_millis(delay)).await;
    }
}

fn pick_move(rng: &mut StdRng, availability: &[bool]) -> Option<(usize, Side)> {
    let open: Vec<usize> = availability
        .iter()
        .enumerate()
        .filter_map(|(row, open)| open.then_some(row))
        .collect();
    if open.is_empty() {
        return None;
    }
    let row = open[rng.random_range(0..open.len())];
    let side = if rng.random_bool(0.5) {
        Side::Left
    } else {
        Side::Right
    };
    Some((row, side))
}
