use tracing::warn;

use crate::game_id::GameId;
use crate::protocol::{PlayerSlot, ServerMsg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingId,
    AwaitingConnection,
    AwaitingPlayer,
    PlayingGame,
    GameResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Tie,
    Won,
    Lost,
}

/// Tracks the coarse session lifecycle: id acquisition, the connection
/// handshake, waiting for the opponent, active play and the final results.
/// Game rules live on the server; this machine only mirrors roster and
/// outcome signals.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    phase: SessionPhase,
    game_id: Option<GameId>,
    identity: Option<PlayerSlot>,
    roster: Vec<PlayerSlot>,
    notice: Option<String>,
    outcome: Option<MatchOutcome>,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::AwaitingId,
            game_id: None,
            identity: None,
            roster: Vec::new(),
            notice: None,
            outcome: None,
        }
    }

    pub fn set_game_id(&mut self, game_id: GameId) {
        if self.game_id.is_some() {
            return;
        }
        self.game_id = Some(game_id);
        if self.phase == SessionPhase::AwaitingId {
            self.phase = SessionPhase::AwaitingConnection;
        }
    }

    pub fn apply(&mut self, msg: &ServerMsg) {
        match msg {
            ServerMsg::Connection { player, turn } => {
                // Records self only; the phase advance is driven by player_info,
                // since the two can arrive in either order.
                self.identity = Some(PlayerSlot {
                    piece: *player,
                    turn: *turn,
                });
            }
            ServerMsg::PlayerInfo { players } => {
                self.roster = players.clone();
                self.phase = if players.len() >= 2 {
                    SessionPhase::PlayingGame
                } else {
                    SessionPhase::AwaitingPlayer
                };
            }
            ServerMsg::Disconnection { player } => {
                self.notice = Some(format!("player with the {player} pieces disconnected"));
            }
            ServerMsg::GameOver { winner } => {
                let outcome = match winner {
                    None => MatchOutcome::Tie,
                    Some(winner) => {
                        let Some(own) = self.identity else {
                            warn!("game_over before the connection handshake, ignoring");
                            return;
                        };
                        if *winner == own.piece {
                            MatchOutcome::Won
                        } else {
                            MatchOutcome::Lost
                        }
                    }
                };
                self.outcome = Some(outcome);
                self.phase = SessionPhase::GameResults;
            }
            ServerMsg::PiecePlaced { .. } | ServerMsg::PiecePlacedError { .. } => {}
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn game_id(&self) -> Option<&GameId> {
        self.game_id.as_ref()
    }

    pub fn identity(&self) -> Option<PlayerSlot> {
        self.identity
    }

    pub fn roster(&self) -> &[PlayerSlot] {
        &self.roster
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}
