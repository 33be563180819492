use tracing::{debug, warn};

use crate::board::{place_piece, row_availability, Board, DEFAULT_BOARD_SIZE};
use crate::protocol::{ClientMsg, Piece, PlayerSlot, ServerMsg, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Uninitialized,
    AwaitingPiece,
    AwaitingServer,
    AwaitingPlayer,
}

/// A locally initiated move waiting for the server verdict, together with
/// the board snapshot taken right before the optimistic application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub row: usize,
    pub side: Side,
    snapshot: Board,
}

/// Runs a single match: turn order, optimistic placement of our own moves
/// and rollback when the server rejects one. At most one move is in flight
/// at a time, and every inbound verdict is guarded by the sending piece and
/// the turn counter so a reordered or duplicated message can never be
/// applied to the wrong move.
#[derive(Debug, Clone)]
pub struct GameMachine {
    phase: GamePhase,
    board: Board,
    availability: Vec<bool>,
    turn: u32,
    current_piece: Option<Piece>,
    identity: Option<PlayerSlot>,
    roster: Vec<PlayerSlot>,
    pending: Option<PendingMove>,
}

impl GameMachine {
    pub fn new(board_size: usize) -> Self {
        let board = Board::new(board_size);
        let availability = row_availability(&board);
        Self {
            phase: GamePhase::Uninitialized,
            board,
            availability,
            turn: 0,
            current_piece: None,
            identity: None,
            roster: Vec::new(),
            pending: None,
        }
    }

    /// Records our piece and turn order. Write-once: the assignment is
    /// server-issued and immutable for the session.
    pub fn set_identity(&mut self, slot: PlayerSlot) {
        if self.identity.is_none() {
            self.identity = Some(slot);
        }
    }

    /// Stores the roster and, on the first snapshot with both players
    /// present, decides who moves first. The decision is made exactly once.
    pub fn set_roster(&mut self, roster: &[PlayerSlot]) {
        self.roster = roster.to_vec();
        if self.phase != GamePhase::Uninitialized || roster.len() < 2 {
            return;
        }
        let Some(own) = self.identity else {
            warn!("roster is complete but no identity was assigned, cannot start");
            return;
        };
        let Some(first) = roster.iter().find(|slot| slot.turn == 0) else {
            warn!("roster is complete but no player has the first turn, cannot start");
            return;
        };
        self.current_piece = Some(first.piece);
        self.phase = if first.piece == own.piece {
            GamePhase::AwaitingPiece
        } else {
            GamePhase::AwaitingPlayer
        };
    }

    /// Applies our move optimistically and returns the outbound request to
    /// transmit. Outside our turn the request is rejected; the UI disables
    /// input but the machine does not rely on that.
    pub fn request_placement(&mut self, row: usize, side: Side) -> Option<ClientMsg> {
        if self.phase != GamePhase::AwaitingPiece {
            debug!(row, ?side, phase = ?self.phase, "placement request outside our turn, ignoring");
            return None;
        }
        let piece = self.current_piece?;
        let snapshot = self.board.clone();
        self.board = place_piece(&self.board, piece, row, side);
        self.availability = row_availability(&self.board);
        self.pending = Some(PendingMove {
            row,
            side,
            snapshot,
        });
        self.phase = GamePhase::AwaitingServer;
        Some(ClientMsg::PiecePlacement { row, side })
    }

    pub fn apply(&mut self, msg: &ServerMsg) {
        match msg {
            ServerMsg::PiecePlaced {
                player,
                turn,
                row,
                side,
            } => self.apply_piece_placed(*player, *turn, *row, *side),
            ServerMsg::PiecePlacedError { player, turn, .. } => {
                self.apply_piece_placed_error(*player, *turn)
            }
            _ => {}
        }
    }

    fn apply_piece_placed(&mut self, player: Piece, turn: u32, row: usize, side: Side) {
        match self.phase {
            GamePhase::AwaitingServer => {
                let Some(pending) = self.pending.as_ref() else {
                    warn!(%player, turn, "piece_placed with no pending move recorded, ignoring");
                    return;
                };
                if Some(player) != self.current_piece
                    || turn != self.turn
                    || row != pending.row
                    || side != pending.side
                {
                    warn!(
                        %player,
                        turn,
                        row,
                        ?side,
                        expected_turn = self.turn,
                        "piece_placed did not match the pending move, ignoring"
                    );
                    return;
                }
                self.turn += 1;
                self.current_piece = Some(player.other());
                self.pending = None;
                self.phase = GamePhase::AwaitingPlayer;
            }
            GamePhase::AwaitingPlayer => {
                if Some(player) != self.current_piece || turn != self.turn {
                    warn!(
                        %player,
                        turn,
                        expected_turn = self.turn,
                        "piece_placed did not match the expected opponent move, ignoring"
                    );
                    return;
                }
                self.board = place_piece(&self.board, player, row, side);
                self.availability = row_availability(&self.board);
                self.turn += 1;
                self.current_piece = Some(player.other());
                self.phase = GamePhase::AwaitingPiece;
            }
            _ => {
                warn!(
                    %player,
                    turn,
                    phase = ?self.phase,
                    "piece_placed while not awaiting a player or a confirmation, ignoring"
                );
            }
        }
    }

    fn apply_piece_placed_error(&mut self, player: Piece, turn: u32) {
        if self.phase != GamePhase::AwaitingServer {
            warn!(
                %player,
                turn,
                phase = ?self.phase,
                "piece_placed_error while no confirmation was pending, ignoring"
            );
            return;
        }
        if Some(player) != self.current_piece || turn != self.turn {
            warn!(
                %player,
                turn,
                expected_turn = self.turn,
                "piece_placed_error did not match the pending move, ignoring"
            );
            return;
        }
        let Some(pending) = self.pending.take() else {
            warn!(%player, turn, "piece_placed_error with no pending move recorded, ignoring");
            return;
        };
        self.board = pending.snapshot;
        self.availability = row_availability(&self.board);
        self.phase = GamePhase::AwaitingPiece;
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn availability(&self) -> &[bool] {
        &self.availability
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn current_piece(&self) -> Option<Piece> {
        self.current_piece
    }

    pub fn identity(&self) -> Option<PlayerSlot> {
        self.identity
    }

    pub fn roster(&self) -> &[PlayerSlot] {
        &self.roster
    }

    pub fn pending(&self) -> Option<&PendingMove> {
        self.pending.as_ref()
    }
}

impl Default for GameMachine {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE)
    }
}
