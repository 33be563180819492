use sidestacker_core::{
    place_piece, Board, ClientMsg, GameMachine, GamePhase, Piece, PlayerSlot, ServerMsg, Side,
};

fn slot(piece: Piece, turn: u32) -> PlayerSlot {
    PlayerSlot { piece, turn }
}

fn full_roster() -> Vec<PlayerSlot> {
    vec![slot(Piece::X, 0), slot(Piece::C, 1)]
}

/// Machine for a player holding X who moves first on a 4x4 board.
fn machine_moving_first() -> GameMachine {
    let mut game = GameMachine::new(4);
    game.set_identity(slot(Piece::X, 0));
    game.set_roster(&full_roster());
    game
}

/// Machine for a player holding C who moves second on a 4x4 board.
fn machine_moving_second() -> GameMachine {
    let mut game = GameMachine::new(4);
    game.set_identity(slot(Piece::C, 1));
    game.set_roster(&full_roster());
    game
}

fn confirmation(player: Piece, turn: u32, row: usize, side: Side) -> ServerMsg {
    ServerMsg::PiecePlaced {
        player,
        turn,
        row,
        side,
    }
}

fn rejection(player: Piece, turn: u32, row: usize, side: Side) -> ServerMsg {
    ServerMsg::PiecePlacedError {
        player,
        turn,
        row,
        side,
    }
}

#[test]
fn moving_first_starts_awaiting_our_piece() {
    let game = machine_moving_first();
    assert_eq!(game.phase(), GamePhase::AwaitingPiece);
    assert_eq!(game.current_piece(), Some(Piece::X));
}

#[test]
fn moving_second_starts_awaiting_the_opponent() {
    let game = machine_moving_second();
    assert_eq!(game.phase(), GamePhase::AwaitingPlayer);
    assert_eq!(game.current_piece(), Some(Piece::X));
}

#[test]
fn partial_roster_does_not_start_the_match() {
    let mut game = GameMachine::new(4);
    game.set_identity(slot(Piece::X, 0));
    game.set_roster(&[slot(Piece::X, 0)]);
    assert_eq!(game.phase(), GamePhase::Uninitialized);
    assert_eq!(game.current_piece(), None);
}

#[test]
fn start_decision_is_made_once() {
    let mut game = machine_moving_first();
    let placed = game.request_placement(0, Side::Left);
    assert!(placed.is_some());
    // A later roster snapshot must not re-run the first-mover decision.
    game.set_roster(&full_roster());
    assert_eq!(game.phase(), GamePhase::AwaitingServer);
}

#[test]
fn identity_is_write_once() {
    let mut game = GameMachine::new(4);
    game.set_identity(slot(Piece::X, 0));
    game.set_identity(slot(Piece::C, 1));
    assert_eq!(game.identity(), Some(slot(Piece::X, 0)));
}

#[test]
fn optimistic_placement_sends_and_awaits_the_server() {
    let mut game = machine_moving_first();
    let outbound = game.request_placement(2, Side::Left);
    assert_eq!(
        outbound,
        Some(ClientMsg::PiecePlacement {
            row: 2,
            side: Side::Left
        })
    );
    assert_eq!(game.phase(), GamePhase::AwaitingServer);
    assert_eq!(game.board().cell(2, 0), Some(Piece::X));
    assert!(game.pending().is_some());
    assert_eq!(game.turn(), 0);
}

#[test]
fn confirmation_completes_the_move() {
    let mut game = machine_moving_first();
    game.request_placement(2, Side::Left);
    game.apply(&confirmation(Piece::X, 0, 2, Side::Left));
    assert_eq!(game.phase(), GamePhase::AwaitingPlayer);
    assert_eq!(game.turn(), 1);
    assert_eq!(game.current_piece(), Some(Piece::C));
    assert!(game.pending().is_none());
    assert_eq!(game.board().cell(2, 0), Some(Piece::X));
}

#[test]
fn rejection_rolls_back_to_the_snapshot() {
    let mut game = machine_moving_first();
    let before = game.board().clone();
    game.request_placement(2, Side::Left);
    assert_ne!(game.board(), &before);
    game.apply(&rejection(Piece::X, 0, 2, Side::Left));
    assert_eq!(game.phase(), GamePhase::AwaitingPiece);
    assert_eq!(game.board(), &before);
    assert_eq!(game.turn(), 0);
    assert!(game.pending().is_none());
}

#[test]
fn rollback_restores_availability() {
    let mut game = GameMachine::new(2);
    game.set_identity(slot(Piece::X, 0));
    game.set_roster(&full_roster());
    // Fill row 0 up to its last cell so our move exhausts it.
    game.request_placement(0, Side::Left);
    game.apply(&confirmation(Piece::X, 0, 0, Side::Left));
    game.apply(&confirmation(Piece::C, 1, 1, Side::Left));
    game.request_placement(0, Side::Right);
    assert_eq!(game.availability()[0], false);
    game.apply(&rejection(Piece::X, 2, 0, Side::Right));
    assert_eq!(game.availability()[0], true);
}

#[test]
fn opponent_move_is_applied() {
    let mut game = machine_moving_second();
    game.apply(&confirmation(Piece::X, 0, 1, Side::Right));
    assert_eq!(game.phase(), GamePhase::AwaitingPiece);
    assert_eq!(game.turn(), 1);
    assert_eq!(game.current_piece(), Some(Piece::C));
    assert_eq!(game.board().cell(1, 3), Some(Piece::X));
}

#[test]
fn turn_counter_counts_both_players() {
    let mut game = machine_moving_first();
    game.request_placement(0, Side::Left);
    game.apply(&confirmation(Piece::X, 0, 0, Side::Left));
    game.apply(&confirmation(Piece::C, 1, 3, Side::Right));
    game.request_placement(1, Side::Left);
    game.apply(&confirmation(Piece::X, 2, 1, Side::Left));
    assert_eq!(game.turn(), 3);
    assert_eq!(game.phase(), GamePhase::AwaitingPlayer);
}

// The guard-mismatch cases below pin the known limitation: a confirmation
// or rejection that does not match is logged and dropped, and the machine
// freezes in place with the pending move still recorded.

#[test]
fn confirmation_with_the_wrong_turn_is_ignored() {
    let mut game = machine_moving_first();
    game.request_placement(2, Side::Left);
    let board = game.board().clone();
    game.apply(&confirmation(Piece::X, 5, 2, Side::Left));
    assert_eq!(game.phase(), GamePhase::AwaitingServer);
    assert_eq!(game.board(), &board);
    assert_eq!(game.turn(), 0);
    assert!(game.pending().is_some());
}

#[test]
fn confirmation_from_the_wrong_player_is_ignored() {
    let mut game = machine_moving_first();
    game.request_placement(2, Side::Left);
    game.apply(&confirmation(Piece::C, 0, 2, Side::Left));
    assert_eq!(game.phase(), GamePhase::AwaitingServer);
    assert!(game.pending().is_some());
}

#[test]
fn confirmation_for_the_wrong_position_is_ignored() {
    let mut game = machine_moving_first();
    game.request_placement(2, Side::Left);
    game.apply(&confirmation(Piece::X, 0, 2, Side::Right));
    assert_eq!(game.phase(), GamePhase::AwaitingServer);
    game.apply(&confirmation(Piece::X, 0, 3, Side::Left));
    assert_eq!(game.phase(), GamePhase::AwaitingServer);
    assert!(game.pending().is_some());
}

#[test]
fn rejection_with_the_wrong_turn_is_ignored() {
    let mut game = machine_moving_first();
    let before = game.board().clone();
    game.request_placement(2, Side::Left);
    game.apply(&rejection(Piece::X, 7, 2, Side::Left));
    assert_eq!(game.phase(), GamePhase::AwaitingServer);
    assert_ne!(game.board(), &before);
    assert!(game.pending().is_some());
}

#[test]
fn stale_opponent_move_is_ignored() {
    let mut game = machine_moving_second();
    game.apply(&confirmation(Piece::X, 3, 1, Side::Left));
    assert_eq!(game.phase(), GamePhase::AwaitingPlayer);
    assert_eq!(game.turn(), 0);
    assert_eq!(game.board(), &Board::new(4));
}

#[test]
fn placement_outside_our_turn_is_rejected() {
    let mut game = machine_moving_second();
    let outbound = game.request_placement(0, Side::Left);
    assert!(outbound.is_none());
    assert_eq!(game.phase(), GamePhase::AwaitingPlayer);
    assert_eq!(game.board(), &Board::new(4));
    assert!(game.pending().is_none());
}

#[test]
fn placement_while_awaiting_the_server_is_rejected() {
    let mut game = machine_moving_first();
    game.request_placement(0, Side::Left);
    let outbound = game.request_placement(1, Side::Left);
    assert!(outbound.is_none());
    let pending = game.pending().unwrap();
    assert_eq!((pending.row, pending.side), (0, Side::Left));
}

#[test]
fn confirmation_before_the_match_starts_is_ignored() {
    let mut game = GameMachine::new(4);
    game.apply(&confirmation(Piece::X, 0, 0, Side::Left));
    assert_eq!(game.phase(), GamePhase::Uninitialized);
    assert_eq!(game.turn(), 0);
}

#[test]
fn optimistic_and_remote_moves_compose_on_the_board() {
    let mut game = machine_moving_first();
    game.request_placement(0, Side::Left);
    game.apply(&confirmation(Piece::X, 0, 0, Side::Left));
    game.apply(&confirmation(Piece::C, 1, 0, Side::Left));
    let expected = place_piece(
        &place_piece(&Board::new(4), Piece::X, 0, Side::Left),
        Piece::C,
        0,
        Side::Left,
    );
    assert_eq!(game.board(), &expected);
    assert_eq!(game.board().cell(0, 1), Some(Piece::C));
}
