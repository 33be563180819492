use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    X,
    C,
}

impl Piece {
    pub fn other(self) -> Piece {
        match self {
            Piece::X => Piece::C,
            Piece::C => Piece::X,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Piece::X => f.write_str("X"),
            Piece::C => f.write_str("C"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub piece: Piece,
    pub turn: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMsg {
    #[serde(rename = "connection")]
    Connection { player: Piece, turn: u32 },
    #[serde(rename = "player_info")]
    PlayerInfo { players: Vec<PlayerSlot> },
    #[serde(rename = "disconnection")]
    Disconnection { player: Piece },
    #[serde(rename = "game_over")]
    GameOver {
        #[serde(default)]
        winner: Option<Piece>,
    },
    #[serde(rename = "piece_placed")]
    PiecePlaced {
        player: Piece,
        turn: u32,
        row: usize,
        side: Side,
    },
    #[serde(rename = "piece_placed_error")]
    PiecePlacedError {
        player: Piece,
        turn: u32,
        row: usize,
        side: Side,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMsg {
    #[serde(rename = "piece-placement")]
    PiecePlacement { row: usize, side: Side },
}
