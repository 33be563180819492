pub mod board;
pub mod codec;
pub mod game;
pub mod game_id;
pub mod protocol;
pub mod session;

pub use board::{place_piece, row_availability, Board, Cell, DEFAULT_BOARD_SIZE};
pub use codec::{decode, encode};
pub use game::{GameMachine, GamePhase, PendingMove};
pub use game_id::{is_valid_game_id, GameId, GameIdError, GAME_ID_MAX_LEN};
pub use protocol::{ClientMsg, Piece, PlayerSlot, ServerMsg, Side};
pub use session::{MatchOutcome, SessionMachine, SessionPhase};
