//! dominion-protocol
//!
//! Text protocol spoken by the Dominion engine over its stdio.
//!
//! - [`line_reader`]   : buffers one turn of engine output up to `response?`
//! - [`parser`]        : turns a turn's lines into a `GameStateSnapshot`
//! - [`command_codec`] : encodes the move line written back to the engine
//! - [`markers`]       : section markers and other protocol literals

pub mod markers;
pub mod error;
pub mod line_reader;
pub mod parser;
pub mod command_codec;

pub use error::ProtocolError;
pub use line_reader::{read_turn_input, LineReader};
pub use parser::{parse, parse_with, ParseOptions, ParseOutcome, ParseReport};
pub use command_codec::{decode_move, encode_move, write_move};
