pub mod player;

pub use player::{PlayerRecord, PlayerRow, PlayerUpdate};
