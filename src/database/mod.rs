pub mod manager;
pub mod models;
pub mod player;

pub use manager::{DatabaseError, DatabaseManager};
pub use player::{MySqlPlayerStore, PlayerStore};
