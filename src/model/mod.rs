pub mod message;
pub mod game_save;
