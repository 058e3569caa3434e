pub mod models;
pub mod win_checker;
pub mod minimax;
pub mod bot_strategy;
pub mod game;
pub mod settings;
pub mod arena;
