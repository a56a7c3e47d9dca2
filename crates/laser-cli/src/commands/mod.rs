pub mod game;
pub mod play;
pub mod ports;
pub mod records;
pub mod replay;
