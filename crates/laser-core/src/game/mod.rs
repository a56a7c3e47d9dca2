mod event;
mod player;
mod session;

pub use event::*;
pub use player::*;
pub use session::*;
