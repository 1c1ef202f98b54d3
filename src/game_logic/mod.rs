pub mod dispatch;
pub mod errors;
pub mod jewels;
pub mod movement;
pub mod spawning;

pub use dispatch::*;
pub use jewels::*;
pub use spawning::*;
