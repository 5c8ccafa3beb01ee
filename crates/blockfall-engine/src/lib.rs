pub use self::{config::*, core::*, engine::*, high_score::*};

pub mod config;
pub mod core;
pub mod engine;
pub mod high_score;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when moving falling piece")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum HoldError {
    #[display("piece colliding when holding piece")]
    PieceCollision(PieceCollisionError),
    #[display("hold already used in this turn")]
    HoldAlreadyUsed,
}
