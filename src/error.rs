//! Error type shared by the collision, scheduling and movement modules.

use crate::collision_system::CollidableId;
use crate::game::GameId;
use thiserror::Error;

/// Usage errors reported by this crate.
///
/// Geometry predicates never fail; everything here is a misuse of an object's
/// lifecycle or a malformed input.
#[derive(Debug, Error)]
pub enum SimError {
    /// A collidable was disposed a second time.
    #[error("cannot dispose collidable {0} twice")]
    CollidableAlreadyDisposed(CollidableId),
    /// A game was disposed a second time.
    #[error("game {0} has already been disposed")]
    GameAlreadyDisposed(GameId),
    /// A game id was registered with a runner twice.
    #[error("game {0} is already registered")]
    GameAlreadyRegistered(GameId),
    /// A game id was unregistered that the runner does not know.
    #[error("game {0} is not registered")]
    GameNotRegistered(GameId),
    /// A movement direction token was not one of `Left`, `Right`, `Up`, `Down`.
    #[error("{0} is an unknown direction")]
    UnknownDirection(String),
    /// The shared timer thread could not be spawned.
    #[error("failed to spawn timer thread: {0}")]
    TimerSpawn(#[from] std::io::Error),
    /// Game settings could not be parsed.
    #[error("invalid game settings: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T, E = SimError> = std::result::Result<T, E>;
