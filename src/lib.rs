pub mod collision_system;
pub mod error;
pub mod game;
pub mod geo;
pub mod movement;
pub mod users;
pub mod utils;

pub use error::{Result, SimError};

#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;
