pub mod collidable;
pub mod collision_manager;

pub use collidable::*;
pub use collision_manager::*;
