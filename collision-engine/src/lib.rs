mod vector;
pub use vector::*;
mod error;
pub use error::*;
mod body;
pub use body::*;
mod collision;
pub use collision::*;
mod stats;
pub use stats::*;
mod config;
pub use config::*;
mod spawn;
pub use spawn::*;
mod world;
pub use world::*;

pub(crate) fn default<T: Default>() -> T {
    T::default()
}
