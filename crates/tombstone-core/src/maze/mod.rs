//! Wall layouts and the generator that produces them.

mod generator;
mod layout;

pub use generator::MazeGenerator;
pub use layout::WallLayout;
