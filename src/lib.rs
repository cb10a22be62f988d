#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]

pub mod board;
pub mod solver;
