pub mod diff;

pub use diff::{diff, DiffArgs};
