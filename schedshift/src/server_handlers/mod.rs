pub mod docs;
pub mod schedule;

pub use docs::*;
pub use schedule::*;
