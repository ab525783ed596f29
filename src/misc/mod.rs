pub mod disjoint_set;
pub mod floating_point;
pub mod invertible;
pub mod orientation;

pub use disjoint_set::*;
pub use floating_point::*;
pub use invertible::*;
pub use orientation::*;
