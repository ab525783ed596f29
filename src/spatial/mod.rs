pub mod kd_tree;
pub mod quad_tree;

pub use kd_tree::*;
pub use quad_tree::*;
