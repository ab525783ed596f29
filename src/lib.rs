mod boolean;
mod bounding_box;
mod contour;
mod graph;
mod misc;
mod simplex;
mod spatial;

pub mod prelude {
    pub use crate::boolean::*;
    pub use crate::bounding_box::*;
    pub use crate::contour::*;
    pub use crate::graph::*;
    pub use crate::misc::*;
    pub use crate::simplex::*;
    pub use crate::spatial::*;
}
