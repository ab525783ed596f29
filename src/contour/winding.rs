/// Orientation of a closed contour, derived from the sign of its area.
///
/// The crate follows the y-down screen convention: an outer boundary winds
/// clockwise and has positive signed area and winding value `+1`; a hole
/// winds counter-clockwise with value `-1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl Winding {
    pub fn value(&self) -> i32 {
        match self {
            Winding::Clockwise => 1,
            Winding::CounterClockwise => -1,
        }
    }

    pub fn inverted(&self) -> Self {
        match self {
            Winding::Clockwise => Winding::CounterClockwise,
            Winding::CounterClockwise => Winding::Clockwise,
        }
    }
}
