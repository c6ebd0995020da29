//! Forward points term structures and interpolation.

pub mod forward_points;
pub mod points;
pub mod tenor;
