pub mod frame;
pub mod landmark;

pub use frame::{normalize_sides, Frame};
pub use landmark::Landmark;
