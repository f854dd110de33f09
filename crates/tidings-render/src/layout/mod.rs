//! The multi-pass layout engine.
//!
//! Template items become [`Row`]s routed into [`Column`]s; a [`Frame`]
//! drives the fixed pipeline that positions them and hands the result to
//! the grid renderer.

mod column;
mod frame;
mod position;
mod row;

pub use column::Column;
pub use frame::Frame;
pub use position::PositionIndex;
pub use row::Row;
