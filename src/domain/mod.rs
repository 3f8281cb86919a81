//! Domain entities, value objects and the pure list algorithms.

pub mod category;
pub mod notice;
pub mod projection;
pub mod reorder;
pub mod seed;
pub mod types;
