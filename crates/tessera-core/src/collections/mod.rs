//! Stateful containers owned by a session
//!
//! - [`OrderedSet`] - sorted, duplicate-free set with logarithmic lookups
//! - [`RingBuffer`] - fixed-capacity circular sequence
//! - [`WindowedAverage`] - bounded-window streaming mean

pub mod ordered_set;
pub mod ring_buffer;
pub mod windowed_average;

pub use ordered_set::OrderedSet;
pub use ring_buffer::RingBuffer;
pub use windowed_average::WindowedAverage;
