//! Bounded-window streaming mean

use super::RingBuffer;
use crate::error::{Error, Result};
use std::fmt;

/// Mean of the last `window_size` values
///
/// The running sum is updated incrementally: the evicted value is subtracted
/// and the new value added in the same `add` call. Both updates go through
/// compensated (Neumaier) summation so the sum tracks the retained values
/// without accumulating rounding drift over long streams.
///
/// If the running sum stops being finite (an intermediate overflow, or an
/// infinite value entering the window) it is rebuilt from the retained
/// values, so the average recovers once those values are evicted.
#[derive(Debug, Clone)]
pub struct WindowedAverage {
    values: RingBuffer<f64>,
    sum: f64,
    compensation: f64,
}

impl WindowedAverage {
    /// Create an empty window; `window_size` must be at least 1
    pub fn new(window_size: usize) -> Result<Self> {
        let values = RingBuffer::new(window_size).map_err(|_| Error::InvalidCapacity {
            what: "Window size",
            value: window_size,
        })?;
        Ok(Self {
            values,
            sum: 0.0,
            compensation: 0.0,
        })
    }

    /// Add a value and return the average after inclusion
    pub fn add(&mut self, value: f64) -> f64 {
        if let Some(evicted) = self.values.push(value) {
            self.accumulate(-evicted);
        }
        self.accumulate(value);
        if !(self.sum.is_finite() && self.compensation.is_finite()) {
            self.resum();
        }
        self.average()
    }

    /// Current average, 0.0 when empty
    pub fn average(&self) -> f64 {
        match self.values.len() {
            0 => 0.0,
            count => self.sum() / count as f64,
        }
    }

    /// Sum of the retained values
    pub fn sum(&self) -> f64 {
        self.sum + self.compensation
    }

    /// Number of values currently contributing
    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn window_size(&self) -> usize {
        self.values.capacity()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.sum = 0.0;
        self.compensation = 0.0;
    }

    fn accumulate(&mut self, x: f64) {
        (self.sum, self.compensation) = neumaier_step(self.sum, self.compensation, x);
    }

    /// Recompute the running sum from the retained values
    fn resum(&mut self) {
        let (sum, compensation) = self
            .values
            .iter()
            .fold((0.0, 0.0), |(sum, compensation), &x| neumaier_step(sum, compensation, x));
        self.sum = sum;
        // an overflowing window has no meaningful correction term
        self.compensation = if compensation.is_finite() { compensation } else { 0.0 };
    }
}

fn neumaier_step(sum: f64, compensation: f64, x: f64) -> (f64, f64) {
    let total = sum + x;
    let correction = if sum.abs() >= x.abs() {
        (sum - total) + x
    } else {
        (x - total) + sum
    };
    (total, compensation + correction)
}

impl fmt::Display for WindowedAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WindowedAverage(window_size={}, count={}, avg={:.2})",
            self.window_size(),
            self.count(),
            self.average()
        )
    }
}
