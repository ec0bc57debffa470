//! Bounded window of recent digits

use crate::types::Digit;
use serde::Serialize;
use std::collections::VecDeque;

/// Number of trailing digits used for the short-term momentum factor
pub const RECENT_SPAN: usize = 3;

/// Fixed-capacity FIFO of the most recent digits
#[derive(Debug, Clone)]
pub struct DigitWindow {
    digits: VecDeque<Digit>,
    capacity: usize,
}

impl DigitWindow {
    /// Create an empty window. A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            digits: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a digit, evicting the oldest one when full
    pub fn push(&mut self, digit: Digit) {
        if self.digits.len() >= self.capacity {
            self.digits.pop_front();
        }
        self.digits.push_back(digit);
    }

    /// Ordered copy of the window, oldest first
    pub fn snapshot(&self) -> Vec<Digit> {
        self.digits.iter().copied().collect()
    }

    /// Last `n` digits in order (fewer if the window is shorter)
    pub fn recent(&self, n: usize) -> Vec<Digit> {
        let skip = self.digits.len().saturating_sub(n);
        self.digits.iter().skip(skip).copied().collect()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.digits.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> WindowStats {
        WindowStats::from_window(self)
    }
}

/// Statistics derived from a single window state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowStats {
    pub len: usize,
    pub capacity: usize,
    /// Occurrences of each digit 0-9; sums to `len`
    pub counts: [usize; 10],
    /// Digits above 4
    pub over_count: usize,
    /// Over-4 digits among the last three
    pub recent_over: usize,
}

impl WindowStats {
    pub fn from_window(window: &DigitWindow) -> Self {
        Self::from_digits(&window.snapshot(), window.capacity())
    }

    pub fn from_digits(digits: &[Digit], capacity: usize) -> Self {
        let mut counts = [0usize; 10];
        for d in digits {
            counts[d.value() as usize] += 1;
        }
        let over_count = digits.iter().filter(|d| d.is_over()).count();
        let recent_start = digits.len().saturating_sub(RECENT_SPAN);
        let recent_over = digits[recent_start..].iter().filter(|d| d.is_over()).count();

        Self {
            len: digits.len(),
            capacity,
            counts,
            over_count,
            recent_over,
        }
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// Fraction of over-4 digits, 0.0 for an empty window
    pub fn over_ratio(&self) -> f64 {
        if self.len == 0 {
            0.0
        } else {
            self.over_count as f64 / self.len as f64
        }
    }

    /// Over-4 percentage rounded to one decimal place
    pub fn over_percentage(&self) -> f64 {
        (self.over_ratio() * 1000.0).round() / 10.0
    }
}
