//! Multi-factor signal scoring

use super::pattern::PatternResult;
use super::window::WindowStats;
use crate::config::SignalConfig;
use crate::types::Signal;

/// Breakdown of the strength score, kept for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Strength {
    pub threshold: u32,
    pub pattern: u32,
    pub momentum: u32,
}

impl Strength {
    pub fn total(&self) -> u32 {
        self.threshold + self.pattern + self.momentum
    }
}

/// Score a full window. Returns `None` while the window is still filling.
pub fn strength(
    stats: &WindowStats,
    pattern: Option<&PatternResult>,
    over_threshold: usize,
    config: &SignalConfig,
) -> Option<Strength> {
    if !stats.is_full() {
        return None;
    }

    let over = stats.over_count;
    let threshold = if over >= over_threshold {
        config.at_threshold_points
    } else if over + 1 >= over_threshold {
        config.near_threshold_points
    } else if over + 2 >= over_threshold {
        config.approaching_threshold_points
    } else {
        0
    };

    let pattern = match pattern {
        Some(p) if p.kind.is_structural() => config.structural_pattern_points,
        Some(p) if p.kind.is_frequency() => config.frequency_pattern_points,
        _ => 0,
    };

    let momentum = if stats.recent_over >= 2 {
        config.momentum_points
    } else {
        0
    };

    Some(Strength {
        threshold,
        pattern,
        momentum,
    })
}

/// Map window statistics and the current pattern to a signal
pub fn classify(
    stats: &WindowStats,
    pattern: Option<&PatternResult>,
    over_threshold: usize,
    config: &SignalConfig,
) -> Signal {
    match strength(stats, pattern, over_threshold, config) {
        None => Signal::Collecting,
        Some(s) => ladder(s.total(), config),
    }
}

fn ladder(score: u32, config: &SignalConfig) -> Signal {
    if score >= config.strong_at {
        Signal::Strong
    } else if score >= config.good_at {
        Signal::Good
    } else if score >= config.weak_at {
        Signal::Weak
    } else {
        Signal::Wait
    }
}
