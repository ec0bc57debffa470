//! Pattern detection over the digit window
//!
//! Rules run in a fixed priority order and the first match wins:
//!
//! ```text
//! 1. < 3 digits             -> no prediction
//! 2. consecutive run (+/-1) -> continue the run
//! 3. triple repeat          -> opposite side of 4
//! 4. ABAB in the last four  -> A
//! 5. last five mostly over  -> window min   (mostly under -> window max)
//! 6. a + b == c             -> (b + c) mod 10
//! 7. one dominant digit     -> that digit
//! 8. weighted recency       -> (a + 2b + 3c) / 6 mod 10
//! ```
//!
//! Rule 8 always matches, so any window of three or more digits yields a
//! prediction.

use crate::types::Digit;
use serde::Serialize;
use std::fmt;

/// Minimum window length before any rule is evaluated
pub const MIN_PATTERN_LEN: usize = 3;

const TREND_SPAN: usize = 5;

/// Which rule produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PatternKind {
    Ascending,
    Descending,
    BreakingRepeat,
    Alternating,
    HighTrendReversal,
    LowTrendReversal,
    Additive,
    FrequencyDominance,
    WeightedRecency,
}

impl PatternKind {
    /// Sequence-shaped patterns that boost the signal score
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            PatternKind::Ascending
                | PatternKind::Descending
                | PatternKind::BreakingRepeat
                | PatternKind::Alternating
                | PatternKind::Additive
        )
    }

    pub fn is_frequency(&self) -> bool {
        matches!(self, PatternKind::FrequencyDominance)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            PatternKind::Ascending => "Ascending sequence detected",
            PatternKind::Descending => "Descending sequence detected",
            PatternKind::BreakingRepeat => "Breaking repeating pattern",
            PatternKind::Alternating => "Alternating pattern detected",
            PatternKind::HighTrendReversal => "Strong high trend - expecting reversal",
            PatternKind::LowTrendReversal => "Strong low trend - expecting reversal",
            PatternKind::Additive => "Fibonacci-like sequence detected",
            PatternKind::FrequencyDominance => "Most frequent digit",
            PatternKind::WeightedRecency => "Weighted recent trend analysis",
        }
    }

    /// Fixed confidence shown alongside each rule (frequency is computed)
    fn base_confidence(&self) -> u8 {
        match self {
            PatternKind::Ascending | PatternKind::Descending => 85,
            PatternKind::BreakingRepeat => 75,
            PatternKind::Alternating => 70,
            PatternKind::HighTrendReversal | PatternKind::LowTrendReversal => 65,
            PatternKind::Additive => 60,
            PatternKind::FrequencyDominance => 0,
            PatternKind::WeightedRecency => 45,
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A predicted next digit and the rule behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternResult {
    pub digit: Digit,
    pub kind: PatternKind,
    pub detail: String,
    /// Informational percentage, not used for scoring
    pub confidence: u8,
}

impl PatternResult {
    fn new(digit: u8, kind: PatternKind) -> Self {
        Self {
            digit: Digit::wrapping(digit as u32),
            kind,
            detail: kind.describe().to_string(),
            confidence: kind.base_confidence(),
        }
    }

    pub fn is_structural(&self) -> bool {
        self.kind.is_structural()
    }
}

impl fmt::Display for PatternResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.digit, self.detail)
    }
}

/// Run all rules in priority order over `digits` (oldest first)
pub fn detect(digits: &[Digit]) -> Option<PatternResult> {
    if digits.len() < MIN_PATTERN_LEN {
        return None;
    }

    let seq: Vec<u8> = digits.iter().map(|d| d.value()).collect();

    consecutive_run(&seq)
        .or_else(|| triple_repeat(&seq))
        .or_else(|| alternating(&seq))
        .or_else(|| trend_reversal(&seq))
        .or_else(|| additive(&seq))
        .or_else(|| frequency_dominance(&seq))
        .or_else(|| Some(weighted_recency(&seq)))
}

fn consecutive_run(seq: &[u8]) -> Option<PatternResult> {
    for w in seq.windows(3) {
        let (a, b, c) = (w[0] as i16, w[1] as i16, w[2] as i16);
        if b - a == 1 && c - b == 1 {
            let next = if c < 9 { c + 1 } else { c - 1 };
            return Some(PatternResult::new(next as u8, PatternKind::Ascending));
        }
        if a - b == 1 && b - c == 1 {
            let next = if c > 0 { c - 1 } else { c + 1 };
            return Some(PatternResult::new(next as u8, PatternKind::Descending));
        }
    }
    None
}

fn triple_repeat(seq: &[u8]) -> Option<PatternResult> {
    let last = &seq[seq.len() - 3..];
    if last[0] == last[1] && last[1] == last[2] {
        let d = last[0];
        let next = if d <= 4 { 9 - d } else { d - 5 };
        return Some(PatternResult::new(next, PatternKind::BreakingRepeat));
    }
    None
}

fn alternating(seq: &[u8]) -> Option<PatternResult> {
    let n = seq.len();
    if n >= 4 && seq[n - 4] == seq[n - 2] && seq[n - 3] == seq[n - 1] {
        return Some(PatternResult::new(seq[n - 4], PatternKind::Alternating));
    }
    None
}

fn trend_reversal(seq: &[u8]) -> Option<PatternResult> {
    let tail = &seq[seq.len().saturating_sub(TREND_SPAN)..];
    let high = tail.iter().filter(|d| **d > 4).count();

    if high >= 4 {
        let min = seq.iter().copied().min()?;
        Some(PatternResult::new(min, PatternKind::HighTrendReversal))
    } else if high <= 1 {
        let max = seq.iter().copied().max()?;
        Some(PatternResult::new(max, PatternKind::LowTrendReversal))
    } else {
        None
    }
}

fn additive(seq: &[u8]) -> Option<PatternResult> {
    seq.windows(3)
        .find(|w| w[0] + w[1] == w[2])
        .map(|w| PatternResult::new((w[1] + w[2]) % 10, PatternKind::Additive))
}

fn frequency_dominance(seq: &[u8]) -> Option<PatternResult> {
    let mut counts = [0usize; 10];
    for d in seq {
        counts[*d as usize] += 1;
    }

    // Highest count first; ties keep the lower digit first
    let mut ranked: Vec<(u8, usize)> = counts
        .iter()
        .enumerate()
        .filter(|(_, c)| **c > 0)
        .map(|(d, c)| (d as u8, *c))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let (top_digit, top_count) = *ranked.first()?;
    let runner_up = ranked.get(1).map(|(_, c)| *c).unwrap_or(0);
    if top_count <= runner_up {
        return None;
    }

    let total = seq.len();
    let pct = (top_count as f64 / total as f64 * 100.0).round().min(90.0);
    let mut result = PatternResult::new(top_digit, PatternKind::FrequencyDominance);
    result.detail = format!("Most frequent digit ({top_count}/{total} occurrences)");
    result.confidence = pct as u8;
    Some(result)
}

fn weighted_recency(seq: &[u8]) -> PatternResult {
    let last = &seq[seq.len() - 3..];
    let weighted: u32 = last
        .iter()
        .enumerate()
        .map(|(i, d)| *d as u32 * (i as u32 + 1))
        .sum();
    PatternResult::new(((weighted / 6) % 10) as u8, PatternKind::WeightedRecency)
}
