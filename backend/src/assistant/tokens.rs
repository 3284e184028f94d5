//! Token usage estimation and per-session budget tracking
//!
//! The Gemini endpoint bills by token, so each session keeps a running
//! estimate of what it has consumed. The estimate is the same heuristic the
//! rest of the platform uses: roughly one token per four characters. It only
//! needs to be accurate enough to recommend a history reset, not to bill.

/// Approximate characters per token
const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of a piece of text (~4 characters per token)
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() / CHARS_PER_TOKEN) as u64
}

/// Running token total for one chat session
///
/// The total is monotonically non-decreasing: it grows on every recorded
/// exchange and only returns to zero on an explicit [`TokenMonitor::reset`].
#[derive(Debug, Clone)]
pub struct TokenMonitor {
    used: u64,
    budget: u64,
}

impl TokenMonitor {
    /// Create a monitor with the given session budget
    pub fn new(budget: u64) -> Self {
        Self { used: 0, budget }
    }

    /// Record the estimated cost of a piece of text, returning the new total
    pub fn record(&mut self, text: &str) -> u64 {
        self.used += estimate_tokens(text);
        self.used
    }

    /// Total estimated tokens consumed so far
    pub fn total(&self) -> u64 {
        self.used
    }

    /// The configured budget
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Whether the running total has crossed the budget
    pub fn over_budget(&self) -> bool {
        self.used > self.budget
    }

    /// Reset the total to zero (used when the session history is cleared)
    pub fn reset(&mut self) {
        self.used = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcdefg"), 1);
        assert_eq!(estimate_tokens("a".repeat(400).as_str()), 100);
    }

    #[test]
    fn test_record_accumulates() {
        let mut monitor = TokenMonitor::new(2000);
        assert_eq!(monitor.total(), 0);
        monitor.record(&"x".repeat(40));
        assert_eq!(monitor.total(), 10);
        monitor.record(&"x".repeat(80));
        assert_eq!(monitor.total(), 30);
    }

    #[test]
    fn test_total_never_decreases_across_exchanges() {
        let mut monitor = TokenMonitor::new(2000);
        let mut last = 0;
        for text in ["hello there", "", "a longer exchange with more words in it"] {
            let total = monitor.record(text);
            assert!(total >= last);
            last = total;
        }
    }

    #[test]
    fn test_over_budget_signal() {
        let mut monitor = TokenMonitor::new(10);
        monitor.record(&"x".repeat(40)); // 10 tokens, at the limit
        assert!(!monitor.over_budget());
        monitor.record("abcd"); // 1 more pushes it over
        assert!(monitor.over_budget());
    }

    #[test]
    fn test_reset_returns_to_zero() {
        let mut monitor = TokenMonitor::new(10);
        monitor.record(&"x".repeat(100));
        assert!(monitor.over_budget());
        monitor.reset();
        assert_eq!(monitor.total(), 0);
        assert!(!monitor.over_budget());
    }
}
