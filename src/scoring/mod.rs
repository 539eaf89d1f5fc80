// Scoring — the full trust aggregator and the reduced follower scorer.

pub mod follower;
pub mod trust;

/// Character counts of a username used by both scorers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsernameShape {
    pub len: usize,
    pub digits: usize,
    pub underscores: usize,
}

impl UsernameShape {
    pub fn of(username: &str) -> Self {
        Self {
            len: username.chars().count(),
            digits: username.chars().filter(|c| c.is_ascii_digit()).count(),
            underscores: username.chars().filter(|c| *c == '_').count(),
        }
    }

    pub fn digit_ratio(&self) -> f64 {
        if self.len == 0 {
            0.0
        } else {
            self.digits as f64 / self.len as f64
        }
    }
}
