//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! JWT statistics

use chrono::{DateTime, Utc};
use serde::Serialize;

/// JWT statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct JwtStats {
    pub tokens_generated: u64,
    pub tokens_validated: u64,
    pub tokens_blacklisted: u64,
    pub validation_failures: u64,
    pub last_token_generated: Option<DateTime<Utc>>,
    pub last_token_validated: Option<DateTime<Utc>>,
}

impl JwtStats {
    pub fn increment_tokens_generated(&mut self) {
        self.tokens_generated += 1;
        self.last_token_generated = Some(Utc::now());
    }

    pub fn increment_tokens_validated(&mut self) {
        self.tokens_validated += 1;
        self.last_token_validated = Some(Utc::now());
    }

    pub fn increment_tokens_blacklisted(&mut self) {
        self.tokens_blacklisted += 1;
    }

    pub fn increment_validation_failures(&mut self) {
        self.validation_failures += 1;
    }

    /// Fraction of validations that succeeded
    pub fn validation_success_rate(&self) -> f64 {
        let total = self.tokens_validated + self.validation_failures;
        if total == 0 {
            0.0
        } else {
            self.tokens_validated as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_success_rate() {
        let mut stats = JwtStats::default();
        assert_eq!(stats.validation_success_rate(), 0.0);

        stats.increment_tokens_validated();
        stats.increment_tokens_validated();
        stats.increment_validation_failures();
        assert_eq!(stats.validation_success_rate(), 2.0 / 3.0);
        assert!(stats.last_token_validated.is_some());
    }
}
