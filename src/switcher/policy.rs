use std::time::Duration;

/// How long to wait for the device's tcpip listener and Wi-Fi address.
///
/// `settle` is always slept in full right after `adb tcpip`. Address
/// discovery is then retried every `poll_interval` until it succeeds or
/// `timeout` has passed. A zero `timeout` means a single attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadinessPolicy {
    pub settle: Duration,
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl ReadinessPolicy {
    pub const DEFAULT_SETTLE: Duration = Duration::from_secs(3);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Sleep once, look once.
    pub fn fixed(settle: Duration) -> Self {
        Self {
            settle,
            poll_interval: Duration::ZERO,
            timeout: Duration::ZERO,
        }
    }

    pub fn polling(settle: Duration, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            settle,
            poll_interval,
            timeout,
        }
    }

    pub fn is_single_attempt(&self) -> bool {
        self.timeout.is_zero()
    }

    /// Whether another attempt fits, given time spent polling so far.
    pub fn should_retry(&self, elapsed: Duration) -> bool {
        !self.is_single_attempt() && elapsed + self.poll_interval <= self.timeout
    }
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self::polling(
            Self::DEFAULT_SETTLE,
            Self::DEFAULT_POLL_INTERVAL,
            Self::DEFAULT_TIMEOUT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_waits_three_seconds_then_polls() {
        let policy = ReadinessPolicy::default();
        assert_eq!(policy.settle, Duration::from_secs(3));
        assert!(!policy.is_single_attempt());
        assert!(policy.should_retry(Duration::ZERO));
        assert!(policy.should_retry(Duration::from_millis(9_500)));
        assert!(!policy.should_retry(Duration::from_millis(9_501)));
    }

    #[test]
    fn fixed_policy_never_retries() {
        let policy = ReadinessPolicy::fixed(Duration::from_secs(3));
        assert!(policy.is_single_attempt());
        assert!(!policy.should_retry(Duration::ZERO));
    }
}
