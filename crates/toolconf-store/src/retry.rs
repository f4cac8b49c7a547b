//! How many times a conflicting batch is attempted.
//!
//! The store's contract is to keep retrying until a write goes through, so
//! [`Unbounded`] is the default. Under sustained contention that loop never
//! ends; callers that cannot tolerate this (and test harnesses) install a
//! [`Bounded`] policy instead. The policy only decides *whether* to retry;
//! conflict detection is the same either way.

/// Decides whether a batch is attempted again after a conflict.
pub trait RetryPolicy: Send + Sync {
    /// Called after the `conflicts`-th conflicting attempt (starting at 1).
    fn retry_after(&self, conflicts: u32) -> bool;
}

impl<P: RetryPolicy + ?Sized> RetryPolicy for Box<P> {
    fn retry_after(&self, conflicts: u32) -> bool {
        (**self).retry_after(conflicts)
    }
}

/// Retry forever.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unbounded;

impl RetryPolicy for Unbounded {
    fn retry_after(&self, _conflicts: u32) -> bool {
        true
    }
}

/// Make at most `max_attempts` attempts in total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounded {
    pub max_attempts: u32,
}

impl Bounded {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }
}

impl RetryPolicy for Bounded {
    fn retry_after(&self, conflicts: u32) -> bool {
        conflicts < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_always_retries() {
        assert!(Unbounded.retry_after(1));
        assert!(Unbounded.retry_after(u32::MAX));
    }

    #[test]
    fn bounded_counts_total_attempts() {
        let policy = Bounded::new(3);
        assert!(policy.retry_after(1));
        assert!(policy.retry_after(2));
        assert!(!policy.retry_after(3));

        assert!(!Bounded::new(1).retry_after(1));
    }

    #[test]
    fn boxed_policy_delegates() {
        let policy: Box<dyn RetryPolicy> = Box::new(Bounded::new(2));
        assert!(policy.retry_after(1));
        assert!(!policy.retry_after(2));
    }
}
