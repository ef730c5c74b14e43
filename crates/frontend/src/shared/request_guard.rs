use std::cell::Cell;

/// Monotonic token source for requests that cannot be cancelled.
///
/// Each request takes a token when it starts; when its response arrives it is
/// applied only if no newer request was issued in the meantime.
#[derive(Debug, Default)]
pub struct RequestGuard {
    latest: Cell<u64>,
}

impl RequestGuard {
    pub const fn new() -> Self {
        Self {
            latest: Cell::new(0),
        }
    }

    /// Issue the token of a new request.
    pub fn issue(&self) -> u64 {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        next
    }

    /// Whether `token` belongs to the most recent request.
    pub fn is_current(&self, token: u64) -> bool {
        token == self.latest.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_increase() {
        let guard = RequestGuard::new();
        let a = guard.issue();
        let b = guard.issue();
        assert!(b > a);
    }

    #[test]
    fn test_only_latest_is_current() {
        let guard = RequestGuard::new();
        let first = guard.issue();
        assert!(guard.is_current(first));
        let second = guard.issue();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }

    #[test]
    fn test_out_of_order_responses() {
        let guard = RequestGuard::new();
        let slow = guard.issue();
        let fast = guard.issue();
        // fast response lands first and is applied, slow one is dropped
        assert!(guard.is_current(fast));
        assert!(!guard.is_current(slow));
    }
}
