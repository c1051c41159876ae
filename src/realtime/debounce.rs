use std::time::Duration;

/// Default coalescing window for pushed comment changes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, PartialEq, Eq)]
enum State {
    Idle,
    /// A flush timer is armed; `coalesced` counts changes folded into it.
    Pending { coalesced: u32 },
}

/// Trailing-edge debouncer: the first change after idle arms one timer,
/// further changes inside the window coalesce into the same flush.
///
/// The state machine is pure; the caller owns the actual timer and calls
/// `flush` when it fires.
#[derive(Debug)]
pub struct Debouncer {
    interval: Duration,
    state: State,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Debouncer {
            interval,
            state: State::Idle,
        }
    }

    /// Record a change. Returns `Some(interval)` when the caller must arm
    /// a flush timer, `None` when one is already pending.
    pub fn note_change(&mut self) -> Option<Duration> {
        match self.state {
            State::Idle => {
                self.state = State::Pending { coalesced: 1 };
                Some(self.interval)
            }
            State::Pending { ref mut coalesced } => {
                *coalesced += 1;
                None
            }
        }
    }

    /// The timer fired: reset to idle and report how many changes were
    /// coalesced into this flush (0 means a stale timer, nothing to do).
    pub fn flush(&mut self) -> u32 {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => 0,
            State::Pending { coalesced } => coalesced,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_change_arms_timer() {
        let mut d = Debouncer::new(DEFAULT_DEBOUNCE);
        assert_eq!(d.note_change(), Some(DEFAULT_DEBOUNCE));
        assert!(d.is_pending());
    }

    #[test]
    fn burst_coalesces_into_one_flush() {
        let mut d = Debouncer::new(DEFAULT_DEBOUNCE);
        assert!(d.note_change().is_some());
        for _ in 0..9 {
            assert_eq!(d.note_change(), None);
        }
        assert_eq!(d.flush(), 10);
        assert!(!d.is_pending());
    }

    #[test]
    fn change_after_flush_arms_a_new_window() {
        let mut d = Debouncer::new(DEFAULT_DEBOUNCE);
        d.note_change();
        d.flush();
        assert_eq!(d.note_change(), Some(DEFAULT_DEBOUNCE));
        assert_eq!(d.flush(), 1);
    }

    #[test]
    fn stale_flush_is_a_no_op() {
        let mut d = Debouncer::new(DEFAULT_DEBOUNCE);
        assert_eq!(d.flush(), 0);
        assert!(!d.is_pending());
    }
}
