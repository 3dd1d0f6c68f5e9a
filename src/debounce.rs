use std::time::{Duration, Instant};

/// Holds back search-as-you-type input until it stops changing.
///
/// Every `push` restarts the delay. `poll` hands the text out once, after the
/// delay has elapsed with no newer input.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now + self.delay));
    }

    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let settled = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if settled {
            self.pending.take().map(|(text, _)| text)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn fires_after_delay() {
        let mut debouncer = Debouncer::new(DELAY);
        let start = Instant::now();
        debouncer.push("app", start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(100)), None);
        assert_eq!(debouncer.poll(start + DELAY), Some("app".to_string()));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn fires_only_once() {
        let mut debouncer = Debouncer::new(DELAY);
        let start = Instant::now();
        debouncer.push("apple", start);

        assert!(debouncer.poll(start + DELAY).is_some());
        assert_eq!(debouncer.poll(start + DELAY * 2), None);
    }

    #[test]
    fn new_keystroke_restarts_timer() {
        let mut debouncer = Debouncer::new(DELAY);
        let start = Instant::now();
        debouncer.push("ap", start);
        debouncer.push("app", start + Duration::from_millis(200));

        assert_eq!(debouncer.poll(start + DELAY), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(500)),
            Some("app".to_string())
        );
    }

    #[test]
    fn cancel_drops_pending_input() {
        let mut debouncer = Debouncer::new(DELAY);
        let start = Instant::now();
        debouncer.push("apple", start);
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + DELAY), None);
    }
}
