/// Monotonic timestamp in milliseconds.
///
/// On the web this is `performance.now()`; natively any monotonic clock works
/// as long as one widget sticks to one source.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Millis(pub f64);

impl Millis {
    pub fn after(self, delay_ms: f64) -> Self {
        Millis(self.0 + delay_ms.max(0.0))
    }

    pub fn elapsed_since(self, earlier: Millis) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    pub fn has_reached(self, deadline: Millis) -> bool {
        self.0 >= deadline.0
    }
}

#[cfg(test)]
mod tests {
    use super::Millis;

    #[test]
    fn deadlines_compare_by_value() {
        let t0 = Millis(100.0);
        let deadline = t0.after(10.0);
        assert!(!Millis(105.0).has_reached(deadline));
        assert!(Millis(110.0).has_reached(deadline));
        assert_eq!(Millis(110.0).elapsed_since(t0), 10.0);
    }

    #[test]
    fn negative_delay_is_clamped() {
        assert_eq!(Millis(5.0).after(-3.0), Millis(5.0));
        assert_eq!(Millis(1.0).elapsed_since(Millis(4.0)), 0.0);
    }
}
