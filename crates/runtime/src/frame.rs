use foundation::Millis;

/// Per-frame clock reading handed to the render loop.
///
/// The host supplies timestamps (requestAnimationFrame on the web, a counter in
/// the CLI); the loop itself never reads a clock.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    pub time: Millis,
    /// Milliseconds since the previous frame (0 for the first).
    pub dt_ms: f64,
}

impl Frame {
    pub fn first(time: Millis) -> Self {
        Self {
            index: 0,
            time,
            dt_ms: 0.0,
        }
    }

    pub fn next(self, time: Millis) -> Self {
        Self {
            index: self.index + 1,
            time,
            dt_ms: time.elapsed_since(self.time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::Millis;

    #[test]
    fn next_advances_index_and_delta() {
        let f0 = Frame::first(Millis(100.0));
        let f1 = f0.next(Millis(116.5));
        assert_eq!(f1.index, 1);
        assert_eq!(f1.dt_ms, 16.5);
        assert_eq!(f1.time, Millis(116.5));
    }

    #[test]
    fn clock_going_backwards_gives_zero_delta() {
        let f = Frame::first(Millis(50.0)).next(Millis(40.0));
        assert_eq!(f.dt_ms, 0.0);
    }
}
