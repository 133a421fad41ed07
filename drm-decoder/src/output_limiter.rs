/// Tracks `iDynamicMaxOutputBlockSize` (spec §4.4): starts at zero so a
/// cold pipeline never emits garbage before its first good frame, jumps
/// to the configured maximum on a good frame, halves on a bad frame
/// immediately following a good one, and collapses to zero on a second
/// consecutive bad frame. This keeps a sustained outage from handing the
/// downstream sink a steady stream of concealment-only samples.
pub struct OutputLimiter {
    max_output_block_size: usize,
    current: usize,
    prev_ok: bool,
}

impl OutputLimiter {
    pub fn new(max_output_block_size: usize) -> Self {
        OutputLimiter {
            max_output_block_size,
            current: 0,
            prev_ok: true,
        }
    }

    /// Feeds this tick's block status and returns the sample budget for
    /// the block about to be written.
    pub fn update(&mut self, ok: bool) -> usize {
        self.current = if ok {
            self.max_output_block_size
        } else if self.prev_ok {
            self.current / 2
        } else {
            0
        };
        self.prev_ok = ok;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_start_produces_zero_budget_until_first_good_frame() {
        let mut limiter = OutputLimiter::new(4096);
        assert_eq!(limiter.update(false), 0);
    }

    #[test]
    fn good_frame_jumps_to_max() {
        let mut limiter = OutputLimiter::new(4096);
        assert_eq!(limiter.update(true), 4096);
    }

    #[test]
    fn bad_after_good_halves_then_drops_to_zero_on_second_bad() {
        let mut limiter = OutputLimiter::new(4096);
        assert_eq!(limiter.update(true), 4096);
        assert_eq!(limiter.update(false), 2048);
        assert_eq!(limiter.update(false), 0);
        assert_eq!(limiter.update(false), 0);
    }

    #[test]
    fn recovers_to_max_immediately_after_outage() {
        let mut limiter = OutputLimiter::new(4096);
        limiter.update(true);
        limiter.update(false);
        limiter.update(false);
        assert_eq!(limiter.update(true), 4096);
    }
}
