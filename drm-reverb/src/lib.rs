mod comb;

use std::collections::VecDeque;

use drm_common::BlockStatus;

pub use comb::ReverbEngine;

/// FIFO delay length per channel, in samples at the output rate. Also
/// bounds the longest `Old` extension window the concealment can draw
/// from.
pub const MAX_FRAME_SIZE: usize = 13840;

struct ChannelState {
    old: Vec<f64>,
    fifo: VecDeque<f64>,
    reverb: ReverbEngine,
    periodic_index: usize,
    periodic_dir: i32,
}

impl ChannelState {
    fn new(sample_rate: f64, reverb_enabled: bool) -> Self {
        ChannelState {
            old: Vec::new(),
            fifo: VecDeque::from(vec![0.0; MAX_FRAME_SIZE]),
            reverb: ReverbEngine::new(sample_rate, reverb_enabled),
            periodic_index: 0,
            periodic_dir: 1,
        }
    }

    /// Reads the next sample of `old`, reflecting the read index at
    /// both ends rather than wrapping — the corrected reading of the
    /// source's index-update bug.
    fn periodic_extend(&mut self) -> f64 {
        if self.old.is_empty() {
            return 0.0;
        }
        let value = self.old[self.periodic_index];
        if self.old.len() > 1 {
            if self.periodic_index == self.old.len() - 1 {
                self.periodic_dir = -1;
            } else if self.periodic_index == 0 {
                self.periodic_dir = 1;
            }
            self.periodic_index = (self.periodic_index as i64 + self.periodic_dir as i64) as usize;
        }
        value
    }
}

/// Dropout-concealment state machine over a stereo pair. Bad blocks are
/// papered over with a cross-faded reverb tail and periodic extension
/// of the last good block; every output sample passes through a
/// fixed `MAX_FRAME_SIZE`-sample delay line shared by both channels so
/// the crossfade always has the full block to work with.
pub struct Reverb {
    was_ok: bool,
    channels: [ChannelState; 2],
}

impl Reverb {
    pub fn new(sample_rate: f64, reverb_enabled: bool) -> Self {
        Reverb {
            was_ok: true,
            channels: [
                ChannelState::new(sample_rate, reverb_enabled),
                ChannelState::new(sample_rate, reverb_enabled),
            ],
        }
    }

    pub fn set_reverb_enabled(&mut self, enabled: bool) {
        for ch in &mut self.channels {
            ch.reverb.set_enabled(enabled);
        }
    }

    /// Conceals (or passes through) one stereo block in place, and
    /// returns the status to surface for this tick.
    pub fn apply(&mut self, left: &mut [f64], right: &mut [f64], block_ok: bool) -> BlockStatus {
        let prev_was_ok = self.was_ok;
        Self::process_channel(&mut self.channels[0], left, prev_was_ok, block_ok);
        Self::process_channel(&mut self.channels[1], right, prev_was_ok, block_ok);
        self.was_ok = block_ok;

        match (prev_was_ok, block_ok) {
            (true, true) | (false, true) => BlockStatus::RxOk,
            (true, false) => BlockStatus::DataError,
            (false, false) => BlockStatus::CrcError,
        }
    }

    fn process_channel(ch: &mut ChannelState, cur: &mut [f64], prev_was_ok: bool, block_ok: bool) {
        let n = cur.len();
        let mut work = cur.to_vec();

        match (prev_was_ok, block_ok) {
            (true, true) => {
                // Work = Cur, unchanged.
            }
            (false, true) => {
                for i in 0..n {
                    let fade_in = linear_ramp(i, n);
                    let rev_out = ch.reverb.process(work[i] * (1.0 - fade_in));
                    work[i] = cur[i] * fade_in + rev_out * (1.0 - fade_in);
                }
            }
            (true, false) => {
                for i in 0..n {
                    let fade_out = 1.0 - linear_ramp(i, n);
                    let extension = ch.periodic_extend();
                    let rev_out = ch.reverb.process(work[i] * (1.0 - fade_out));
                    work[i] = extension * fade_out + rev_out * (1.0 - fade_out);
                }
            }
            (false, false) => {
                for sample in work.iter_mut() {
                    *sample = ch.reverb.process(*sample);
                }
            }
        }

        if block_ok {
            ch.old = cur.to_vec();
        }

        for i in 0..n {
            let delayed = ch.fifo.pop_front().unwrap_or(0.0);
            ch.fifo.push_back(work[i]);
            cur[i] = delayed;
        }

        if !block_ok {
            ch.old = cur.to_vec();
        }
    }
}

/// Linear ramp from `0.0` (at `i == 0`) to `1.0` (at `i == n - 1`).
fn linear_ramp(i: usize, n: usize) -> f64 {
    if n <= 1 {
        1.0
    } else {
        i as f64 / (n - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_fifo(reverb: &mut Reverb, block_len: usize) {
        // Push enough all-ok blocks to flush the FIFO delay so the
        // "current" block we're testing reaches the output.
        let rounds = MAX_FRAME_SIZE / block_len + 2;
        for _ in 0..rounds {
            let mut l = vec![0.0; block_len];
            let mut r = vec![0.0; block_len];
            reverb.apply(&mut l, &mut r, true);
        }
    }

    #[test]
    fn sustained_good_blocks_pass_through_after_fifo_fill() {
        let mut reverb = Reverb::new(48_000.0, true);
        let input = vec![0.25f64; 480];
        // Fill the FIFO with the same constant block long enough that
        // the delay line's output catches up to the steady-state value.
        let rounds = MAX_FRAME_SIZE / 480 + 2;
        let mut status = BlockStatus::NotPresent;
        let mut l = Vec::new();
        let mut r = Vec::new();
        for _ in 0..rounds {
            l = input.clone();
            r = input.clone();
            status = reverb.apply(&mut l, &mut r, true);
        }
        assert_eq!(status, BlockStatus::RxOk);
        assert_eq!(l, input);
        assert_eq!(r, input);
    }

    #[test]
    fn good_to_bad_transition_reports_data_error() {
        let mut reverb = Reverb::new(48_000.0, true);
        drain_fifo(&mut reverb, 480);

        let mut l = vec![0.5f64; 480];
        let mut r = vec![0.5f64; 480];
        reverb.apply(&mut l, &mut r, true);

        let mut l2 = vec![0.0f64; 480];
        let mut r2 = vec![0.0f64; 480];
        let status = reverb.apply(&mut l2, &mut r2, false);
        assert_eq!(status, BlockStatus::DataError);
    }

    #[test]
    fn sustained_bad_blocks_report_crc_error_and_stay_finite() {
        let mut reverb = Reverb::new(48_000.0, true);
        drain_fifo(&mut reverb, 480);

        let mut l = vec![0.0f64; 480];
        let mut r = vec![0.0f64; 480];
        reverb.apply(&mut l, &mut r, false);

        for _ in 0..20 {
            let mut l = vec![0.0f64; 480];
            let mut r = vec![0.0f64; 480];
            let status = reverb.apply(&mut l, &mut r, false);
            assert_eq!(status, BlockStatus::CrcError);
            assert!(l.iter().all(|s| s.is_finite()));
        }
    }

    #[test]
    fn bad_to_good_transition_reports_rx_ok() {
        let mut reverb = Reverb::new(48_000.0, true);
        drain_fifo(&mut reverb, 480);

        let mut l = vec![0.0f64; 480];
        let mut r = vec![0.0f64; 480];
        reverb.apply(&mut l, &mut r, false);

        let mut l2 = vec![0.3f64; 480];
        let mut r2 = vec![0.3f64; 480];
        let status = reverb.apply(&mut l2, &mut r2, true);
        assert_eq!(status, BlockStatus::RxOk);
    }

    #[test]
    fn good_bad_good_sequence_has_no_discontinuous_jump_at_block_edges() {
        let mut reverb = Reverb::new(48_000.0, true);
        drain_fifo(&mut reverb, 480);

        let steady = vec![0.4f64; 480];
        let mut prev_last = *steady.last().unwrap();
        let mut max_edge_jump: f64 = 0.0;

        let mut run_block = |reverb: &mut Reverb, input: &[f64], ok: bool, prev_last: &mut f64| {
            let mut l = input.to_vec();
            let mut r = input.to_vec();
            reverb.apply(&mut l, &mut r, ok);
            let jump = (l[0] - *prev_last).abs();
            max_edge_jump = max_edge_jump.max(jump);
            *prev_last = *l.last().unwrap();
        };

        run_block(&mut reverb, &steady, true, &mut prev_last);
        run_block(&mut reverb, &vec![0.0; 480], false, &mut prev_last);
        run_block(&mut reverb, &vec![0.0; 480], false, &mut prev_last);
        run_block(&mut reverb, &steady, true, &mut prev_last);
        run_block(&mut reverb, &steady, true, &mut prev_last);

        // The crossfade is designed to avoid a hard step between
        // consecutive output samples at block boundaries; bound the
        // largest observed edge-to-edge delta well under a full-scale
        // swing between the two distinct block levels used here (0.4).
        assert!(
            max_edge_jump < 0.4,
            "edge jump {max_edge_jump} indicates an audible click"
        );
    }
}
