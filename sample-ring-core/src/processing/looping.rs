//! Loop replication: a new buffer holding the unread samples of a source
//! repeated end-to-end to a target length.
//!
//! The source is only borrowed. Its unread window is walked through a
//! cycling [`Readable`](super::ring_buffer::Readable), so cursors and
//! occupancy never move.

use crate::models::config::RingConfiguration;
use crate::models::error::RingError;

use super::ring_buffer::RingBuffer;

/// `floor(count * factor)`, or `None` when that length cannot index memory.
/// `factor` must already be finite and non-negative.
fn scaled_len(count: usize, factor: f64) -> Option<usize> {
    let len = (count as f64 * factor).floor();
    if len >= isize::MAX as f64 {
        return None;
    }
    Some(len as usize)
}

impl RingBuffer {
    /// Replicate the unread samples `factor` times into a new, full buffer.
    ///
    /// The result has capacity and occupancy `floor(factor * len())`. Its write
    /// cursor sits on the last filled slot and its read cursor is unset.
    ///
    /// An empty source yields an empty buffer of capacity
    /// `floor(factor * capacity())`. A target length of zero yields an empty
    /// zero-capacity buffer. A NaN, infinite or negative `factor`, or one whose
    /// target length exceeds addressable memory, is rejected with
    /// [`RingError::InvalidFactor`]. Storage that cannot be allocated is
    /// reported as [`RingError::AllocationFailed`].
    pub fn loop_buffer(&self, factor: f64) -> Result<RingBuffer, RingError> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(RingError::InvalidFactor(factor));
        }

        let count = if self.is_empty() { self.capacity() } else { self.len() };
        let new_size = scaled_len(count, factor).ok_or(RingError::InvalidFactor(factor))?;
        let mut looped = RingBuffer::try_new(new_size)?;

        if self.is_empty() {
            log::debug!("looped empty buffer x{}: capacity {}", factor, new_size);
            return Ok(looped);
        }

        for sample in self.readable().cycle().take(new_size) {
            looped.push(sample);
        }

        log::debug!(
            "looped {} samples x{} into {}",
            self.len(),
            factor,
            new_size
        );
        Ok(looped)
    }

    /// [`loop_buffer`](Self::loop_buffer) with the configured loop factor.
    pub fn loop_with(&self, config: &RingConfiguration) -> Result<RingBuffer, RingError> {
        config.validate()?;
        self.loop_buffer(config.loop_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::ring_buffer::Sample;

    /// `[0, 1, .., peak, .., 1, 0]`, written sample by sample into a buffer
    /// of exactly that length.
    fn palindrome_buffer(peak: Sample) -> RingBuffer {
        let mut buf = RingBuffer::new(2 * peak as usize + 1);
        for sample in (0..=peak).chain((0..peak).rev()) {
            buf.write_sample(sample).unwrap();
        }
        buf
    }

    #[test]
    fn empty_source_scales_capacity() {
        let buf = RingBuffer::new(2);

        let looped = buf.loop_buffer(4.0).unwrap();

        assert_eq!(looped.capacity(), 8);
        assert!(looped.is_empty());
    }

    #[test]
    fn partially_read_source_repeats_unread_window() {
        let mut buf = RingBuffer::new(4);
        buf.write_sample(2).unwrap();
        buf.write_sample(3).unwrap();
        buf.read_sample();
        buf.write_sample(4).unwrap();
        // Logical contents: [_, 3, 4, _]

        let looped = buf.loop_buffer(3.0).unwrap();

        assert_eq!(looped.capacity(), 6);
        assert_eq!(looped.len(), 6);
        assert!(looped.is_full());
        assert_eq!(looped.slots(), &[3, 4, 3, 4, 3, 4]);
        assert_eq!(looped.write_cursor(), Some(5));
        assert_eq!(looped.read_cursor(), None);
    }

    #[test]
    fn palindrome_loops_twice_and_source_is_untouched() {
        let palindrome = palindrome_buffer(3);
        assert!(palindrome.is_full());

        let looped = palindrome.loop_buffer(2.0).unwrap();

        assert_eq!(
            looped.to_vec(),
            vec![0, 1, 2, 3, 2, 1, 0, 0, 1, 2, 3, 2, 1, 0]
        );
        assert_eq!(palindrome.read_cursor(), None);
        assert_eq!(palindrome.len(), palindrome.capacity());
        assert_eq!(palindrome.to_vec(), vec![0, 1, 2, 3, 2, 1, 0]);
    }

    #[test]
    fn fractional_factor_truncates() {
        let buf = RingBuffer::from_samples(3, &[1, 2, 3]).unwrap();

        let looped = buf.loop_buffer(1.5).unwrap();

        assert_eq!(looped.capacity(), 4);
        assert_eq!(looped.to_vec(), vec![1, 2, 3, 1]);
    }

    #[test]
    fn shrinking_factor_keeps_prefix() {
        let buf = RingBuffer::from_samples(4, &[5, 6, 7, 8]).unwrap();

        assert_eq!(buf.loop_buffer(0.5).unwrap().to_vec(), vec![5, 6]);
    }

    #[test]
    fn wrapped_window_loops_in_fifo_order() {
        let mut buf = RingBuffer::new(4);
        buf.write_samples(&[1, 2, 3, 4]);
        buf.read_samples(2);
        buf.write_samples(&[5, 6]);
        assert_eq!(buf.slots(), &[5, 6, 3, 4]);

        let looped = buf.loop_buffer(1.5).unwrap();

        assert_eq!(looped.to_vec(), vec![3, 4, 5, 6, 3, 4]);
        assert_eq!(buf.read_cursor(), Some(1));
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn zero_target_size_is_empty() {
        let buf = RingBuffer::from_samples(5, &[1, 2, 3]).unwrap();

        let looped = buf.loop_buffer(0.25).unwrap();
        assert_eq!(looped.capacity(), 0);
        assert!(looped.is_empty());

        let looped = buf.loop_buffer(0.0).unwrap();
        assert_eq!(looped.capacity(), 0);
    }

    #[test]
    fn invalid_factors_are_rejected() {
        let buf = RingBuffer::from_samples(2, &[1, 2]).unwrap();

        assert_eq!(buf.loop_buffer(-1.0).unwrap_err(), RingError::InvalidFactor(-1.0));
        assert!(matches!(
            buf.loop_buffer(f64::INFINITY),
            Err(RingError::InvalidFactor(_))
        ));
        assert!(matches!(
            buf.loop_buffer(f64::NAN),
            Err(RingError::InvalidFactor(_))
        ));
    }

    #[test]
    fn oversized_factors_are_rejected() {
        let buf = RingBuffer::from_samples(2, &[1, 2]).unwrap();

        assert_eq!(buf.loop_buffer(1e30).unwrap_err(), RingError::InvalidFactor(1e30));
        assert!(matches!(
            buf.loop_buffer(f64::MAX),
            Err(RingError::InvalidFactor(_))
        ));
        assert_eq!(buf.to_vec(), vec![1, 2]);

        let empty = RingBuffer::new(3);
        assert!(matches!(
            empty.loop_buffer(1e300),
            Err(RingError::InvalidFactor(_))
        ));
    }

    #[test]
    fn source_reads_identically_after_loop() {
        let mut buf = RingBuffer::new(6);
        buf.write_samples(&[10, 20, 30, 40]);
        buf.read_sample();

        let _ = buf.loop_buffer(2.5).unwrap();

        assert_eq!(buf.read_samples(10), vec![20, 30, 40]);
    }

    #[test]
    fn loop_with_uses_configured_factor() {
        let buf = RingBuffer::from_samples(2, &[7, 9]).unwrap();
        let config = RingConfiguration {
            capacity: 2,
            loop_factor: 3.0,
        };

        assert_eq!(buf.loop_with(&config).unwrap().to_vec(), vec![7, 9, 7, 9, 7, 9]);

        let bad = RingConfiguration {
            loop_factor: f64::NAN,
            ..config
        };
        assert!(buf.loop_with(&bad).is_err());
    }
}
