use std::iter::FusedIterator;

use crate::models::config::RingConfiguration;
use crate::models::error::RingError;

/// A single sample. Every value is valid data; "no data" is `None`.
pub type Sample = u8;

/// Fixed-capacity circular buffer of samples.
///
/// Cursors hold the index of the most recently written/read slot and start
/// unset. Each write or read advances its cursor one slot modulo `capacity`
/// before touching storage. Writes never overwrite unread samples: a full
/// buffer rejects them.
///
/// Single owner, no internal locking. For cross-thread access wrap in a
/// `Mutex<RingBuffer>`.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    storage: Vec<Sample>,
    capacity: usize,
    write_cursor: Option<usize>,
    read_cursor: Option<usize>,
    occupancy: usize,
}

/// Slot following `cursor`, wrapping at `capacity`. An unset cursor yields 0.
fn next_index(cursor: Option<usize>, capacity: usize) -> usize {
    cursor.map_or(0, |c| (c + 1) % capacity)
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: vec![0; capacity],
            capacity,
            write_cursor: None,
            read_cursor: None,
            occupancy: 0,
        }
    }

    /// Like [`new`](Self::new), but reports a storage allocation that cannot
    /// be satisfied instead of aborting.
    pub fn try_new(capacity: usize) -> Result<Self, RingError> {
        let mut buffer = Self::new(0);
        buffer.grow_storage(capacity)?;
        buffer.capacity = capacity;
        Ok(buffer)
    }

    pub fn with_configuration(config: &RingConfiguration) -> Self {
        Self::new(config.capacity)
    }

    /// Build a buffer already holding `samples` as unread data.
    ///
    /// Samples occupy slots `0..samples.len()`, the write cursor rests on the
    /// last of them and the read cursor is unset, exactly as if each sample
    /// had been written into a fresh buffer.
    pub fn from_samples(capacity: usize, samples: &[Sample]) -> Result<Self, RingError> {
        if samples.len() > capacity {
            return Err(RingError::SeedOverflow {
                len: samples.len(),
                capacity,
            });
        }

        let mut buffer = Self::new(capacity);
        buffer.storage[..samples.len()].copy_from_slice(samples);
        buffer.write_cursor = samples.len().checked_sub(1);
        buffer.occupancy = samples.len();
        Ok(buffer)
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy == 0
    }

    pub fn is_full(&self) -> bool {
        self.occupancy == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of unread samples.
    pub fn len(&self) -> usize {
        self.occupancy
    }

    /// Number of writes the buffer accepts before it is full.
    pub fn free(&self) -> usize {
        self.capacity - self.occupancy
    }

    pub fn read_cursor(&self) -> Option<usize> {
        self.read_cursor
    }

    pub fn write_cursor(&self) -> Option<usize> {
        self.write_cursor
    }

    /// Storage slots `0..capacity` in physical order, read or not.
    pub fn slots(&self) -> &[Sample] {
        &self.storage[..self.capacity]
    }

    /// Append one sample.
    ///
    /// Fails with [`RingError::Full`] and leaves the buffer untouched when
    /// every slot holds unread data.
    pub fn write_sample(&mut self, sample: Sample) -> Result<(), RingError> {
        if self.is_full() {
            log::trace!("rejected write of {} into full buffer", sample);
            return Err(RingError::Full {
                capacity: self.capacity,
            });
        }
        self.push(sample);
        Ok(())
    }

    /// Write as many of `samples` as fit, in order. Returns the count accepted.
    pub fn write_samples(&mut self, samples: &[Sample]) -> usize {
        let accepted = samples.len().min(self.free());
        for &sample in &samples[..accepted] {
            self.push(sample);
        }
        if accepted < samples.len() {
            log::trace!("dropped {} samples on full buffer", samples.len() - accepted);
        }
        accepted
    }

    /// Caller guarantees the buffer is not full.
    pub(crate) fn push(&mut self, sample: Sample) {
        let index = next_index(self.write_cursor, self.capacity);
        self.storage[index] = sample;
        self.write_cursor = Some(index);
        self.occupancy += 1;
    }

    /// Take the oldest unread sample, or `None` if there is none.
    pub fn read_sample(&mut self) -> Option<Sample> {
        if self.is_empty() {
            return None;
        }
        let index = next_index(self.read_cursor, self.capacity);
        self.read_cursor = Some(index);
        self.occupancy -= 1;
        Some(self.storage[index])
    }

    /// Read up to `count` unread samples in FIFO order, stopping early once
    /// the buffer drains.
    pub fn read_samples(&mut self, count: usize) -> Vec<Sample> {
        let to_read = count.min(self.occupancy);
        let mut result = Vec::with_capacity(to_read);
        while result.len() < to_read {
            match self.read_sample() {
                Some(sample) => result.push(sample),
                None => break,
            }
        }
        result
    }

    /// Change the wraparound modulus.
    ///
    /// Stored values, cursors and occupancy stay where they are. Growing
    /// extends storage with zeroed slots and fails only if that allocation
    /// fails. Shrinking is refused when a set cursor or any slot of the unread
    /// window would fall outside the new bound, which includes every window
    /// that wraps past the old end. Growing a buffer whose next read would
    /// wrap reorders its unread window; grow while empty or unwrapped.
    pub fn set_capacity(&mut self, new_capacity: usize) -> Result<(), RingError> {
        let stale_cursor = [self.write_cursor, self.read_cursor]
            .into_iter()
            .flatten()
            .find(|&cursor| cursor >= new_capacity);
        let window_end = next_index(self.read_cursor, self.capacity) + self.occupancy;
        let window_cut = new_capacity < self.capacity && self.occupancy > 0 && window_end > new_capacity;

        if new_capacity < self.occupancy || stale_cursor.is_some() || window_cut {
            log::warn!(
                "refused capacity change {} -> {} ({} unread ending at slot {}, cursor {:?})",
                self.capacity,
                new_capacity,
                self.occupancy,
                window_end,
                stale_cursor
            );
            return Err(RingError::CapacityTooSmall {
                requested: new_capacity,
                occupancy: self.occupancy,
                cursor: stale_cursor,
            });
        }

        self.grow_storage(new_capacity)?;
        log::debug!("ring capacity {} -> {}", self.capacity, new_capacity);
        self.capacity = new_capacity;
        Ok(())
    }

    /// Ensure storage holds at least `len` slots. Never shrinks.
    fn grow_storage(&mut self, len: usize) -> Result<(), RingError> {
        let additional = len.saturating_sub(self.storage.len());
        if additional == 0 {
            return Ok(());
        }
        self.storage
            .try_reserve_exact(additional)
            .map_err(|_| RingError::AllocationFailed { capacity: len })?;
        self.storage.resize(len, 0);
        Ok(())
    }

    /// Forget all unread samples and unset both cursors.
    pub fn reset(&mut self) {
        self.write_cursor = None;
        self.read_cursor = None;
        self.occupancy = 0;
    }

    /// Unread samples, oldest first, without consuming them.
    ///
    /// The iterator is `Clone`, so the same window can be walked any number
    /// of times.
    pub fn readable(&self) -> Readable<'_> {
        Readable {
            slots: self.slots(),
            next: next_index(self.read_cursor, self.capacity),
            remaining: self.occupancy,
        }
    }

    /// Unread samples collected, oldest first.
    pub fn to_vec(&self) -> Vec<Sample> {
        self.readable().collect()
    }
}

/// Borrowing iterator over a buffer's unread window. See [`RingBuffer::readable`].
#[derive(Debug, Clone)]
pub struct Readable<'a> {
    slots: &'a [Sample],
    next: usize,
    remaining: usize,
}

impl Iterator for Readable<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.remaining == 0 {
            return None;
        }
        let sample = self.slots[self.next];
        self.next = (self.next + 1) % self.slots.len();
        self.remaining -= 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Readable<'_> {}

impl FusedIterator for Readable<'_> {}
