use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Counts {
    in_flight: usize,
    peak: usize,
}

/// Counting admission gate with a fixed number of permits.
///
/// Holding a [`Permit`] means the caller has been admitted; dropping it
/// frees the slot and wakes one waiter.
#[derive(Debug)]
pub struct Limiter {
    capacity: usize,
    counts: Mutex<Counts>,
    freed: Condvar,
}

/// One admitted slot of a [`Limiter`].
#[must_use = "dropping a permit immediately releases the slot"]
#[derive(Debug)]
pub struct Permit<'a> {
    limiter: &'a Limiter,
}

impl Limiter {
    /// Build a limiter with `capacity` permits. Zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            counts: Mutex::new(Counts::default()),
            freed: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Block until a slot is free, then take it.
    pub fn acquire(&self) -> Permit<'_> {
        let mut counts = self.lock();
        while counts.in_flight >= self.capacity {
            counts = self
                .freed
                .wait(counts)
                .unwrap_or_else(PoisonError::into_inner);
        }
        self.admit(&mut counts)
    }

    /// Take a slot if one is free right now.
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        let mut counts = self.lock();
        if counts.in_flight >= self.capacity {
            return None;
        }
        Some(self.admit(&mut counts))
    }

    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Highest number of permits ever held at once
    pub fn peak(&self) -> usize {
        self.lock().peak
    }

    /// Start a new high water mark from the current in-flight count
    pub fn reset_peak(&self) {
        let mut counts = self.lock();
        counts.peak = counts.in_flight;
    }

    fn admit(&self, counts: &mut Counts) -> Permit<'_> {
        counts.in_flight += 1;
        counts.peak = counts.peak.max(counts.in_flight);
        Permit { limiter: self }
    }

    fn finish(&self) {
        let mut counts = self.lock();
        counts.in_flight -= 1;
        drop(counts);
        self.freed.notify_one();
    }

    fn lock(&self) -> MutexGuard<'_, Counts> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Limiter {
    /// One permit per logical CPU
    fn default() -> Self {
        Self::new(crate::default_concurrency())
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.limiter.finish();
    }
}
