//! Fixed-capacity rolling mean for velocity smoothing.
//!
//! Samples live in a ring buffer allocated once at construction, so
//! pushing inside the control loop never allocates.

/// Moving average over the most recent `window` samples.
///
/// The running sum is adjusted incrementally on each push and recomputed
/// from the held samples every time the ring wraps, which bounds the
/// floating-point drift of the incremental updates to one window.
#[derive(Debug, Clone)]
pub struct RollingMean {
    samples: Box<[f64]>,
    next: usize,
    len: usize,
    sum: f64,
}

impl RollingMean {
    /// Create an empty accumulator. A window of 0 is treated as 1.
    pub fn new(window: usize) -> Self {
        Self {
            samples: vec![0.0; window.max(1)].into_boxed_slice(),
            next: 0,
            len: 0,
            sum: 0.0,
        }
    }

    /// Maximum number of samples averaged.
    #[inline]
    pub fn window(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples currently held (<= window).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add a sample, evicting the oldest one once the window is full.
    pub fn push(&mut self, value: f64) {
        if self.len == self.samples.len() {
            self.sum -= self.samples[self.next];
        } else {
            self.len += 1;
        }

        self.samples[self.next] = value;
        self.sum += value;
        self.next += 1;

        if self.next == self.samples.len() {
            self.next = 0;
            self.sum = self.samples[..self.len].iter().sum();
        }
    }

    /// Mean of the held samples, 0.0 when empty.
    #[inline]
    pub fn mean(&self) -> f64 {
        if self.len == 0 {
            0.0
        } else {
            self.sum / self.len as f64
        }
    }

    /// Drop all samples, keeping the window size.
    pub fn clear(&mut self) {
        self.next = 0;
        self.len = 0;
        self.sum = 0.0;
    }
}
