/// Intermediate values of one point's trip from the source frame to the
/// target frame. Pixel positions are `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointTrace {
    /// Position of the point in the input batch
    pub index: usize,
    pub input: [f64; 2],
    /// Position inside the source domain, y inverted, in `[0, 1]`
    pub source_normalized: [f64; 2],
    /// Pixel position inside the unrotated source frame
    pub source_local: [f64; 2],
    /// Pixel position inside the source frame after its rotation
    pub source_rotated: [f64; 2],
    pub canvas: [f64; 2],
    /// Canvas position relative to the target frame's top-left corner
    pub target_relative: [f64; 2],
    /// Pixel position inside the unrotated target frame
    pub target_local: [f64; 2],
    pub target_normalized: [f64; 2],
    /// Target domain value before clamping
    pub unclamped: [f64; 2],
    pub output: [f64; 2],
}

/// Receives a trace for every point that is transformed.
///
/// Observers only see values; they cannot change the result of a transform.
pub trait TransformObserver {
    fn observe(&self, trace: &PointTrace);
}

/// Observer that discards every trace
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TransformObserver for NoopObserver {
    fn observe(&self, _trace: &PointTrace) {}
}

/// Writes the traces of the first `limit` points of a batch to the `log` facade
/// at trace level
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    pub limit: usize,
}

impl LogObserver {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self { limit: 5 }
    }
}

impl TransformObserver for LogObserver {
    fn observe(&self, trace: &PointTrace) {
        if trace.index < self.limit {
            log::trace!("transform trace {trace:?}");
        }
    }
}

impl<F> TransformObserver for F
where
    F: Fn(&PointTrace),
{
    fn observe(&self, trace: &PointTrace) {
        self(trace)
    }
}
