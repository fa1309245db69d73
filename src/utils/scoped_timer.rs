use std::time::Instant;

use tracing::trace;

use crate::metrics::OPERATION_LATENCY_METRIC;

/// Records how long one session operation took, when dropped
pub(crate) struct OpTimer {
    start: Instant,
    op: &'static str,
}

impl OpTimer {
    pub(crate) fn new(op: &'static str) -> Self {
        Self {
            start: Instant::now(),
            op,
        }
    }
}

impl Drop for OpTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        OPERATION_LATENCY_METRIC.with_label_values(&[self.op]).observe(elapsed_ms);
        trace!(target: "timing", "[TIMING] {} took {:.3} ms", self.op, elapsed_ms);
    }
}
