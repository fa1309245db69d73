use lazy_static::lazy_static;
use prometheus::exponential_buckets;
use prometheus::Encoder;
use prometheus::HistogramOpts;
use prometheus::HistogramVec;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use tracing::warn;


lazy_static! {
    pub static ref LIVE_SESSIONS: IntGauge =
        IntGauge::new("zoolink_live_sessions", "Sessions currently registered for watch dispatch")
            .expect("metric can not be created");

    pub static ref OPERATION_ERRORS: IntCounterVec = IntCounterVec::new(
        Opts::new("zoolink_operation_errors", "Failed session operations by operation and error kind"),
        &["op", "kind"]
    )
    .expect("metric can not be created");

    pub static ref OPERATION_LATENCY_METRIC: HistogramVec = HistogramVec::new(
        HistogramOpts::new("zoolink_operation_latency_ms", "Histogram of session operation latency in ms")
            .buckets(exponential_buckets(0.25, 2.0, 16).expect("buckets can be created")),
        &["op"]
    )
    .expect("metric can not be created");

    pub static ref WATCH_EVENTS_DISPATCHED: IntCounterVec = IntCounterVec::new(
        Opts::new("zoolink_watch_events_dispatched", "Watch notifications handed to a session callback"),
        &["event"]
    )
    .expect("metric can not be created");

    pub static ref WATCH_EVENTS_DROPPED: IntCounterVec = IntCounterVec::new(
        Opts::new("zoolink_watch_events_dropped", "Watch notifications not delivered, by reason"),
        &["reason"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = build_registry();
}

fn build_registry() -> Registry {
    let registry = Registry::new();
    registry
        .register(Box::new(LIVE_SESSIONS.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(OPERATION_ERRORS.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(OPERATION_LATENCY_METRIC.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(WATCH_EVENTS_DISPATCHED.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(WATCH_EVENTS_DROPPED.clone()))
        .expect("collector can be registered");
    registry
}

/// Renders the crate's collectors in the Prometheus text exposition format.
///
/// Serving the result is up to the application.
pub fn gather_metrics() -> String {
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        warn!("could not encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_else(|e| {
        warn!("metrics could not be from_utf8'd: {}", e);
        String::new()
    })
}
