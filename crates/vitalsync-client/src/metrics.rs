//! Metrics collection for the realtime client.
//!
//! Counters and gauges are recorded through the `metrics` facade; the
//! binary decides whether an exporter is installed. Recording without an
//! exporter is a no-op.

use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Metric names used throughout the client.
pub mod names {
    pub const CONNECTS_TOTAL: &str = "vitalsync_connects_total";
    pub const CONNECT_FAILURES_TOTAL: &str = "vitalsync_connect_failures_total";
    pub const CONNECTED: &str = "vitalsync_connected";
    pub const RECONNECTS_SCHEDULED_TOTAL: &str = "vitalsync_reconnects_scheduled_total";
    pub const ACTIVITIES_TOTAL: &str = "vitalsync_activities_total";
    pub const ACTIVITIES_DROPPED_TOTAL: &str = "vitalsync_activities_dropped_total";
    pub const UPDATES_TOTAL: &str = "vitalsync_updates_total";
    pub const UPDATES_UNKNOWN_TOTAL: &str = "vitalsync_updates_unknown_total";
    pub const UPDATES_MALFORMED_TOTAL: &str = "vitalsync_updates_malformed_total";
    pub const PROBES_TOTAL: &str = "vitalsync_probes_total";
    pub const SEND_FAILURES_TOTAL: &str = "vitalsync_send_failures_total";
}

/// Register metric descriptions with the global recorder.
///
/// Call once at startup after installing an exporter.
pub fn init_metrics() {
    describe_counter!(names::CONNECTS_TOTAL, "Sessions successfully established");
    describe_counter!(names::CONNECT_FAILURES_TOTAL, "Dial attempts that failed");
    describe_gauge!(names::CONNECTED, "1 while a session is up, 0 otherwise");
    describe_counter!(
        names::RECONNECTS_SCHEDULED_TOTAL,
        "Reconnect attempts scheduled after a lost session"
    );
    describe_counter!(names::ACTIVITIES_TOTAL, "Activity records sent, by kind");
    describe_counter!(
        names::ACTIVITIES_DROPPED_TOTAL,
        "Activity records dropped because no session was up"
    );
    describe_counter!(names::UPDATES_TOTAL, "Server updates received, by event");
    describe_counter!(
        names::UPDATES_UNKNOWN_TOTAL,
        "Server updates with an unrecognized event name"
    );
    describe_counter!(
        names::UPDATES_MALFORMED_TOTAL,
        "Server updates whose payload failed to decode"
    );
    describe_counter!(names::PROBES_TOTAL, "Liveness probes sent");
    describe_counter!(names::SEND_FAILURES_TOTAL, "Outbound sends that failed");
}

pub fn record_connect() {
    counter!(names::CONNECTS_TOTAL).increment(1);
}

pub fn record_connect_failure() {
    counter!(names::CONNECT_FAILURES_TOTAL).increment(1);
}

pub fn set_connected(connected: bool) {
    gauge!(names::CONNECTED).set(if connected { 1.0 } else { 0.0 });
}

pub fn record_reconnect_scheduled() {
    counter!(names::RECONNECTS_SCHEDULED_TOTAL).increment(1);
}

pub fn record_activity(kind: &str) {
    counter!(names::ACTIVITIES_TOTAL, "kind" => kind.to_string()).increment(1);
}

pub fn record_activity_dropped() {
    counter!(names::ACTIVITIES_DROPPED_TOTAL).increment(1);
}

pub fn record_update(event: &str) {
    counter!(names::UPDATES_TOTAL, "event" => event.to_string()).increment(1);
}

pub fn record_update_unknown() {
    counter!(names::UPDATES_UNKNOWN_TOTAL).increment(1);
}

pub fn record_update_malformed() {
    counter!(names::UPDATES_MALFORMED_TOTAL).increment(1);
}

pub fn record_probe() {
    counter!(names::PROBES_TOTAL).increment(1);
}

pub fn record_send_failure() {
    counter!(names::SEND_FAILURES_TOTAL).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_exporter_is_noop() {
        init_metrics();
        record_connect();
        record_connect_failure();
        set_connected(true);
        set_connected(false);
        record_activity("click");
        record_update("recommendations_update");
        record_probe();
    }
}
