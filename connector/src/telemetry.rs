use metrics::counter;

pub struct Telemetry;

impl Telemetry {
    pub fn record_method(method: &str) {
        counter!("connector_requests_total", "method" => method.to_string()).increment(1);
    }

    pub fn record_rejected_key() {
        counter!("connector_auth_failures_total").increment(1);
    }

    pub fn record_delivery(success: bool) {
        if success {
            counter!("connector_deliveries_total").increment(1);
        } else {
            counter!("connector_delivery_failures_total").increment(1);
        }
    }
}
