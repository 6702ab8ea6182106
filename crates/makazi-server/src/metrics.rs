use axum::http::StatusCode;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::Duration;
use tokio::sync::Mutex;

/// Per-route request counters and latency samples, rendered as plaintext on
/// `/metrics`.
#[derive(Default)]
pub struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
    latency_ns: Mutex<HashMap<String, Vec<u64>>>,
}

impl RequestMetrics {
    pub async fn observe_request(&self, route: &str, status: StatusCode, latency: Duration) {
        let mut counts = self.counts.lock().await;
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        drop(counts);
        let mut latency_map = self.latency_ns.lock().await;
        latency_map
            .entry(route.to_string())
            .or_default()
            .push(latency.as_nanos() as u64);
    }

    pub async fn render(&self) -> String {
        let mut out = String::new();
        let counts = self.counts.lock().await;
        let mut lines: Vec<_> = counts.iter().collect();
        lines.sort_by(|a, b| a.0.cmp(b.0));
        for ((route, status), count) in lines {
            let _ = writeln!(
                out,
                "makazi_requests_total{{route=\"{route}\",status=\"{status}\"}} {count}"
            );
        }
        drop(counts);

        let latency = self.latency_ns.lock().await;
        let mut routes: Vec<_> = latency.iter().collect();
        routes.sort_by(|a, b| a.0.cmp(b.0));
        for (route, samples) in routes {
            let sum: u64 = samples.iter().sum();
            let _ = writeln!(
                out,
                "makazi_request_latency_ns_sum{{route=\"{route}\"}} {sum}"
            );
            let _ = writeln!(
                out,
                "makazi_request_latency_ns_count{{route=\"{route}\"}} {}",
                samples.len()
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counters_accumulate_per_route_and_status() {
        let metrics = RequestMetrics::default();
        metrics
            .observe_request("/api/properties", StatusCode::OK, Duration::from_millis(3))
            .await;
        metrics
            .observe_request("/api/properties", StatusCode::OK, Duration::from_millis(5))
            .await;
        metrics
            .observe_request(
                "/api/properties",
                StatusCode::BAD_REQUEST,
                Duration::from_millis(1),
            )
            .await;

        let rendered = metrics.render().await;
        assert!(rendered
            .contains("makazi_requests_total{route=\"/api/properties\",status=\"200\"} 2"));
        assert!(rendered
            .contains("makazi_requests_total{route=\"/api/properties\",status=\"400\"} 1"));
        assert!(rendered
            .contains("makazi_request_latency_ns_count{route=\"/api/properties\"} 3"));
    }
}
