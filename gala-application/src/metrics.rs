use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    events_created: AtomicU64,
    tasks_written: AtomicU64,
    task_moves: AtomicU64,
    attendees_joined: AtomicU64,
    tickets_sold: AtomicU64,
    tickets_redeemed: AtomicU64,
    ai_requests: AtomicU64,
    ai_errors: AtomicU64,
    balloons_spent: AtomicU64,
    activity_errors: AtomicU64,
}

impl Metrics {
    pub fn record_event_created(&self) {
        self.events_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_tasks_written(&self, count: usize) {
        self.tasks_written.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_task_move(&self) {
        self.task_moves.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_attendee_joined(&self) {
        self.attendees_joined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ticket_sold(&self) {
        self.tickets_sold.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ticket_redeemed(&self) {
        self.tickets_redeemed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ai_request(&self, cost: u64) {
        self.ai_requests.fetch_add(1, Ordering::Relaxed);
        self.balloons_spent.fetch_add(cost, Ordering::Relaxed);
    }

    pub fn record_ai_error(&self) {
        self.ai_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_activity_error(&self) {
        self.activity_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let counters = [
            ("gala_events_created_total", &self.events_created),
            ("gala_tasks_written_total", &self.tasks_written),
            ("gala_task_moves_total", &self.task_moves),
            ("gala_attendees_joined_total", &self.attendees_joined),
            ("gala_tickets_sold_total", &self.tickets_sold),
            ("gala_tickets_redeemed_total", &self.tickets_redeemed),
            ("gala_ai_requests_total", &self.ai_requests),
            ("gala_ai_errors_total", &self.ai_errors),
            ("gala_balloons_spent_total", &self.balloons_spent),
            ("gala_activity_errors_total", &self.activity_errors),
        ];
        let mut out = String::new();
        for (name, counter) in counters {
            out.push_str(&format!(
                "# TYPE {} counter\n{} {}\n",
                name,
                name,
                counter.load(Ordering::Relaxed)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prometheus_output_lists_every_counter() {
        let metrics = Metrics::default();
        metrics.record_ai_request(10);
        metrics.record_ai_request(2);
        let text = metrics.render_prometheus();
        assert!(text.contains("gala_ai_requests_total 2\n"));
        assert!(text.contains("gala_balloons_spent_total 12\n"));
        assert!(text.contains("# TYPE gala_tickets_sold_total counter\n"));
    }
}
