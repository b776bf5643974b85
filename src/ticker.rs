use crate::format::format_elapsed;
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle, time};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub trait ElapsedDisplay: Send + 'static {
    fn show(&mut self, label: &str);
}

impl ElapsedDisplay for mpsc::UnboundedSender<String> {
    fn show(&mut self, label: &str) {
        let _ = self.send(label.to_string());
    }
}

// Always measured from the fixed session start, never from the last tick.
pub struct ElapsedTicker<C> {
    session_start_ms: i64,
    period: Duration,
    clock: C,
}

impl<C> ElapsedTicker<C>
where
    C: Fn() -> i64 + Send + 'static,
{
    pub fn new(session_start_ms: i64, clock: C) -> Self {
        Self {
            session_start_ms,
            period: TICK_PERIOD,
            clock,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn render(&self) -> String {
        format_elapsed((self.clock)() - self.session_start_ms)
    }

    pub fn spawn<D: ElapsedDisplay>(self, mut display: D) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = time::interval(self.period);
            loop {
                interval.tick().await;
                display.show(&self.render());
            }
        })
    }
}
