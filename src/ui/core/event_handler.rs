use crossterm::event::{poll, Event, KeyEvent, KeyEventKind};
use tokio::time::{Duration, Instant};

/// Polls the terminal without blocking the runtime; idles into `Tick`s
pub struct EventHandler {
    tick_rate: Duration,
    refresh_interval: Option<Duration>,
    last_refresh: Instant,
}

impl EventHandler {
    pub fn new(refresh_interval: Option<Duration>) -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
            refresh_interval,
            last_refresh: Instant::now(),
        }
    }

    pub async fn next_event(&mut self) -> anyhow::Result<EventType> {
        if poll(Duration::from_millis(0))? {
            match crossterm::event::read()? {
                // Windows reports releases too
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(EventType::Key(key)),
                Event::Resize(w, h) => return Ok(EventType::Resize(w, h)),
                _ => return Ok(EventType::Other),
            }
        }

        tokio::time::sleep(self.tick_rate).await;

        if self.refresh_due() {
            self.last_refresh = Instant::now();
            return Ok(EventType::Refresh);
        }
        Ok(EventType::Tick)
    }

    fn refresh_due(&self) -> bool {
        self.refresh_interval
            .map_or(false, |interval| self.last_refresh.elapsed() >= interval)
    }
}

#[derive(Debug, Clone)]
pub enum EventType {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    /// The auto-refresh interval elapsed
    Refresh,
    Other,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(None)
    }
}
