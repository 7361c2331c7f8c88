use chrono::Utc;

/// Source of the current time in milliseconds since the Unix epoch
pub type Clock = fn() -> i64;

fn wall_clock() -> i64 {
    Utc::now().timestamp_millis()
}

/// Hands out note IDs derived from the clock, bumped past the last issued ID so two
/// notes created in the same millisecond (or after the clock stepped back) never collide.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    clock: Clock,
    last: Option<i64>,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(wall_clock)
    }
}

impl IdGenerator {
    #[must_use]
    pub const fn new(clock: Clock) -> Self {
        Self { clock, last: None }
    }

    /// Makes sure every future ID is greater than `id`.
    pub fn observe(&mut self, id: i64) {
        self.last = Some(self.last.map_or(id, |last| last.max(id)));
    }

    /// Returns `None` once the last issued ID is `i64::MAX` and the clock is not past it.
    pub fn next_id(&mut self) -> Option<i64> {
        let now = (self.clock)();
        let id = match self.last {
            Some(last) if now <= last => last.checked_add(1)?,
            _ => now,
        };
        self.last = Some(id);
        Some(id)
    }
}
