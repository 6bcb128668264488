use chrono::{Datelike, NaiveDate};

/// Decides which days may be opened on a given date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateGate {
    pub year: i32,
    pub month: u32,
}

impl Default for DateGate {
    fn default() -> Self {
        Self::season_of(chrono::Local::now().date_naive())
    }
}

impl DateGate {
    pub fn december(year: i32) -> Self {
        Self { year, month: 12 }
    }

    /// The most recent advent season that has started by `today`, or this
    /// year's when it is December. January still belongs to last December.
    pub fn season_of(today: NaiveDate) -> Self {
        if today.month() == 12 {
            Self::december(today.year())
        } else {
            Self::december(today.year() - 1)
        }
    }

    /// Day `n` unlocks on the n-th of the advent month and stays unlocked afterwards.
    /// Days past the end of the month unlock once the month is over.
    pub fn can_open(&self, day: u32, today: NaiveDate) -> bool {
        if day == 0 {
            return false;
        }
        match (today.year(), today.month()) {
            (year, _) if year != self.year => year > self.year,
            (_, month) if month != self.month => month > self.month,
            _ => today.day() >= day,
        }
    }

    pub fn can_open_today(&self, day: u32) -> bool {
        self.can_open(day, chrono::Local::now().date_naive())
    }
}

pub const GRID_COLUMNS: u32 = 6;

/// Scattered but stable placement of the boxes on the calendar grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxLayout {
    slots: Vec<u32>,
}

impl BoxLayout {
    /// Same seed and day count, same layout. Rows grow with the number of days.
    pub fn shuffled(seed: u64, days: u32) -> Self {
        let mut slots: Vec<u32> = (0..Self::rows_for(days) * GRID_COLUMNS).collect();
        // xorshift64, the state must never be zero
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 1;
        }
        for i in (1..slots.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            slots.swap(i, j);
        }
        slots.truncate(days as usize);
        Self { slots }
    }

    fn rows_for(days: u32) -> u32 {
        days.div_ceil(GRID_COLUMNS).max(1)
    }

    pub fn rows(&self) -> u32 {
        Self::rows_for(self.slots.len() as u32)
    }

    /// Grid cell `(column, row)` for a day, zero-based
    pub fn position(&self, day: u32) -> Option<(u32, u32)> {
        let index = day.checked_sub(1)? as usize;
        let slot = *self.slots.get(index)?;
        Some((slot % GRID_COLUMNS, slot / GRID_COLUMNS))
    }
}
