use anyhow::ensure;
use chrono::{Duration, NaiveTime};

/// One bookable position on the day's grid, tagged with availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub time: NaiveTime,
    pub available: bool,
}

/// The discretized time axis for a business day. The grid has the same shape
/// every day; only the appointments laid on top of it vary.
#[derive(Debug, Clone)]
pub struct SlotGrid {
    open: NaiveTime,
    close: NaiveTime,
    slot_minutes: i32,
}

impl SlotGrid {
    /// Construction is the configuration check: a grid whose span is not a
    /// whole number of slots is rejected rather than silently truncated.
    pub fn new(open: NaiveTime, close: NaiveTime, slot_minutes: i32) -> anyhow::Result<Self> {
        ensure!(slot_minutes > 0, "slot length must be positive, got {slot_minutes}");
        ensure!(
            close > open,
            "closing time {} must be after opening time {}",
            close.format("%H:%M"),
            open.format("%H:%M"),
        );
        let span = (close - open).num_minutes();
        ensure!(
            span % slot_minutes as i64 == 0,
            "business hours {}-{} are not a whole number of {slot_minutes}-minute slots",
            open.format("%H:%M"),
            close.format("%H:%M"),
        );
        Ok(Self {
            open,
            close,
            slot_minutes,
        })
    }

    pub fn parse(open: &str, close: &str, slot_minutes: i32) -> anyhow::Result<Self> {
        let open = NaiveTime::parse_from_str(open, "%H:%M")
            .map_err(|e| anyhow::anyhow!("invalid opening time {open:?}: {e}"))?;
        let close = NaiveTime::parse_from_str(close, "%H:%M")
            .map_err(|e| anyhow::anyhow!("invalid closing time {close:?}: {e}"))?;
        Self::new(open, close, slot_minutes)
    }

    pub fn open(&self) -> NaiveTime {
        self.open
    }

    pub fn close(&self) -> NaiveTime {
        self.close
    }

    pub fn slot_minutes(&self) -> i32 {
        self.slot_minutes
    }

    /// All slot start times for one day: strictly increasing, covering the
    /// half-open interval [open, close) with one entry per slot.
    pub fn positions(&self) -> Vec<NaiveTime> {
        let mut positions = vec![];
        let mut t = self.open;
        while t < self.close {
            positions.push(t);
            t += Duration::minutes(self.slot_minutes as i64);
        }
        positions
    }

    /// How many consecutive slots a booking of `duration_minutes` occupies.
    /// A partial trailing slot is reserved in full.
    pub fn slots_needed(&self, duration_minutes: i32) -> usize {
        ((duration_minutes + self.slot_minutes - 1) / self.slot_minutes).max(0) as usize
    }

    /// Index of a grid-aligned time within [open, close), or None if the
    /// time is off-grid or outside business hours.
    pub fn index_of(&self, time: NaiveTime) -> Option<usize> {
        if time < self.open || time >= self.close {
            return None;
        }
        let offset = (time - self.open).num_minutes();
        if offset % self.slot_minutes as i64 != 0 {
            return None;
        }
        Some((offset / self.slot_minutes as i64) as usize)
    }

    pub fn hours_label(&self) -> String {
        format!(
            "{}-{}",
            self.open.format("%H:%M"),
            self.close.format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn default_grid() -> SlotGrid {
        SlotGrid::new(t("09:00"), t("18:00"), 30).unwrap()
    }

    #[test]
    fn test_positions_cover_business_day() {
        let positions = default_grid().positions();
        assert_eq!(positions.len(), 18);
        assert_eq!(positions[0], t("09:00"));
        assert_eq!(positions[17], t("17:30"));
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_positions_exclude_closing_time() {
        let positions = default_grid().positions();
        assert!(!positions.contains(&t("18:00")));
    }

    #[test]
    fn test_count_matches_span_over_granularity() {
        let grid = SlotGrid::new(t("10:00"), t("13:00"), 15).unwrap();
        assert_eq!(grid.positions().len(), 12);
    }

    #[test]
    fn test_rejects_close_before_open() {
        assert!(SlotGrid::new(t("18:00"), t("09:00"), 30).is_err());
        assert!(SlotGrid::new(t("09:00"), t("09:00"), 30).is_err());
    }

    #[test]
    fn test_rejects_nonpositive_granularity() {
        assert!(SlotGrid::new(t("09:00"), t("18:00"), 0).is_err());
        assert!(SlotGrid::new(t("09:00"), t("18:00"), -30).is_err());
    }

    #[test]
    fn test_rejects_uneven_span() {
        assert!(SlotGrid::new(t("09:00"), t("18:10"), 30).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_times() {
        assert!(SlotGrid::parse("9am", "18:00", 30).is_err());
        assert!(SlotGrid::parse("09:00", "25:00", 30).is_err());
        assert!(SlotGrid::parse("09:00", "18:00", 30).is_ok());
    }

    #[test]
    fn test_slots_needed_rounds_up() {
        let grid = default_grid();
        assert_eq!(grid.slots_needed(30), 1);
        assert_eq!(grid.slots_needed(45), 2);
        assert_eq!(grid.slots_needed(60), 2);
        assert_eq!(grid.slots_needed(90), 3);
        assert_eq!(grid.slots_needed(1), 1);
    }

    #[test]
    fn test_index_of() {
        let grid = default_grid();
        assert_eq!(grid.index_of(t("09:00")), Some(0));
        assert_eq!(grid.index_of(t("17:30")), Some(17));
        assert_eq!(grid.index_of(t("09:15")), None);
        assert_eq!(grid.index_of(t("08:30")), None);
        assert_eq!(grid.index_of(t("18:00")), None);
    }
}
