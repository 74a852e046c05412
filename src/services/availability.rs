use std::collections::HashSet;

use chrono::{Duration, NaiveTime};

use crate::models::Appointment;
use crate::services::slots::{Slot, SlotGrid};

/// Expand each appointment into the grid positions its duration covers,
/// starting at its recorded time. Overlapping spans simply union; the stored
/// appointments are taken as ground truth and are not cross-validated here.
pub fn occupied_positions(grid: &SlotGrid, appointments: &[Appointment]) -> HashSet<NaiveTime> {
    let mut occupied = HashSet::new();
    for appointment in appointments {
        let span = grid.slots_needed(appointment.duration_minutes);
        for i in 0..span {
            let offset = Duration::minutes(i as i64 * grid.slot_minutes() as i64);
            let (position, _) = appointment.time.overflowing_add_signed(offset);
            occupied.insert(position);
        }
    }
    occupied
}

/// Per-slot availability over the whole business day for a booking of
/// `duration_minutes`. A candidate start is available only when every slot
/// of the required run exists on the grid and none of them is occupied; a
/// run that would extend past closing is never available.
pub fn day_availability(
    grid: &SlotGrid,
    duration_minutes: i32,
    appointments: &[Appointment],
) -> Vec<Slot> {
    let positions = grid.positions();
    let occupied = occupied_positions(grid, appointments);
    let needed = grid.slots_needed(duration_minutes);

    positions
        .iter()
        .enumerate()
        .map(|(idx, &time)| {
            let fits = idx + needed <= positions.len();
            let available = fits
                && positions[idx..idx + needed]
                    .iter()
                    .all(|t| !occupied.contains(t));
            Slot { time, available }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use chrono::Utc;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn grid() -> SlotGrid {
        SlotGrid::parse("09:00", "18:00", 30).unwrap()
    }

    fn appointment(time: &str, duration_minutes: i32) -> Appointment {
        Appointment {
            id: "a-1".to_string(),
            service_id: "svc-1".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
            time: t(time),
            name: "Alice".to_string(),
            phone: "+34911223344".to_string(),
            status: AppointmentStatus::Pending,
            duration_minutes,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn availability_at(slots: &[Slot], time: &str) -> bool {
        slots
            .iter()
            .find(|s| s.time == t(time))
            .map(|s| s.available)
            .unwrap()
    }

    #[test]
    fn test_empty_day_fully_available() {
        let slots = day_availability(&grid(), 30, &[]);
        assert_eq!(slots.len(), 18);
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn test_appointment_occupies_its_whole_span() {
        let occupied = occupied_positions(&grid(), &[appointment("10:00", 90)]);
        assert_eq!(occupied.len(), 3);
        assert!(occupied.contains(&t("10:00")));
        assert!(occupied.contains(&t("10:30")));
        assert!(occupied.contains(&t("11:00")));
        assert!(!occupied.contains(&t("11:30")));
    }

    #[test]
    fn test_partial_trailing_slot_reserved_in_full() {
        // 45 minutes rounds up to two slots
        let occupied = occupied_positions(&grid(), &[appointment("10:00", 45)]);
        assert_eq!(occupied.len(), 2);
        assert!(occupied.contains(&t("10:30")));
    }

    #[test]
    fn test_runs_intersecting_occupancy_are_unavailable() {
        let existing = [appointment("10:00", 90)];
        let slots = day_availability(&grid(), 60, &existing);

        // 09:30 needs 09:30+10:00, 11:00 needs 11:00+11:30
        assert!(availability_at(&slots, "09:00"));
        assert!(!availability_at(&slots, "09:30"));
        assert!(!availability_at(&slots, "10:00"));
        assert!(!availability_at(&slots, "10:30"));
        assert!(!availability_at(&slots, "11:00"));
        assert!(availability_at(&slots, "11:30"));
    }

    #[test]
    fn test_duplicate_start_times_union() {
        let existing = [appointment("10:00", 30), appointment("10:00", 60)];
        let slots = day_availability(&grid(), 30, &existing);
        assert!(!availability_at(&slots, "10:00"));
        assert!(!availability_at(&slots, "10:30"));
        assert!(availability_at(&slots, "11:00"));
    }

    #[test]
    fn test_last_slot_bookable_when_free() {
        let slots = day_availability(&grid(), 30, &[]);
        assert!(availability_at(&slots, "17:30"));
    }

    #[test]
    fn test_run_past_closing_never_available() {
        // 60 minutes starting 17:30 would need a 18:00 slot that does not exist
        let slots = day_availability(&grid(), 60, &[]);
        assert!(!availability_at(&slots, "17:30"));
        assert!(availability_at(&slots, "17:00"));
    }

    #[test]
    fn test_fully_booked_day_reports_all_unavailable() {
        let existing: Vec<Appointment> = grid()
            .positions()
            .iter()
            .map(|p| appointment(&p.format("%H:%M").to_string(), 30))
            .collect();
        for duration in [30, 60, 90] {
            let slots = day_availability(&grid(), duration, &existing);
            assert!(slots.iter().all(|s| !s.available));
        }
    }

    #[test]
    fn test_off_grid_appointment_does_not_block_grid() {
        // The calculator trusts stored times as-is; a misaligned record's
        // span never lands on grid positions.
        let slots = day_availability(&grid(), 30, &[appointment("10:15", 30)]);
        assert!(availability_at(&slots, "10:00"));
        assert!(availability_at(&slots, "10:30"));
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let existing = [appointment("10:00", 90), appointment("14:00", 30)];
        let first = day_availability(&grid(), 60, &existing);
        let second = day_availability(&grid(), 60, &existing);
        assert_eq!(first, second);
    }
}
