use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use sqlx::types::Json;
use crate::domain::models::availability::{AvailabilityPolicy, AvailabilityUpdate, TimeRange};
use crate::domain::models::slot::Slot;
use crate::domain::ports::Clock;
use crate::error::AppError;

/// Wall-clock "now" in the platform timezone; slot dates and times are stored in that frame.
pub fn local_now(clock: &dyn Clock, tz: Tz) -> NaiveDateTime {
    clock.now().with_timezone(&tz).naive_local()
}

pub fn parse_hhmm(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid time '{}' (expected HH:MM)", value)))
}

/// Parses ranges and rejects empty, inverted or overlapping ones. Output is sorted by start.
pub fn parse_ranges(ranges: &[TimeRange]) -> Result<Vec<(NaiveTime, NaiveTime)>, AppError> {
    let mut parsed = Vec::with_capacity(ranges.len());
    for range in ranges {
        let start = parse_hhmm(&range.start)?;
        let end = parse_hhmm(&range.end)?;
        if start >= end {
            return Err(AppError::Validation(format!("Range {}-{} must end after it starts", range.start, range.end)));
        }
        parsed.push((start, end));
    }

    parsed.sort();
    for pair in parsed.windows(2) {
        if pair[1].0 < pair[0].1 {
            return Err(AppError::Validation("Time ranges must not overlap".into()));
        }
    }
    Ok(parsed)
}

/// Merges a partial update into `current`. Nothing is returned unless every field is in range.
pub fn apply_update(current: AvailabilityPolicy, update: &AvailabilityUpdate) -> Result<AvailabilityPolicy, AppError> {
    let mut policy = current;

    if let Some(days) = update.advance_booking_days {
        if !(1..=365).contains(&days) {
            return Err(AppError::Validation("advance_booking_days must be between 1 and 365".into()));
        }
        policy.advance_booking_days = days;
    }
    if let Some(hours) = update.min_notice_hours {
        if !(0..=168).contains(&hours) {
            return Err(AppError::Validation("min_notice_hours must be between 0 and 168".into()));
        }
        policy.min_notice_hours = hours;
    }
    if let Some(radius) = update.intervention_radius_km {
        if !radius.is_finite() || !(1.0..=200.0).contains(&radius) {
            return Err(AppError::Validation("intervention_radius_km must be between 1 and 200".into()));
        }
        policy.intervention_radius_km = radius;
    }
    if let Some(ref days) = update.working_days {
        if days.iter().any(|d| *d > 6) {
            return Err(AppError::Validation("working_days must contain weekdays 0-6".into()));
        }
        let mut days = days.clone();
        days.sort_unstable();
        days.dedup();
        policy.working_days = Json(days);
    }
    if let Some(ref slots) = update.default_slots {
        let parsed = parse_ranges(slots)?;
        policy.default_slots = Json(
            parsed.into_iter()
                .map(|(s, e)| TimeRange { start: s.format("%H:%M").to_string(), end: e.format("%H:%M").to_string() })
                .collect()
        );
    }
    if let Some(enabled) = update.booking_enabled {
        policy.booking_enabled = enabled;
    }

    Ok(policy)
}

/// Each gate is independent; failing any one hides the slot.
pub fn is_bookable(policy: &AvailabilityPolicy, slot: &Slot, now: NaiveDateTime) -> bool {
    if !policy.booking_enabled || !slot.is_available {
        return false;
    }
    if !policy.works_on(slot.date.weekday().num_days_from_sunday()) {
        return false;
    }

    let last_bookable_day = now.date() + Duration::days(policy.advance_booking_days as i64);
    if slot.date > last_bookable_day {
        return false;
    }

    let earliest_start = now + Duration::hours(policy.min_notice_hours as i64);
    slot.starts_at() >= earliest_start
}

pub fn filter_bookable(policy: &AvailabilityPolicy, slots: Vec<Slot>, now: NaiveDateTime) -> Vec<Slot> {
    let mut bookable: Vec<Slot> = slots.into_iter()
        .filter(|slot| is_bookable(policy, slot, now))
        .collect();
    bookable.sort_by_key(|s| (s.date, s.start_time));
    bookable
}
