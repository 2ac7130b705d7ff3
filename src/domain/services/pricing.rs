use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};
use crate::domain::models::pricing::{AppliedRule, PriceQuote, RuleType};
use crate::error::AppError;

/// Used when no contracted rate or explicit base price is known.
pub const DEFAULT_BASE_PRICE: i64 = 50;
/// Upper bound for a client-supplied base price.
pub const MAX_BASE_PRICE: i64 = 1_000_000;

const OFF_PEAK_HOURS: [u32; 4] = [8, 9, 16, 17];
const OFF_PEAK_MODIFIER: i32 = -15;
const LAST_MINUTE_WINDOW_HOURS: i64 = 24;
const LAST_MINUTE_MODIFIER: i32 = 10;
const WEEKEND_MODIFIER: i32 = 5;
const HOLIDAY_MODIFIER: i32 = 20;

/// French public holidays on a fixed calendar date, as (month, day).
const PUBLIC_HOLIDAYS: [(u32, u32); 8] = [
    (1, 1), (5, 1), (5, 8), (7, 14), (8, 15), (11, 1), (11, 11), (12, 25),
];

pub fn is_public_holiday(date: NaiveDate) -> bool {
    PUBLIC_HOLIDAYS.contains(&(date.month(), date.day()))
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Quotes a booking. Every matching rule fires; modifiers are summed as percentage points
/// and applied once, with no clamp. `created_at` is the booking creation time in the same
/// local frame as `date`/`time`. Fails only when the price does not fit in a `Decimal`.
pub fn calculate_dynamic_price(
    base_price: Decimal,
    date: NaiveDate,
    time: NaiveTime,
    created_at: NaiveDateTime,
) -> Result<PriceQuote, AppError> {
    let mut applied_rules = Vec::new();

    if OFF_PEAK_HOURS.contains(&time.hour()) {
        applied_rules.push(AppliedRule {
            rule_type: RuleType::OffPeak,
            discount: OFF_PEAK_MODIFIER,
            description: "Off-peak hours discount".to_string(),
        });
    }

    let until_booking = date.and_time(time) - created_at;
    if until_booking > Duration::zero() && until_booking < Duration::hours(LAST_MINUTE_WINDOW_HOURS) {
        applied_rules.push(AppliedRule {
            rule_type: RuleType::LastMinute,
            discount: LAST_MINUTE_MODIFIER,
            description: "Last-minute booking".to_string(),
        });
    }

    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        applied_rules.push(AppliedRule {
            rule_type: RuleType::HighDemand,
            discount: WEEKEND_MODIFIER,
            description: "Weekend".to_string(),
        });
    }

    if is_public_holiday(date) {
        applied_rules.push(AppliedRule {
            rule_type: RuleType::Holiday,
            discount: HOLIDAY_MODIFIER,
            description: "Public holiday".to_string(),
        });
    }

    let total_percent: i32 = applied_rules.iter().map(|r| r.discount).sum();
    let factor = Decimal::ONE + Decimal::from(total_percent) / Decimal::ONE_HUNDRED;
    let final_price = base_price.checked_mul(factor)
        .map(round_cents)
        .ok_or_else(|| AppError::Validation("base_price is too large".into()))?;

    // Both operands fit and share a sign, so the difference cannot overflow.
    let (savings, surcharge) = if final_price < base_price {
        (round_cents(base_price - final_price), Decimal::ZERO)
    } else if final_price > base_price {
        (Decimal::ZERO, round_cents(final_price - base_price))
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    Ok(PriceQuote {
        base_price,
        final_price,
        applied_rules,
        savings,
        surcharge,
    })
}
