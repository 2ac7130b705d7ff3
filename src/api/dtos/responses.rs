use crate::domain::models::slot::Slot;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct SlotResponse {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
}

impl From<&Slot> for SlotResponse {
    fn from(slot: &Slot) -> Self {
        Self {
            id: slot.id.clone(),
            date: slot.date.format("%Y-%m-%d").to_string(),
            start_time: slot.start_time.format("%H:%M").to_string(),
            end_time: slot.end_time.format("%H:%M").to_string(),
            is_available: slot.is_available,
        }
    }
}

/// Bookable slots keyed by `YYYY-MM-DD`; the map keeps dates in order.
#[derive(Serialize)]
pub struct BookableSlotsResponse {
    pub slots: BTreeMap<String, Vec<SlotResponse>>,
}

impl BookableSlotsResponse {
    pub fn group(slots: &[Slot]) -> Self {
        let mut grouped: BTreeMap<String, Vec<SlotResponse>> = BTreeMap::new();
        for slot in slots {
            grouped.entry(slot.date.format("%Y-%m-%d").to_string())
                .or_default()
                .push(SlotResponse::from(slot));
        }
        Self { slots: grouped }
    }
}
