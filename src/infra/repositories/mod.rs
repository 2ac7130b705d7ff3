pub mod sqlite_artisan_repo;
pub mod sqlite_availability_repo;
pub mod sqlite_slot_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_waitlist_repo;
pub mod sqlite_pricing_repo;

pub mod postgres_artisan_repo;
pub mod postgres_availability_repo;
pub mod postgres_slot_repo;
pub mod postgres_booking_repo;
pub mod postgres_waitlist_repo;
pub mod postgres_pricing_repo;
