pub mod artisan;
pub mod availability;
pub mod booking;
pub mod pricing;
pub mod slot;
pub mod waitlist;
