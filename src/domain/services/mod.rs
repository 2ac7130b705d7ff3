pub mod availability;
pub mod pricing;
pub mod waitlist_service;
