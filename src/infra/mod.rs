pub mod clock;
pub mod factory;
pub mod notifications;
pub mod repositories;
