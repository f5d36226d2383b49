pub mod booking;
pub mod delivery;
