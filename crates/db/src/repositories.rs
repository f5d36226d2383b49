pub mod appointment;
pub mod booking;
pub mod notification;
pub mod patient;
pub mod therapist;
