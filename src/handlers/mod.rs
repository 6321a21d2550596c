pub mod auth;
pub mod jobs;
pub mod mechanics;
pub mod reports;
pub mod shared;
