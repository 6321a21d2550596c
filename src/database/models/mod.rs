pub mod auth;
pub mod job;
pub mod macros;
pub mod mechanic;
pub mod payment;

// Re-export all models for easy importing
pub use auth::*;
pub use job::*;
pub use mechanic::*;
pub use payment::*;
