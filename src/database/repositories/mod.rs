pub mod admin;
pub mod job;
pub mod mechanic;
pub mod payment;

// Re-export all repositories for easy importing
pub use admin::AdminRepository;
pub use job::JobRepository;
pub use mechanic::MechanicRepository;
pub use payment::WeeklyPaymentRepository;
