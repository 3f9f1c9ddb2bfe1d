// VitalWatch Domain
// This crate contains the vital-sign monitoring rules for the VitalWatch application

// Services that implement business logic
pub mod services;

// Re-export the patient models from vitalwatch-data for convenience
pub use vitalwatch_data::models;

// Testing utilities - available in unit tests and with the mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;
