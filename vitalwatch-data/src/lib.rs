// VitalWatch Data
// This crate handles patient record storage and retrieval

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
