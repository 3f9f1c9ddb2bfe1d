pub mod alert;
pub mod medical_check;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use alert::{AlertSinkTrait, LogAlertSink};
pub use medical_check::{
    create_default_medical_check_service, MedicalCheckService, MedicalCheckServiceError,
    MedicalCheckServiceTrait, TEMPERATURE_TOLERANCE,
};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use medical_check::create_mock_medical_check_service;
