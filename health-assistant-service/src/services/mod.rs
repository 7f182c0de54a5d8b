pub mod assistant;
pub mod providers;

pub use assistant::{Consultation, ConsultationError, HealthAssistant};
pub use providers::{GenerationParams, ProviderError, TextProvider};
