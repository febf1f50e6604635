// Export components
pub mod event_resolver;
pub mod intent_router;
pub mod language_model;
pub mod scheduling;

// Re-export the service seams
pub use language_model::ChatModel;
pub use scheduling::SchedulingService;
