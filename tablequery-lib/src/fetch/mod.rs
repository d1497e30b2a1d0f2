//! Fetch orchestration and response reconciliation.

mod loading;
mod orchestrator;
mod reconcile;

pub use loading::Generation;
pub use loading::LoadingFlags;
pub use orchestrator::DispatchOutcome;
pub use orchestrator::FetchOrchestrator;
pub use orchestrator::Ticket;
pub use orchestrator::Trigger;
pub use reconcile::Reconciliation;
pub use reconcile::reconcile;
