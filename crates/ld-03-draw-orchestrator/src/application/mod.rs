//! Application layer: orchestrator and verifier services.

pub mod orchestrator;
pub mod verifier;

pub use orchestrator::{DrawDependencies, DrawOrchestrator};
pub use verifier::DrawVerifier;

#[cfg(test)]
pub(crate) mod test_support;
