// Test modules for llm-router crate
//
// Each source module has a matching test file focused on business logic.
// Provider HTTP behaviour lives in the integration tests under tests/.

// Shared fixtures: environments, config maps and stub handlers
pub mod helpers;

pub mod capabilities;
pub mod env;
pub mod messages;
pub mod retry;
