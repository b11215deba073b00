//! AI Client Adapters.
//!
//! Implementations of the AIClient port.
//!
//! ## Available Adapters
//!
//! - `MockAIClient` - Configurable mock for testing
//! - `UnavailableAIClient` - Offline mode, every call fails

mod mock_client;
mod unavailable_client;

pub use mock_client::{MockAIClient, MockCall, MockReply};
pub use unavailable_client::UnavailableAIClient;
