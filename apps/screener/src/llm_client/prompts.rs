// Shared prompt fragments for every completion call.
// Task-specific templates live next to the service that uses them.

/// System message sent with every completion request.
pub const DEFAULT_SYSTEM: &str = "You are a helpful assistant.";
