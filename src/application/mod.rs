//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Command interpreter and message routing
//! - Errors: Domain-specific errors
//! - Messaging: Text to command parsing

pub mod errors;
pub mod services;
pub mod messaging;
