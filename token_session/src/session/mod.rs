mod cookie;
mod orchestrator;
mod remote_addr;
mod types;


pub use orchestrator::SessionOrchestrator;
pub use remote_addr::remote_addr_from_headers;
pub use types::{RequestCredentials, TokenPair, VerifiedSession, VerifyPolicy};
