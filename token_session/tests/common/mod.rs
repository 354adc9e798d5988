pub mod mock_browser;

pub use mock_browser::{MockBrowser, TestUser, session_orchestrator};
