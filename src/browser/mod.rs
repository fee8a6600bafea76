pub mod session;

pub use session::{ChromeSession, LaunchOptions};
