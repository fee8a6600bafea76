//! Credential sign-in.
//!
//! Credentials come from the environment, never from the config file. With a
//! persistent profile directory the site usually remembers the session and
//! the guest marker never shows up.

use crate::actions::{pause, type_into, Timing};
use crate::driver::{Candidate, PageDriver};
use crate::error::Result;
use crate::selectors;
use log::info;

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Read `EMAIL`/`PASSWORD` from the environment. `None` when either is
    /// missing; the run then requires an already-signed-in profile.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("EMAIL").ok()?;
        let password = std::env::var("PASSWORD").ok()?;
        if email.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { email, password })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sign in when the guest marker is present; otherwise the stored session is
/// still valid and nothing happens.
pub async fn sign_in(
    driver: &dyn PageDriver,
    credentials: &Credentials,
    timing: &Timing,
) -> Result<()> {
    let marker = Candidate::css(selectors::GUEST_SIGN_IN_MARKER);
    if !driver.is_present(&marker).await.unwrap_or(false) {
        info!("already signed in");
        return Ok(());
    }

    let key_input = Candidate::css(selectors::SESSION_KEY_INPUT);
    let password_input = Candidate::css(selectors::SESSION_PASSWORD_INPUT);
    type_into(driver, &key_input, &credentials.email, timing).await?;
    type_into(driver, &password_input, &credentials.password, timing).await?;
    driver.press_enter(&password_input).await?;
    pause(timing.step_pause).await;
    info!("signed in");
    Ok(())
}
