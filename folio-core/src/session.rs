//! Login session state machine.
//!
//! Anonymous → [login success] → Authenticated(session) → [logout |
//! inactivity timeout] → Anonymous. The session object is passed down
//! explicitly; there is no ambient auth state. Expiry checks take the
//! current instant as a parameter so they are deterministic under test.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Idle time after which an authenticated session expires.
pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// The user profile returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "fullName")]
    pub full_name: String,
    #[serde(default = "default_num_stocks")]
    pub num_stocks: u32,
    #[serde(default = "default_investment")]
    pub investment: f64,
}

fn default_num_stocks() -> u32 {
    15
}

fn default_investment() -> f64 {
    500_000.0
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            full_name: String::new(),
            num_stocks: default_num_stocks(),
            investment: default_investment(),
        }
    }
}

/// An authenticated session with its inactivity clock.
#[derive(Debug, Clone)]
pub struct Session {
    pub profile: Profile,
    last_activity: Instant,
}

impl Session {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            last_activity: Instant::now(),
        }
    }

    /// Record user activity, resetting the inactivity clock.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.last_activity) >= INACTIVITY_TIMEOUT
    }
}

/// The two auth states the UI can be in.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    /// Login success transition. Replaces any existing session.
    pub fn login(&mut self, profile: Profile) {
        *self = SessionState::Authenticated(Session::new(profile));
    }

    /// Logout transition. A no-op when already anonymous.
    pub fn logout(&mut self) {
        *self = SessionState::Anonymous;
    }

    /// Record activity on the current session, if any.
    pub fn touch(&mut self) {
        if let SessionState::Authenticated(session) = self {
            session.touch();
        }
    }

    /// Drop the session if it has been idle past the timeout. Returns true
    /// when a timeout transition happened.
    pub fn expire_if_idle(&mut self, now: Instant) -> bool {
        if let SessionState::Authenticated(session) = self {
            if session.is_expired_at(now) {
                *self = SessionState::Anonymous;
                return true;
            }
        }
        false
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            SessionState::Authenticated(session) => Some(&session.profile),
            SessionState::Anonymous => None,
        }
    }
}
