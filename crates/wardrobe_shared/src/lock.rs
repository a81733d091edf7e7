//! # Padlocks
//!
//! Lock metadata carried by a restraint set. A set can only hold a lock while
//! it is enabled; the engine enforces that, this module only describes the
//! lock itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;

/// Kind of padlock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockKind {
    /// Not locked.
    #[default]
    None,
    /// Plain lock, anyone may open it.
    Metal,
    /// Four digit combination.
    Combination,
    /// Free-form password.
    Password,
    /// Opens itself when the timer runs out.
    Timer,
    /// Password lock with a timer.
    TimerPassword,
    /// Only the assigner may open it.
    Owner,
    /// Owner lock with a timer.
    OwnerTimer,
    /// Lock placed by cursed loot.
    Mimic,
}

impl LockKind {
    /// Returns true if this kind needs a password to open.
    #[inline]
    #[must_use]
    pub const fn requires_password(self) -> bool {
        matches!(self, Self::Combination | Self::Password | Self::TimerPassword)
    }

    /// Returns true if this kind carries an expiry.
    #[inline]
    #[must_use]
    pub const fn is_timed(self) -> bool {
        matches!(
            self,
            Self::Timer | Self::TimerPassword | Self::OwnerTimer | Self::Mimic
        )
    }
}

/// Lock fields of a restraint set. `Default` is "unlocked".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockState {
    /// Kind of padlock.
    pub kind: LockKind,
    /// Password, for password kinds.
    pub password: Option<String>,
    /// Expiry, for timed kinds.
    pub expires_at: Option<DateTime<Utc>>,
    /// Who locked it.
    pub assigner: Option<ActorId>,
}

impl LockState {
    /// Returns true if any padlock is present.
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.kind != LockKind::None
    }

    /// Returns true if this is a timed lock whose expiry has passed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.kind.is_timed() && self.expires_at.is_some_and(|at| at <= now)
    }

    /// Checks a supplied password against the lock.
    ///
    /// Locks without a password accept anything.
    #[must_use]
    pub fn accepts(&self, password: Option<&str>) -> bool {
        match self.password.as_deref() {
            None => true,
            Some(expected) => password == Some(expected),
        }
    }
}

/// A request to place a padlock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockRequest {
    /// Kind of padlock.
    pub kind: LockKind,
    /// Password, required by password kinds.
    pub password: Option<String>,
    /// Expiry, required by timed kinds.
    pub expires_at: Option<DateTime<Utc>>,
    /// Who is locking.
    pub assigner: ActorId,
}

impl LockRequest {
    /// Creates a request for a lock without password or timer.
    #[must_use]
    pub fn new(kind: LockKind, assigner: ActorId) -> Self {
        Self {
            kind,
            password: None,
            expires_at: None,
            assigner,
        }
    }

    /// Sets the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the expiry.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Checks the request is complete for its kind.
    ///
    /// # Errors
    ///
    /// Returns a reason if the kind is `None`, a password kind has no
    /// password, or a timed kind has no expiry.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.kind == LockKind::None {
            return Err("lock kind must not be None");
        }
        if self.kind.requires_password() && self.password.as_deref().map_or(true, str::is_empty) {
            return Err("lock kind requires a password");
        }
        if self.kind.is_timed() && self.expires_at.is_none() {
            return Err("lock kind requires an expiry");
        }
        Ok(())
    }

    /// Turns the request into the stored lock state.
    #[must_use]
    pub fn into_state(self) -> LockState {
        LockState {
            kind: self.kind,
            password: self.password,
            expires_at: self.expires_at,
            assigner: Some(self.assigner),
        }
    }
}
