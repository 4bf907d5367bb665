//! Poll-response registration state.
//!
//! The radio only talks to devices it has polled. Until that handshake
//! completes, the changer keeps announcing itself on every packet that
//! fails to route; once registered it stays registered for the life of
//! the process (bus disconnects are out of scope).

/// Whether the changer has completed the poll handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    /// The radio has not polled us yet.
    Unregistered,
    /// Poll answered; terminal for this process.
    Registered,
}

/// Process-scoped registration flag, shared by the poll-response handler
/// and the unrouted-packet announcement fallback.
#[derive(Debug)]
pub struct Registration {
    state: RegistrationState,
}

impl Default for Registration {
    fn default() -> Self {
        Registration::new()
    }
}

impl Registration {
    /// Start unregistered.
    pub fn new() -> Self {
        Registration {
            state: RegistrationState::Unregistered,
        }
    }

    /// Current state.
    pub fn state(&self) -> RegistrationState {
        self.state
    }

    pub fn is_registered(&self) -> bool {
        self.state == RegistrationState::Registered
    }

    /// Record a completed handshake. Idempotent; there is no way back.
    pub fn mark_registered(&mut self) {
        self.state = RegistrationState::Registered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unregistered() {
        let registration = Registration::new();
        assert_eq!(registration.state(), RegistrationState::Unregistered);
        assert!(!registration.is_registered());
    }

    #[test]
    fn test_mark_registered_is_idempotent() {
        let mut registration = Registration::new();
        registration.mark_registered();
        assert!(registration.is_registered());
        registration.mark_registered();
        assert_eq!(registration.state(), RegistrationState::Registered);
    }
}
