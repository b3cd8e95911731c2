// The credential check is client-side and visible in the binary. It is a
// convenience gate for a personal app, not a security measure: anyone with a
// debugger can flip the flag. Do not harden it here.
const MOCK_USER: &str = "atlmra@atlcra.com";
const MOCK_PASS: &str = "123456";

/// Process-wide signed-in flag gating the edit affordances.
///
/// Created false at startup, set only by a successful [`Session::sign_in`],
/// cleared by [`Session::sign_out`] or a failed attempt. Never persisted.
#[derive(Default)]
pub struct Session {
    signed_in: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares against the embedded mock credentials. On mismatch the flag
    /// is cleared so a stale signed-in state cannot survive a failed retry.
    pub fn sign_in(&mut self, identifier: &str, secret: &str) -> bool {
        self.signed_in = identifier == MOCK_USER && secret == MOCK_PASS;
        self.signed_in
    }

    pub fn sign_out(&mut self) {
        self.signed_in = false;
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }
}
