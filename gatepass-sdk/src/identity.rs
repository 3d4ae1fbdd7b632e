use tracing::info;

/// Collaborator seam for external identity attestation.
///
/// The codec and award bookkeeping never talk to an identity provider
/// themselves; a host application supplies an implementation of this
/// trait when it wants presentations gated on a verified person.
pub trait IdentityVerifier {
    /// Check a user-supplied signal and report whether the person behind
    /// it is verified.
    fn verify_user(&self, user_signal: &str) -> bool;
}

/// Stand-in verifier used until a real identity provider is wired in.
///
/// Accepts any non-empty signal. The `app_id`/`action_id` pair mirrors
/// what a real provider integration would be configured with.
#[derive(Debug, Clone)]
pub struct StubIdentityVerifier {
    app_id: String,
    action_id: String,
}

impl StubIdentityVerifier {
    pub fn new(app_id: impl Into<String>, action_id: impl Into<String>) -> Self {
        let app_id = app_id.into();
        let action_id = action_id.into();
        info!(%app_id, %action_id, "stub identity verifier initialized");
        StubIdentityVerifier { app_id, action_id }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }
}

impl IdentityVerifier for StubIdentityVerifier {
    fn verify_user(&self, user_signal: &str) -> bool {
        info!(action_id = %self.action_id, "verifying user signal");
        !user_signal.is_empty()
    }
}
