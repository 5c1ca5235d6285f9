//! Host actions the wizard triggers but doesn't implement.

use serde_json::Value;

/// Side effects requested by the wizard. Implementations must not call back
/// into the controller synchronously.
pub trait OnboardingHost: Send + Sync {
    /// Submit the DAO creation transaction.
    fn build_dao(&self, template_name: &str, domain: &str, data: Value);

    /// Open an organization by full domain (`name.aragonid.eth`) or address.
    fn open_organization(&self, target: &str);

    /// The user confirmed the launch screen.
    fn complete(&self);

    /// Discard any in-progress DAO creation.
    fn reset_dao_builder(&self);
}

/// Host that ignores every action.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl OnboardingHost for NoopHost {
    fn build_dao(&self, _template_name: &str, _domain: &str, _data: Value) {}
    fn open_organization(&self, _target: &str) {}
    fn complete(&self) {}
    fn reset_dao_builder(&self) {}
}
