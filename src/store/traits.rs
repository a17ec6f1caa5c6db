use anyhow::Result;

/// Local lookup from an authenticated e-mail to the caller's tenant key.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Tenant key (the company's unique identifier, e.g. a phone number) for a
    /// normalised e-mail, or `None` when the user has not registered one.
    async fn unique_identifier_for(&self, email: &str) -> Result<Option<String>>;
}
