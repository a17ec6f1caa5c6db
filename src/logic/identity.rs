use crate::error::ApiError;
use crate::model::{Company, Id};
use crate::store::UserDirectory;
use crate::upstream::{list_records, Resource, UpstreamClient};

/// Maps an authenticated principal to the numeric id of its company.
///
/// Nothing is memoised: every call consults the directory and the upstream
/// `companies` collection again.
pub struct IdentityResolver<'a, D: UserDirectory + ?Sized> {
    directory: &'a D,
    upstream: &'a UpstreamClient,
}

impl<'a, D: UserDirectory + ?Sized> IdentityResolver<'a, D> {
    pub fn new(directory: &'a D, upstream: &'a UpstreamClient) -> Self {
        Self {
            directory,
            upstream,
        }
    }

    pub async fn resolve(&self, email: &str) -> Result<Id, ApiError> {
        let unique_identifier = self
            .directory
            .unique_identifier_for(email)
            .await
            .map_err(|e| {
                log::error!("User directory lookup failed: {:#}", e);
                ApiError::internal("USER_LOOKUP_FAILED").with_details(e.to_string())
            })?
            .ok_or_else(|| ApiError::bad_request("COMPANY_NUMBER_REQUIRED"))?;

        let companies: Vec<Company> = list_records(
            self.upstream,
            Resource::Companies,
            &[("unique_identifier", unique_identifier)],
        )
        .await?;

        companies
            .first()
            .and_then(Company::resolved_id)
            .ok_or_else(|| ApiError::not_found("COMPANY_ID_NOT_FOUND"))
    }
}
