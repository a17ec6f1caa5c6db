use axum::{
    async_trait,
    extract::{
        path::ErrorKind,
        rejection::{PathRejection, QueryRejection},
        FromRequestParts, Path, Query,
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::logic::fields::QueryParams;

/// Path parameters whose rejection stays inside the error envelope.
///
/// A segment that cannot be decoded answers `400 INVALID_<PARAM>`, named after
/// the route's parameter, so routes name their parameters after the id they carry.
#[derive(Debug, Clone)]
pub struct PathParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParams(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

fn path_rejection(rejection: PathRejection) -> ApiError {
    let code = match &rejection {
        PathRejection::FailedToDeserializePathParams(error) => match error.kind() {
            ErrorKind::InvalidUtf8InPathParam { key } | ErrorKind::ParseErrorAtKey { key, .. } => {
                format!("INVALID_{}", key.to_ascii_uppercase())
            }
            _ => "INVALID_PATH".to_string(),
        },
        _ => "INVALID_PATH".to_string(),
    };
    ApiError::bad_request(code).with_details(rejection.body_text())
}

/// Query string as a flat map; an undecodable query answers `400 INVALID_QUERY`.
#[derive(Debug, Clone, Default)]
pub struct QueryMap(pub QueryParams);

#[async_trait]
impl<S> FromRequestParts<S> for QueryMap
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Query::<QueryParams>::try_from_uri(&parts.uri)
            .map(|Query(query)| QueryMap(query))
            .map_err(query_rejection)
    }
}

fn query_rejection(rejection: QueryRejection) -> ApiError {
    ApiError::bad_request("INVALID_QUERY").with_details(rejection.body_text())
}
