//! Decoding response bodies into the uniform envelope.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::RawResponse;
use crate::types::Envelope;

/// Materialize the body of `response` and parse it as `Envelope<D>`.
///
/// The status is not checked: 4xx envelopes decode the same way as 2xx ones.
/// A body that is not JSON fails with `ApiError::Decode`.
pub fn decode<D, R>(response: &mut R) -> Result<Envelope<D>, ApiError>
where
    D: DeserializeOwned,
    R: RawResponse + ?Sized,
{
    let body = response.text()?;
    Ok(serde_json::from_str(body)?)
}
