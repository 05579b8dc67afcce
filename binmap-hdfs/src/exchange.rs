//! First-response classification for two-phase gateway exchanges.

use binmap_core::GatewayError;
use reqwest::Response;

/// How the gateway answered the first request of a two-phase operation.
///
/// A namenode answers CREATE/OPEN with a redirect naming the datanode
/// that holds the data; some deployments accept or serve the payload on
/// the first request instead. Classifying once up front keeps the two
/// code paths separate instead of burying the direct case in an error
/// handler.
#[derive(Debug)]
pub enum Exchange {
    /// Redirect contract: the payload belongs at `location`.
    Redirect { location: String },

    /// Direct contract: this response already carries the outcome.
    Direct(Response),
}

impl Exchange {
    /// Classify the first response of an exchange.
    ///
    /// Any 3xx selects the redirect contract and must name its target; a
    /// redirect without a `Location` header is a protocol violation, not
    /// something to retry. Every non-3xx response is handed back as the
    /// direct outcome for the caller to judge by status.
    pub fn classify(op: &'static str, response: Response) -> Result<Self, GatewayError> {
        if !response.status().is_redirection() {
            return Ok(Self::Direct(response));
        }

        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(|location| Self::Redirect {
                location: location.to_string(),
            })
            .ok_or(GatewayError::MissingRedirect { op })
    }
}
