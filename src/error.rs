//! A composite error type for errors that can occur while interacting with Twitter.

use std::fmt;

use serde::Deserialize;

use crate::common::Headers;

/// Convenience type mapping the `Result` type to the error type of this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A set of errors that can occur when interacting with Twitter.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The response from Twitter was formatted incorrectly or in an unexpected manner. The
    /// enclosed values are an explanatory string and, if applicable, the input that caused the
    /// error.
    #[error("Invalid response received: {0} ({1:?})")]
    InvalidResponse(&'static str, Option<String>),
    /// The response from Twitter was missing an expected value. The enclosed value was the
    /// expected parameter.
    #[error("Value missing from response: {0}")]
    MissingValue(&'static str),
    /// The OAuth2 token endpoint answered the credentials exchange with a grant of the wrong
    /// type. The enclosed value is the `token_type` it reported instead of `bearer`.
    #[error("Expected token_type \"bearer\", got {0:?}")]
    BadTokenType(String),
    /// The response from Twitter returned an error structure instead of the expected response.
    /// The enclosed values were the headers and the error structure from Twitter.
    #[error("Errors returned by Twitter: {1}")]
    TwitterError(Headers, TwitterErrors),
    /// The response returned from Twitter contained an error indicating that the rate limit for
    /// that method has been reached. The enclosed value is the Unix timestamp in UTC when the
    /// next rate-limit window will open.
    #[error("Rate limit reached, hold until {0}")]
    RateLimit(i32),
    /// The response from Twitter gave a response code that indicated an error. The enclosed
    /// value was the response code.
    ///
    /// This is only returned if Twitter did not also return an error code in the response body.
    /// That check is performed before examining the status code.
    #[error("Error status received: {0}")]
    BadStatus(hyper::StatusCode),
    /// The web request experienced an error. The enclosed error was returned from hyper.
    #[error("Network error: {0}")]
    NetError(#[from] hyper::Error),
    /// An error was experienced while processing the response stream. The enclosed error was
    /// returned from `std::io`.
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    /// An error occurred while loading the JSON response. The enclosed error was returned from
    /// `serde_json`.
    #[error("JSON deserialize error: {0}")]
    DeserializeError(#[from] serde_json::Error),
}

/// Represents a collection of errors returned from a Twitter API call.
///
/// This is returned as part of [`Error::TwitterError`] whenever Twitter has rejected a call.
#[derive(Debug, Deserialize)]
pub struct TwitterErrors {
    /// A collection of errors returned by Twitter.
    pub errors: Vec<TwitterErrorCode>,
}

impl fmt::Display for TwitterErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;

        for e in &self.errors {
            if !first {
                writeln!(f, ",")?;
            }

            write!(f, "{}", e)?;
            first = false;
        }

        Ok(())
    }
}

/// Represents a specific error returned from a Twitter API call.
#[derive(Debug, Deserialize)]
pub struct TwitterErrorCode {
    /// The error message returned by Twitter.
    pub message: String,
    /// A numeric error code returned by Twitter. A list of possible error codes can be found in
    /// the [API documentation](https://developer.twitter.com/en/docs/basics/response-codes).
    pub code: i32,
}

impl fmt::Display for TwitterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}: {}", self.code, self.message)
    }
}
