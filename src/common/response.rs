//! Infrastructure types related to packaging rate-limit information alongside responses from
//! Twitter.

use std::convert::TryFrom;
use std::ops::{Deref, DerefMut};

use hyper::client::HttpConnector;
use hyper::{Body, Request, Uri};
use hyper_proxy::{Intercept, Proxy, ProxyConnector};
use hyper_tls::HttpsConnector;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::common::Headers;
use crate::error::Error::{BadStatus, InvalidResponse, TwitterError};
use crate::error::{self, Result, TwitterErrors};

const X_RATE_LIMIT_LIMIT: &str = "x-rate-limit-limit";
const X_RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";
const X_RATE_LIMIT_RESET: &str = "x-rate-limit-reset";

/// Rate limit information for a Twitter method, as returned in a response's headers or in the
/// payload of `rate_limit_status`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimit {
    /// The rate limit ceiling for the given request.
    pub limit: i32,
    /// The number of requests left for the 15-minute window.
    pub remaining: i32,
    /// The UTC Unix timestamp at which the rate window resets.
    pub reset: i32,
}

impl TryFrom<&Headers> for RateLimit {
    type Error = error::Error;

    /// Reads the rate-limit headers out of the given set. A header that is not present is read
    /// as `-1`, since not every response carries them.
    fn try_from(headers: &Headers) -> Result<Self> {
        Ok(RateLimit {
            limit: rate_limit_header(headers, X_RATE_LIMIT_LIMIT)?,
            remaining: rate_limit_header(headers, X_RATE_LIMIT_REMAINING)?,
            reset: rate_limit_header(headers, X_RATE_LIMIT_RESET)?,
        })
    }
}

fn rate_limit_header(headers: &Headers, name: &'static str) -> Result<i32> {
    let value = match headers.get(name) {
        Some(value) => value,
        None => return Ok(-1),
    };

    value
        .to_str()
        .map_err(|_| InvalidResponse("rate limit header was not valid utf-8", None))?
        .parse()
        .map_err(|_| InvalidResponse("rate limit header was not an integer", None))
}

/// A helper struct to wrap response data with accompanying rate limit information.
///
/// This is returned by every method that calls out to Twitter. It derefs to the enclosed response
/// data, so for the most part you can treat it as the data itself and only reach for
/// `rate_limit_status` when you want to check your standing.
#[derive(Debug)]
pub struct Response<T> {
    /// The rate limit information returned with the response.
    pub rate_limit_status: RateLimit,
    /// The decoded response from the request.
    pub response: T,
}

impl<T> Response<T> {
    /// Convert a `Response<T>` to a `Response<U>` by running its contained response through the
    /// given function. This preserves the rate-limit information.
    pub fn map<F, U>(self, fun: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            rate_limit_status: self.rate_limit_status,
            response: fun(self.response),
        }
    }
}

impl<T> Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.response
    }
}

impl<T> DerefMut for Response<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.response
    }
}

/// Starts the given request, returning the in-flight response future.
///
/// When a proxy is given, the connection is made through it: HTTPS destinations are tunneled with
/// `CONNECT`, plain HTTP requests are forwarded whole. Without one, the request goes directly to
/// the destination over TLS.
pub(crate) fn get_response(
    mut request: Request<Body>,
    proxy: Option<&Uri>,
) -> Result<hyper::client::ResponseFuture> {
    let fut = if let Some(proxy) = proxy {
        let proxy = Proxy::new(Intercept::All, proxy.clone());
        let connector = ProxyConnector::from_proxy(HttpConnector::new(), proxy)?;
        if let Some(headers) = connector.http_headers(request.uri()) {
            request.headers_mut().extend(headers.clone().into_iter());
        }
        hyper::Client::builder().build(connector).request(request)
    } else {
        hyper::Client::builder()
            .build(HttpsConnector::new())
            .request(request)
    };
    Ok(fut)
}

/// Loads the given request, discovers any Twitter-reported errors in the result, and loads the
/// response body alongside the rate-limit headers.
pub(crate) async fn raw_request(
    request: Request<Body>,
    proxy: Option<&Uri>,
) -> Result<Response<Vec<u8>>> {
    let resp = get_response(request, proxy)?.await?;
    let (parts, body) = resp.into_parts();
    let body = hyper::body::to_bytes(body).await?;

    if let Ok(errors) = serde_json::from_slice::<TwitterErrors>(&body) {
        if errors.errors.iter().any(|e| e.code == 88)
            && parts.headers.contains_key(X_RATE_LIMIT_RESET)
        {
            let reset = rate_limit_header(&parts.headers, X_RATE_LIMIT_RESET)?;
            return Err(error::Error::RateLimit(reset));
        } else {
            return Err(TwitterError(parts.headers, errors));
        }
    }

    if !parts.status.is_success() {
        return Err(BadStatus(parts.status));
    }

    let rate_limit_status = RateLimit::try_from(&parts.headers)?;

    Ok(Response {
        rate_limit_status,
        response: body.to_vec(),
    })
}

/// Loads the given request and deserializes the response body as JSON into the target type.
pub(crate) async fn request_with_json_response<T: DeserializeOwned>(
    request: Request<Body>,
    proxy: Option<&Uri>,
) -> Result<Response<T>> {
    let full_resp = raw_request(request, proxy).await?;
    let out = serde_json::from_slice(&full_resp.response)?;

    Ok(Response {
        rate_limit_status: full_resp.rate_limit_status,
        response: out,
    })
}
