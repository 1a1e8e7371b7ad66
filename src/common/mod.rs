// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Set of structs and methods that act as a sort of internal prelude.
//!
//! The elements available in this module and its children are fairly basic building blocks that
//! the other modules all glob-import to make available as a common language. A lot of
//! infrastructure code goes in here.
//!
//! # Module contents
//!
//! ## Type Aliases
//!
//! These types are used commonly enough in the library that they're re-exported here for easy use.
//!
//! * `hyper::headers::HeaderMap<hyper::headers::HeaderValue>` (re-exported as the alias `Headers`)
//! * `Cow<'static, str>` (re-exported as the alias `CowStr`)
//!
//! ## `ParamList`
//!
//! `ParamList` is a collection of parameters to a given web call. It's consumed in the auth
//! module, and provides some easy wrappers to consistently handle some types.
//!
//! ## Miscellaneous functions
//!
//! `deserialize_datetime` is a glue function to read a timestamp out in a `Deserialize`
//! implementation. Twitter always gives timestamps in the same format, so having that function
//! here saves us from having to write the format out everywhere.
//!
//! `percent_encode` encodes a string the specific way Twitter expects its parameters encoded.
//!
//! ## Authentication functions
//!
//! The function `get` is re-exported here to keep the API modules from having to qualify it from
//! `auth::raw`.
//!
//! ## `Response`
//!
//! Also in its own module, `Response` is a public structure that contains rate-limit information
//! from Twitter, alongside some other desired output. The module also contains the types and
//! functions that all web calls go through: the ones that load a web call, parse out the
//! rate-limit headers, and deserialize the result.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{self, TimeZone};
use hyper::header::{HeaderMap, HeaderValue};
use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode};
use serde::de::Error;
use serde::{Deserialize, Deserializer};

mod response;

pub(crate) use crate::auth::raw::get;

pub use crate::common::response::*;

/// A set of headers returned with a response.
pub type Headers = HeaderMap<HeaderValue>;
pub type CowStr = Cow<'static, str>;

/// Represents a list of parameters to a Twitter API call.
///
/// This type is a wrapper around a `HashMap<Cow<'static, str>, Cow<'static, str>>` to collect a
/// set of parameter key/value pairs. These are then used to assemble a Twitter API request. The
/// `Cow` type is used to avoid having to allocate a `String` if a string literal is used for a
/// parameter. All the functions that add parameters to this `ParamList` accept `impl Into<Cow<
/// 'static, str>>`, meaning that either a string literal or an owned `String` may be used.
///
/// Most of the functions to add parameters follow a builder pattern, so that you can assemble a
/// `ParamList` in a single statement.
#[derive(Debug, Clone, Default, derive_more::Deref, derive_more::DerefMut, derive_more::From)]
pub struct ParamList(HashMap<Cow<'static, str>, Cow<'static, str>>);

impl ParamList {
    /// Creates a new, empty `ParamList`.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Adds the given key/value parameter to this `ParamList`.
    pub fn add_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    /// Adds the given key/value parameter to this `ParamList` only if the given value is `Some`.
    ///
    /// This can be a convenient wrapper to use in case you may or may not want to include
    /// something based on some condition. If the given value is `None`, then the `ParamList` is
    /// returned unmodified.
    pub fn add_opt_param(
        self,
        key: impl Into<Cow<'static, str>>,
        value: Option<impl Into<Cow<'static, str>>>,
    ) -> Self {
        match value {
            Some(val) => self.add_param(key.into(), val.into()),
            None => self,
        }
    }

    /// Adds the given key/value to this `ParamList` by mutating it in place, rather than consuming
    /// it as in `add_param`.
    pub fn add_param_ref(
        &mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) {
        self.0.insert(key.into(), value.into());
    }

    /// Renders this `ParamList` as an `application/x-www-form-urlencoded` string.
    ///
    /// The key/value pairs are printed as `key1=value1&key2=value2`, with all keys and values
    /// being percent-encoded according to Twitter's requirements.
    pub fn to_urlencoded(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

// Helper trait to stringify the contents of an Option
pub(crate) trait MapString {
    fn map_string(&self) -> Option<String>;
}

impl<T: std::fmt::Display> MapString for Option<T> {
    fn map_string(&self) -> Option<String> {
        self.as_ref().map(|v| v.to_string())
    }
}

pub fn deserialize_datetime<'de, D>(ser: D) -> Result<chrono::DateTime<chrono::Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(ser)?;
    let date = (chrono::Utc)
        .datetime_from_str(&s, "%a %b %d %T %z %Y")
        .map_err(|e| D::Error::custom(e))?;
    Ok(date)
}

/// Percent-encodes the given string based on the Twitter API specification.
///
/// Twitter bases its encoding scheme on RFC 3986, Section 2.1. They describe the process in full
/// [in their documentation][twitter-percent], but the process can be summarized by saying that
/// every *byte* that is not an ASCII number or letter, or the ASCII characters `-`, `.`, `_`, or
/// `~` must be replaced with a percent sign (`%`) and the byte value in hexadecimal.
///
/// [twitter-percent]: https://developer.twitter.com/en/docs/basics/authentication/oauth-1-0a/percent-encoding-parameters
///
/// When this function was originally implemented, the `percent_encoding` crate did not have an
/// encoding set that matched this, so it was recreated here.
pub fn percent_encode(src: &str) -> PercentEncode {
    lazy_static::lazy_static! {
        static ref ENCODER: AsciiSet = percent_encoding::NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');
    }
    utf8_percent_encode(src, &*ENCODER)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use hyper::service::{make_service_fn, service_fn};
    use hyper::{Body, Request, Server, StatusCode};

    use super::*;

    /// One request as observed by a [`TestServer`].
    #[derive(Debug, Clone)]
    pub(crate) struct Recorded {
        pub(crate) method: String,
        pub(crate) uri: String,
        pub(crate) authorization: Option<String>,
        pub(crate) body: String,
    }

    impl Recorded {
        /// The decoded key/value pairs of this request's query string.
        pub(crate) fn query(&self) -> HashMap<String, String> {
            let query = self.uri.splitn(2, '?').nth(1).unwrap_or("");
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect()
        }
    }

    /// An in-process HTTP server that answers requests with a canned sequence of responses,
    /// recording each request it sees along the way.
    ///
    /// Responses are served in order; once the sequence runs dry, further requests are answered
    /// with `410 Gone` and an empty body. Every response carries the `x-rate-limit-*` headers
    /// the live service sends with each call.
    pub(crate) struct TestServer {
        pub(crate) addr: SocketAddr,
        requests: Arc<Mutex<Vec<Recorded>>>,
    }

    impl TestServer {
        pub(crate) fn serve(pages: Vec<(StatusCode, String)>) -> TestServer {
            let requests: Arc<Mutex<Vec<Recorded>>> = Arc::new(Mutex::new(Vec::new()));
            let remaining = Arc::new(Mutex::new(pages.into_iter()));
            let log = Arc::clone(&requests);

            let make_svc = make_service_fn(move |_| {
                let remaining = Arc::clone(&remaining);
                let log = Arc::clone(&log);
                async move {
                    Ok::<_, hyper::Error>(service_fn(move |req: Request<Body>| {
                        let remaining = Arc::clone(&remaining);
                        let log = Arc::clone(&log);
                        async move {
                            let method = req.method().to_string();
                            let uri = req.uri().to_string();
                            let authorization = req
                                .headers()
                                .get(hyper::header::AUTHORIZATION)
                                .and_then(|v| v.to_str().ok())
                                .map(|v| v.to_string());
                            let body = hyper::body::to_bytes(req.into_body()).await?;
                            log.lock().unwrap().push(Recorded {
                                method,
                                uri,
                                authorization,
                                body: String::from_utf8_lossy(&body).into_owned(),
                            });

                            let (status, payload) = remaining
                                .lock()
                                .unwrap()
                                .next()
                                .unwrap_or((StatusCode::GONE, String::new()));
                            Ok::<_, hyper::Error>(
                                hyper::Response::builder()
                                    .status(status)
                                    .header("content-type", "application/json; charset=utf-8")
                                    .header("x-rate-limit-limit", "450")
                                    .header("x-rate-limit-remaining", "441")
                                    .header("x-rate-limit-reset", "1403602426")
                                    .body(Body::from(payload))
                                    .unwrap(),
                            )
                        }
                    }))
                }
            });

            let server = Server::bind(&([127, 0, 0, 1], 0).into()).serve(make_svc);
            let addr = server.local_addr();
            tokio::spawn(server);

            TestServer { addr, requests }
        }

        /// A URL pointing at this server with the given path attached.
        pub(crate) fn url(&self, path: &str) -> String {
            format!("http://{}{}", self.addr, path)
        }

        pub(crate) fn recorded(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[test]
    fn encode_reserved_characters() {
        assert_eq!(
            percent_encode("Ladies + Gentlemen").to_string(),
            "Ladies%20%2B%20Gentlemen"
        );
        assert_eq!(
            percent_encode("An encoded string!").to_string(),
            "An%20encoded%20string%21"
        );
        assert_eq!(percent_encode("Dogs, Cats & Mice").to_string(), "Dogs%2C%20Cats%20%26%20Mice");
        assert_eq!(percent_encode("☃").to_string(), "%E2%98%83");
    }

    #[test]
    fn urlencoded_params() {
        let params = ParamList::new()
            .add_param("q", "雪だるま")
            .add_param("count", "100")
            .add_opt_param("since_id", None::<String>);

        let rendered = params.to_urlencoded();
        let decoded: HashMap<String, String> = url::form_urlencoded::parse(rendered.as_bytes())
            .into_owned()
            .collect();

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded["q"], "雪だるま");
        assert_eq!(decoded["count"], "100");
    }
}
