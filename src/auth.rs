// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Types and functions used to authenticate calls to Twitter.
//!
//! Everything in this crate calls Twitter with *app-only* authentication: the application's
//! consumer key and secret are exchanged once for a Bearer token, and that token authenticates
//! every call made with it. There is no user context, so only requests that make sense for an
//! application as a whole (like search) will work with it.
//!
//! To get started, obtain your consumer credentials from the [Twitter Developers site] and wrap
//! them in a [`KeyPair`]:
//!
//! [Twitter Developers site]: https://developer.twitter.com/
//!
//! ```rust
//! let con_token = tweetsweep::KeyPair::new("consumer key", "consumer secret");
//! ```
//!
//! Then perform the exchange with [`bearer_token`]. If your network setup requires outbound
//! requests to pass through an HTTP proxy, hand its URL to the same call; the resulting [`Token`]
//! remembers the route, and every request made with that token travels the same way.
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let con_token = tweetsweep::KeyPair::new("consumer key", "consumer secret");
//! let token = tweetsweep::bearer_token(&con_token, None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! A bearer token obtained this way does not expire on its own; treat it as a process-lifetime
//! credential and request a fresh one on the next run.

use hyper::{Method, Uri};
use serde::Deserialize;

use crate::common::*;
use crate::error::{Error, Result};
use crate::links;

pub(crate) mod raw;

use raw::RequestBuilder;

/// A key/secret pair representing an application's consumer credentials.
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// A key used to identify the application.
    pub key: CowStr,
    /// A secret used to validate the application.
    pub secret: CowStr,
}

impl KeyPair {
    /// Creates a `KeyPair` with the given key and secret.
    ///
    /// This can be called with either `&'static str` (a string literal) or `String` for either
    /// parameter.
    pub fn new(key: impl Into<CowStr>, secret: impl Into<CowStr>) -> KeyPair {
        KeyPair {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

/// A Bearer token, representing an application's authorization to call Twitter, alongside the
/// route its requests should take.
///
/// Created by [`bearer_token`]; see the [module documentation][mod] for details.
///
/// [mod]: crate::auth
#[derive(Debug, Clone)]
pub struct Token {
    pub(crate) bearer: String,
    pub(crate) proxy: Option<Uri>,
}

impl Token {
    /// The Bearer access token itself.
    pub fn bearer(&self) -> &str {
        &self.bearer
    }

    /// The proxy this token was obtained through, if any.
    ///
    /// Every request made with this token is routed through the same proxy the token exchange
    /// used.
    pub fn proxy(&self) -> Option<&Uri> {
        self.proxy.as_ref()
    }

    /// Formats this token as an `Authorization` header value.
    pub(crate) fn authorization(&self) -> String {
        format!("Bearer {}", self.bearer)
    }
}

#[derive(Deserialize)]
struct RawBearerToken {
    token_type: String,
    access_token: String,
}

/// With the given consumer `KeyPair`, request a Bearer token from Twitter to authenticate
/// app-only API calls, optionally routing the exchange (and everything made with the resulting
/// token) through the given HTTP proxy.
///
/// The exchange fails with [`Error::BadTokenType`] if the service grants anything other than a
/// `bearer` credential.
pub async fn bearer_token(con_token: &KeyPair, proxy: Option<Uri>) -> Result<Token> {
    bearer_token_at(links::auth::BEARER_TOKEN, con_token, proxy).await
}

pub(crate) async fn bearer_token_at(
    url: &str,
    con_token: &KeyPair,
    proxy: Option<Uri>,
) -> Result<Token> {
    let params = ParamList::new().add_param("grant_type", "client_credentials");

    let request = RequestBuilder::new(Method::POST, url)
        .with_body_params(&params)
        .request_consumer_bearer(con_token);

    let decoded: Response<RawBearerToken> =
        request_with_json_response(request, proxy.as_ref()).await?;
    let RawBearerToken {
        token_type,
        access_token,
    } = decoded.response;

    if token_type != "bearer" {
        return Err(Error::BadTokenType(token_type));
    }

    Ok(Token {
        bearer: access_token,
        proxy,
    })
}

#[cfg(test)]
mod tests {
    use hyper::{StatusCode, Uri};

    use crate::common::tests::TestServer;
    use crate::error::Error;

    use super::{bearer_token_at, KeyPair};

    #[tokio::test]
    async fn bearer_exchange() {
        let server = TestServer::serve(vec![(
            StatusCode::OK,
            r#"{"token_type":"bearer","access_token":"AAAA%2FAAA%3DAAAAAAAA"}"#.to_string(),
        )]);

        let con_token = KeyPair::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "L8qq9PZyRg6ieKGEKhZolGC0vJWLw8iEJ88DRdyOg",
        );
        let token = bearer_token_at(&server.url("/oauth2/token"), &con_token, None)
            .await
            .unwrap();

        assert_eq!(token.bearer(), "AAAA%2FAAA%3DAAAAAAAA");
        assert!(token.proxy().is_none());

        let recorded = server.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].method, "POST");
        assert_eq!(recorded[0].body, "grant_type=client_credentials");
        assert_eq!(
            recorded[0].authorization.as_deref(),
            Some("Basic eHZ6MWV2RlM0d0VFUFRHRUZQSEJvZzpMOHFxOVBaeVJnNmllS0dFS2hab2xHQzB2SldMdzhpRUo4OERSZHlPZw==")
        );
    }

    #[tokio::test]
    async fn bearer_exchange_rejects_wrong_grant() {
        let server = TestServer::serve(vec![(
            StatusCode::OK,
            r#"{"token_type":"mac","access_token":"AAAA"}"#.to_string(),
        )]);

        let con_token = KeyPair::new("key", "secret");
        let err = bearer_token_at(&server.url("/oauth2/token"), &con_token, None)
            .await
            .unwrap_err();

        match err {
            Error::BadTokenType(kind) => assert_eq!(kind, "mac"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn bearer_exchange_through_proxy() {
        // the server stands in for the proxy; the upstream host does not resolve, so the
        // exchange only succeeds if the request actually went through the proxy
        let proxy = TestServer::serve(vec![(
            StatusCode::OK,
            r#"{"token_type":"bearer","access_token":"AAAA"}"#.to_string(),
        )]);
        let proxy_url = proxy.url("").parse::<Uri>().unwrap();

        let con_token = KeyPair::new("key", "secret");
        let token = bearer_token_at(
            "http://token.invalid/oauth2/token",
            &con_token,
            Some(proxy_url),
        )
        .await
        .unwrap();

        assert_eq!(token.bearer(), "AAAA");
        assert!(token.proxy().is_some());

        let recorded = proxy.recorded();
        assert_eq!(recorded.len(), 1);
        // a proxied request names the full target in its request line
        assert_eq!(recorded[0].uri, "http://token.invalid/oauth2/token");
        assert_eq!(recorded[0].body, "grant_type=client_credentials");
        assert!(recorded[0]
            .authorization
            .as_deref()
            .map(|auth| auth.starts_with("Basic "))
            .unwrap_or(false));
    }
}
