// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Internal mechanisms for the `auth` module.

use base64;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body, Method, Request};

use crate::common::*;

use super::{KeyPair, Token};

pub struct RequestBuilder<'a> {
    base_uri: &'a str,
    method: Method,
    query: Option<String>,
    body: Option<(Body, &'static str)>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(method: Method, base_uri: &'a str) -> Self {
        RequestBuilder {
            base_uri,
            method,
            query: None,
            body: None,
        }
    }

    pub fn with_query_params(self, params: &ParamList) -> Self {
        RequestBuilder {
            query: Some(params.to_urlencoded()),
            ..self
        }
    }

    pub fn with_body_params(self, params: &ParamList) -> Self {
        RequestBuilder {
            body: Some((
                Body::from(params.to_urlencoded()),
                "application/x-www-form-urlencoded",
            )),
            ..self
        }
    }

    pub fn request_token(self, token: &Token) -> Request<Body> {
        self.request_authorization(token.authorization())
    }

    pub fn request_consumer_bearer(self, consumer_key: &KeyPair) -> Request<Body> {
        self.request_authorization(bearer_request(consumer_key))
    }

    fn request_authorization(self, authorization: String) -> Request<Body> {
        let full_url = if let Some(query) = self.query {
            format!("{}?{}", self.base_uri, query)
        } else {
            self.base_uri.to_string()
        };
        let request = Request::builder()
            .method(self.method)
            .uri(full_url)
            .header(AUTHORIZATION, authorization);

        if let Some((body, content)) = self.body {
            request.header(CONTENT_TYPE, content).body(body).unwrap()
        } else {
            request.body(Body::empty()).unwrap()
        }
    }
}

/// Creates a basic `Authorization` header based on the given consumer token.
///
/// The authorization created by this function can only be used with requests to generate or
/// invalidate a bearer token. Using this authorization with any other endpoint will result in an
/// invalid request.
fn bearer_request(con_token: &KeyPair) -> String {
    let text = format!("{}:{}", con_token.key, con_token.secret);
    format!("Basic {}", base64::encode(&text))
}

// n.b. this function is re-exported in the `common` module for the API modules to use
/// Assemble a GET request to the given URL with the given parameters, authorized with the given
/// bearer token.
///
/// The given parameters, if present, will be appended to the given `uri` as a percent-encoded
/// query string.
pub(crate) fn get(uri: &str, token: &Token, params: Option<&ParamList>) -> Request<Body> {
    let mut request = RequestBuilder::new(Method::GET, uri);
    if let Some(params) = params {
        request = request.with_query_params(params);
    }
    request.request_token(token)
}
