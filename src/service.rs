//! Methods to inquire about the Twitter service itself.

use std::collections::HashMap;

use serde::Deserialize;

use crate::auth::Token;
use crate::common::*;
use crate::error::{Error, Result};
use crate::links;

/// Return the current rate-limit standing of the search endpoint.
///
/// Twitter reports standings for every method the credential can call; this narrows the answer
/// down to `GET search/tweets`, the one method this crate spends its budget on. The full payload
/// not carrying that entry is reported as [`Error::MissingValue`].
pub async fn rate_limit_status(token: &Token) -> Result<Response<RateLimitStatus>> {
    rate_limit_status_at(links::service::RATE_LIMIT_STATUS, token).await
}

pub(crate) async fn rate_limit_status_at(
    url: &str,
    token: &Token,
) -> Result<Response<RateLimitStatus>> {
    let req = get(url, token, None);
    let resp: Response<RawRateLimitStatus> = request_with_json_response(req, token.proxy()).await?;

    let rate_limit_status = resp.rate_limit_status;
    let mut search = resp.response.resources.search;
    let search_tweets = search
        .remove("/search/tweets")
        .ok_or(Error::MissingValue("/search/tweets"))?;

    Ok(Response {
        rate_limit_status,
        response: RateLimitStatus { search_tweets },
    })
}

/// The rate-limit standing of the search API, as reported by [`rate_limit_status`].
#[derive(Debug, Clone, Copy)]
pub struct RateLimitStatus {
    /// The standing of `GET search/tweets`, the method behind the `search` module.
    pub search_tweets: RateLimit,
}

#[derive(Debug, Deserialize)]
struct RawRateLimitStatus {
    resources: RawResources,
}

#[derive(Debug, Deserialize)]
struct RawResources {
    #[serde(default)]
    search: HashMap<String, RateLimit>,
}

#[cfg(test)]
mod tests {
    use hyper::StatusCode;

    use crate::auth::Token;
    use crate::common::tests::TestServer;
    use crate::error::Error;

    use super::rate_limit_status_at;

    fn test_token() -> Token {
        Token {
            bearer: "12345".into(),
            proxy: None,
        }
    }

    #[tokio::test]
    async fn search_standing() {
        let server = TestServer::serve(vec![(
            StatusCode::OK,
            r#"{
                "rate_limit_context": {"application": "abcdef"},
                "resources": {
                    "search": {
                        "/search/tweets": {"limit": 450, "remaining": 420, "reset": 1403602426}
                    },
                    "help": {
                        "/help/privacy": {"limit": 15, "remaining": 15, "reset": 1403602426}
                    }
                }
            }"#
            .to_string(),
        )]);

        let status = rate_limit_status_at(
            &server.url("/1.1/application/rate_limit_status.json"),
            &test_token(),
        )
        .await
        .unwrap();

        assert_eq!(status.search_tweets.limit, 450);
        assert_eq!(status.search_tweets.remaining, 420);
        assert_eq!(status.search_tweets.reset, 1403602426);

        let recorded = server.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].method, "GET");
        assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer 12345"));
    }

    #[tokio::test]
    async fn search_standing_missing() {
        let server = TestServer::serve(vec![(
            StatusCode::OK,
            r#"{"rate_limit_context": {"application": "abcdef"}, "resources": {"search": {}}}"#
                .to_string(),
        )]);

        let err = rate_limit_status_at(
            &server.url("/1.1/application/rate_limit_status.json"),
            &test_token(),
        )
        .await
        .unwrap_err();

        match err {
            Error::MissingValue(value) => assert_eq!(value, "/search/tweets"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
