// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and methods for searching for tweets, and for sweeping a whole result set page by
//! page.
//!
//! Since there are several optional parameters for searches, this is handled with a builder
//! pattern. To begin, call `search` with your requested search term. Additional parameters can be
//! added onto the `SearchBuilder` struct that is returned. When you're ready to load the first
//! page of results, hand your token to `call`.
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let con_token = tweetsweep::KeyPair::new("", "");
//! # let token = tweetsweep::bearer_token(&con_token, None).await?;
//! use tweetsweep::search::{self, ResultType};
//!
//! let search = search::search("rustlang")
//!     .result_type(ResultType::Recent)
//!     .call(&token)
//!     .await?;
//!
//! for tweet in &search.statuses {
//!     println!("{}", tweet.text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Once you have your `SearchResult`, you can navigate the search results by calling `older` and
//! `newer` to get the next and previous pages, respectively. In addition, you can see your
//! original query in the search result struct as well, so you can categorize multiple searches by
//! their query. While this is given as a regular field, note that modifying `query` will not
//! change what is searched for when you call `older` or `newer`; the `SearchResult` keeps its
//! search arguments in a separate private field.
//!
//! When you want the whole result set rather than one page, [`collect`] drives the pagination for
//! you: it walks `older` pages until the results run out (or a page cap is hit), hands every
//! tweet to a callback, and tallies what it saw. A page that fails to load ends the sweep with
//! whatever was gathered up to that point rather than returning an error.
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let con_token = tweetsweep::KeyPair::new("", "");
//! # let token = tweetsweep::bearer_token(&con_token, None).await?;
//! use tweetsweep::search::{collect, CollectConfig};
//!
//! let summary = collect("rustlang", None, &CollectConfig::default(), &token, |tweet| {
//!     println!("{}", tweet.text);
//! })
//! .await;
//!
//! println!("swept {} tweets", summary.count);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use log::{debug, error};
use serde::Deserialize;

use crate::auth::Token;
use crate::common::*;
use crate::error::{Error, Result};
use crate::links;
use crate::tweet::Tweet;

/// Begin setting up a tweet search with the given query.
pub fn search(query: impl Into<CowStr>) -> SearchBuilder {
    SearchBuilder {
        query: query.into(),
        lang: None,
        result_type: None,
        count: None,
        since_id: None,
        max_id: None,
        url: links::statuses::SEARCH.into(),
    }
}

/// Represents what kind of tweets should be included in search results.
#[derive(Debug, Copy, Clone)]
pub enum ResultType {
    /// Return only the most recent tweets in the response.
    Recent,
    /// Return only the most popular tweets in the response.
    Popular,
    /// Include both popular and real-time results in the response.
    Mixed,
}

/// Display impl that turns the variants into strings that can be used as search parameters.
impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ResultType::Recent => write!(f, "recent"),
            ResultType::Popular => write!(f, "popular"),
            ResultType::Mixed => write!(f, "mixed"),
        }
    }
}

/// Represents a tweet search query before being sent.
#[must_use = "SearchBuilder is lazy and won't do anything unless `call`ed"]
pub struct SearchBuilder {
    /// The text to search for.
    query: CowStr,
    lang: Option<CowStr>,
    result_type: Option<ResultType>,
    count: Option<u32>,
    since_id: Option<u64>,
    max_id: Option<u64>,
    url: CowStr,
}

impl SearchBuilder {
    /// Restrict search results to those that have been machine-parsed as the given two-letter
    /// language code.
    pub fn lang(self, lang: impl Into<CowStr>) -> Self {
        SearchBuilder {
            lang: Some(lang.into()),
            ..self
        }
    }

    /// Specify the type of search results to include. The default is `Recent`.
    pub fn result_type(self, result_type: ResultType) -> Self {
        SearchBuilder {
            result_type: Some(result_type),
            ..self
        }
    }

    /// Set the number of tweets to return per-page, up to a maximum of 100. The default is 15.
    pub fn count(self, count: u32) -> Self {
        SearchBuilder {
            count: Some(count),
            ..self
        }
    }

    /// Restricts results to those with higher IDs than (i.e. that were posted after) the given
    /// tweet ID. This floor sticks to the search: pages loaded through `older` keep it, so a
    /// bounded search stays bounded.
    pub fn since_tweet(self, since_id: u64) -> Self {
        SearchBuilder {
            since_id: Some(since_id),
            ..self
        }
    }

    /// Restricts results to those with IDs no higher than (i.e. were posted earlier than) the
    /// given tweet ID. Will include the given tweet in search results.
    pub fn max_tweet(self, max_id: u64) -> Self {
        SearchBuilder {
            max_id: Some(max_id),
            ..self
        }
    }

    /// Send the search to somewhere other than the standard search endpoint.
    pub(crate) fn url(self, url: impl Into<CowStr>) -> Self {
        SearchBuilder {
            url: url.into(),
            ..self
        }
    }

    /// Finalize the search terms and return the first page of results.
    pub async fn call(self, token: &Token) -> Result<Response<SearchResult>> {
        let params = ParamList::new()
            .add_param("q", self.query)
            .add_opt_param("lang", self.lang)
            .add_opt_param("result_type", self.result_type.map_string())
            .add_opt_param("count", self.count.map_string())
            .add_opt_param("since_id", self.since_id.map_string())
            .add_opt_param("max_id", self.max_id.map_string());

        request_page(self.url, params, token).await
    }
}

#[derive(Debug, Deserialize)]
struct RawSearchResult {
    statuses: Vec<Tweet>,
    search_metadata: RawSearchMetadata,
}

#[derive(Debug, Deserialize)]
struct RawSearchMetadata {
    query: String,
    max_id: u64,
    since_id: u64,
}

/// Send one page request, reattaching the parameters to the result so `older`/`newer` can derive
/// their next request from them.
async fn request_page(
    url: CowStr,
    params: ParamList,
    token: &Token,
) -> Result<Response<SearchResult>> {
    let req = get(&url, token, Some(&params));
    let resp: Response<RawSearchResult> = request_with_json_response(req, token.proxy()).await?;

    Ok(resp.map(|raw| SearchResult {
        statuses: raw.statuses,
        query: raw.search_metadata.query,
        max_id: raw.search_metadata.max_id,
        since_id: raw.search_metadata.since_id,
        url,
        params: Some(params),
    }))
}

/// Represents a page of search results, along with metadata to request the next or previous page.
#[derive(Debug)]
pub struct SearchResult {
    /// The list of statuses in this page of results.
    pub statuses: Vec<Tweet>,
    /// The query used to generate this page of results. Note that changing this will not affect
    /// the `older` and `newer` methods.
    pub query: String,
    /// Last tweet id in this page of results, as reported in the page's metadata.
    pub max_id: u64,
    /// First tweet id in this page of results, as reported in the page's metadata.
    pub since_id: u64,
    url: CowStr,
    params: Option<ParamList>,
}

impl SearchResult {
    /// Load the next (older) page of search results for the same query.
    ///
    /// The page is requested by capping `max_id` at one less than the lowest id on this page. Any
    /// `since_id` floor given to the original search is carried along unchanged.
    pub async fn older(&self, token: &Token) -> Result<Response<SearchResult>> {
        let mut params = self.params.as_ref().cloned().unwrap_or_default();

        if let Some(min_id) = self.statuses.iter().map(|t| t.id).min() {
            params.add_param_ref("max_id", (min_id - 1).to_string());
        } else {
            params.remove("max_id");
        }

        request_page(self.url.clone(), params, token).await
    }

    /// Load the previous (newer) page of search results for the same query.
    ///
    /// The page is requested by raising the `since_id` floor to the highest id on this page and
    /// dropping any `max_id` cap.
    pub async fn newer(&self, token: &Token) -> Result<Response<SearchResult>> {
        let mut params = self.params.as_ref().cloned().unwrap_or_default();
        params.remove("max_id");

        if let Some(max_id) = self.statuses.iter().map(|t| t.id).max() {
            params.add_param_ref("since_id", max_id.to_string());
        } else {
            params.remove("since_id");
        }

        request_page(self.url.clone(), params, token).await
    }
}

/// Configuration for a [`collect`] run.
///
/// The `Default` impl matches the service defaults the CLI uses: pages of 100 recent
/// Japanese-language results, with no cap on the number of pages.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    /// The number of tweets to request per page, up to the service maximum of 100.
    pub page_size: u32,
    /// The maximum number of pages to retrieve. `0` keeps going until the results run out.
    pub page_limit: u32,
    /// Restrict results to the given two-letter language code, if set.
    pub lang: Option<CowStr>,
    /// The kind of results to ask for.
    pub result_type: ResultType,
    pub(crate) url: CowStr,
}

impl Default for CollectConfig {
    fn default() -> Self {
        CollectConfig {
            page_size: 100,
            page_limit: 0,
            lang: Some("ja".into()),
            result_type: ResultType::Recent,
            url: links::statuses::SEARCH.into(),
        }
    }
}

/// The outcome of a [`collect`] run.
///
/// `min_id` is taken from the first tweet the sweep saw and `max_id` from the last one. Since
/// searches deliver recent results newest first, that makes `min_id` the newest id of the run and
/// `max_id` the oldest; both are `0` when nothing arrived. `min_id` is the id to hand to the next
/// run as its `since_id` floor to pick up where this one left off.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollectSummary {
    /// How many tweets were handed to the delegate.
    pub count: u64,
    /// The id of the first tweet seen, or `0` if none arrived.
    pub min_id: u64,
    /// The id of the last tweet seen, or `0` if none arrived.
    pub max_id: u64,
}

/// Search for `query` and walk the results page by page, handing every tweet to `delegate` as it
/// arrives.
///
/// `since_id`, when given, is an exclusive floor that every page request carries, so the sweep
/// never reaches back past it. The sweep ends when a page comes back empty, or after
/// `config.page_limit` pages when that is nonzero.
///
/// A page that fails to load does not end the program: the failure is logged and the summary of
/// everything already delivered is returned as a partial result.
pub async fn collect<F>(
    query: impl Into<CowStr>,
    since_id: Option<u64>,
    config: &CollectConfig,
    token: &Token,
    mut delegate: F,
) -> CollectSummary
where
    F: FnMut(&Tweet),
{
    let mut summary = CollectSummary::default();

    let mut builder = search(query)
        .result_type(config.result_type)
        .count(config.page_size)
        .url(config.url.clone());
    if let Some(ref lang) = config.lang {
        builder = builder.lang(lang.clone());
    }
    if let Some(since_id) = since_id {
        builder = builder.since_tweet(since_id);
    }

    let mut page = match builder.call(token).await {
        Ok(page) => page,
        Err(err) => {
            log_abort(&err);
            return summary;
        }
    };

    let mut pages = 0u32;
    loop {
        if page.statuses.is_empty() {
            break;
        }

        for tweet in &page.statuses {
            delegate(tweet);
            summary.count += 1;
            summary.max_id = tweet.id;
            if summary.min_id == 0 {
                summary.min_id = tweet.id;
            }
        }

        pages += 1;
        debug!("page {}: {} tweets", pages, page.statuses.len());

        if config.page_limit != 0 && pages >= config.page_limit {
            break;
        }

        page = match page.older(token).await {
            Ok(next) => next,
            Err(err) => {
                log_abort(&err);
                break;
            }
        };
    }

    summary
}

/// Log a page fetch failure that ended a sweep early.
fn log_abort(err: &Error) {
    match err {
        Error::NetError(err) => error!("network failure while reading search results: {}", err),
        err => error!("search request failed: {}", err),
    }
}
