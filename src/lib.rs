// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A library (and the CLI built on it) for sweeping up tweets that match a keyword search.
//!
//! This crate signs in to Twitter with app-only authentication, runs a search, and walks the
//! result set page by page, handing every tweet to a callback along the way. It is the engine
//! behind the `tweetsweep` binary, but the pieces are exposed here so the same sweep can be
//! embedded elsewhere.
//!
//! # Getting started
//!
//! Wrap your application's consumer credentials in a [`KeyPair`] and exchange them for a Bearer
//! [`Token`]. Everything that talks to Twitter takes that token as its last argument. If your
//! network requires an HTTP proxy, give its URL to the exchange and the token will carry the
//! route with it; see the [`auth`] module docs for the full story.
//!
//! From there, [`search::collect`] is the whole show: it drives the pagination, calls your
//! delegate once per tweet, and tallies a [`search::CollectSummary`] to tell you what it saw.
//! For finer control, [`search::search`] exposes the underlying page-by-page interface.
//!
//! ```rust,no_run
//! use tweetsweep::search::{collect, CollectConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let con_token = tweetsweep::KeyPair::new("consumer key", "consumer secret");
//!     let token = tweetsweep::bearer_token(&con_token, None).await?;
//!
//!     let summary = collect("#rustlang", None, &CollectConfig::default(), &token, |tweet| {
//!         println!("{}", tweet.text);
//!     })
//!     .await;
//!
//!     println!("swept up {} tweets", summary.count);
//!     Ok(())
//! }
//! ```
//!
//! # Rate limits
//!
//! Every call that talks to Twitter returns a [`Response`] wrapping its output, with the
//! rate-limit headers from that call parsed into [`Response::rate_limit_status`]. To ask about
//! your standing before spending any of it, [`service::rate_limit_status`] reports how much of
//! the search budget is left in the current window.

mod common;
mod links;

pub mod auth;
pub mod error;
pub mod search;
pub mod service;
pub mod tweet;

pub use crate::auth::{bearer_token, KeyPair, Token};
pub use crate::common::{RateLimit, Response};
