// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and functions for working with statuses.
//!
//! A "status", or more casually a "tweet", is a single post on Twitter. This module carries the
//! slice of a status that the search loop hands to its callers: the service returns much larger
//! records, and everything not listed on [`Tweet`] is left unparsed.

use chrono;
use serde::Deserialize;

use crate::common::*;

/// Represents a single status update.
#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    /// Numeric ID for this tweet. IDs are assigned by the service in increasing order, so they
    /// double as a rough chronology.
    pub id: u64,
    /// UTC timestamp from when the tweet was posted.
    #[serde(deserialize_with = "deserialize_datetime")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// The text of the tweet.
    pub text: String,
    /// Can contain a language ID indicating the machine-detected language of the text, or "und"
    /// if no language could be detected.
    pub lang: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike, Weekday};

    use super::Tweet;

    const SAMPLE: &str = r#"{
        "created_at": "Sat Oct 01 22:40:30 +0000 2016",
        "id": 782349500404862976,
        "id_str": "782349500404862976",
        "text": "rustlang is pretty sweet",
        "lang": "en",
        "truncated": false,
        "retweet_count": 2,
        "favorite_count": 5
    }"#;

    #[test]
    fn parse_tweet() {
        let sample: Tweet = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(sample.id, 782349500404862976);
        assert_eq!(sample.text, "rustlang is pretty sweet");
        assert_eq!(sample.lang.as_deref(), Some("en"));

        assert_eq!(sample.created_at.weekday(), Weekday::Sat);
        assert_eq!(sample.created_at.year(), 2016);
        assert_eq!(sample.created_at.month(), 10);
        assert_eq!(sample.created_at.day(), 1);
        assert_eq!(sample.created_at.hour(), 22);
        assert_eq!(sample.created_at.minute(), 40);
        assert_eq!(sample.created_at.second(), 30);
    }
}
