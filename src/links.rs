pub mod auth {
    pub const BEARER_TOKEN: &'static str = "https://api.twitter.com/oauth2/token";
}

pub mod statuses {
    pub const SEARCH: &'static str = "https://api.twitter.com/1.1/search/tweets.json";
}

pub mod service {
    pub const RATE_LIMIT_STATUS: &'static str =
        "https://api.twitter.com/1.1/application/rate_limit_status.json";
}
