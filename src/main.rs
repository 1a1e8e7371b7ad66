use std::error::Error;
use std::fs::File;
use std::io::BufReader;

use env_logger::{Builder, Env, Target};
use log::info;
use serde::Deserialize;
use structopt::StructOpt;

use tweetsweep::search::{collect, CollectConfig};
use tweetsweep::tweet::Tweet;
use tweetsweep::{service, KeyPair};

/// Consumer credentials are read from this file in the working directory.
const AUTH_FILE: &str = "twitter_auth.json";

#[derive(StructOpt)]
#[structopt(about = "Search Twitter for a keyword and print every matching tweet")]
struct Args {
    /// Keyword to search for
    keyword: String,
    /// Only retrieve tweets with ids above this floor
    #[structopt(short = "s", long = "since-id")]
    since_id: Option<u64>,
}

#[derive(Deserialize)]
struct AuthFile {
    #[serde(rename = "CONSUMER_KEY")]
    consumer_key: String,
    #[serde(rename = "CONSUMER_SECRET")]
    consumer_secret: String,
}

fn write_tweet(tweet: &Tweet) {
    println!("{}", tweet.text);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // the report lines interleave with the tweets themselves, so everything goes to stdout
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let args = Args::from_args();

    let auth: AuthFile = serde_json::from_reader(BufReader::new(File::open(AUTH_FILE)?))?;
    let con_token = KeyPair::new(auth.consumer_key, auth.consumer_secret);

    let proxy = match std::env::var("http_proxy") {
        Ok(proxy) if !proxy.is_empty() => Some(proxy.parse::<hyper::Uri>()?),
        _ => None,
    };
    if let Some(ref proxy) = proxy {
        info!("routing requests through {}", proxy);
    }

    let token = tweetsweep::bearer_token(&con_token, proxy).await?;

    let status = service::rate_limit_status(&token).await?;
    info!(
        "twitter search api limit: {}, remaining: {}",
        status.search_tweets.limit, status.search_tweets.remaining
    );
    info!("--------------------------------------------------");

    let summary = collect(
        args.keyword,
        args.since_id,
        &CollectConfig::default(),
        &token,
        write_tweet,
    )
    .await;

    info!("--------------------------------------------------");
    info!("total tweets: {}", summary.count);
    info!("min_id: {}, max_id: {}", summary.min_id, summary.max_id);
    info!("--------------------------------------------------");

    Ok(())
}
