mod core;
mod error;
mod models;
mod providers;
mod store;
mod traits;

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dotenv::dotenv;

use crate::core::runtime::Runtime;
use crate::models::Credentials;
use crate::providers::reddit::RedditClient;
use crate::store::SeenStore;

const SUBREDDIT: &str = "ucla";
const TRIGGER: &str = "!activitycheck";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let _ = dotenv();

    let credentials_file =
        env::var("CREDENTIALS_FILE").unwrap_or_else(|_| "credentials.json".to_string());
    let seen_file = env::var("SEEN_FILE").unwrap_or_else(|_| "seen.txt".to_string());

    let seen = SeenStore::load(&seen_file);
    println!("Loaded {} seen comments", seen.len());

    println!("Logging in...");
    let credentials = Credentials::load(&credentials_file)?;
    let mut reddit = RedditClient::new(credentials);
    reddit.login().await?;
    println!("Done");

    let mut runtime = Runtime::new(reddit, seen, SUBREDDIT, TRIGGER);

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nShutting down...");
            flag.store(true, Ordering::SeqCst);
        }
    });

    // The seen-set is flushed on both the clean and the error path; losing it
    // would mean duplicate replies after a restart.
    let result = runtime.run(shutdown).await;
    SeenStore::save(runtime.seen(), &seen_file)?;
    println!("Exiting...");
    result
}
