//! # reply-forge
//!
//! Turns a handful of settings (tone, relationship, format, reference URLs) into a
//! prompt, sends it to a Gemini model, prints the answer, and keeps a short local
//! history of past generations.
//!
//! ## Features
//! - `reply` and `ask` modes, each with its own prompt template
//! - Ranked model list with star ratings
//! - Bounded, newest-first history that can be listed, shown, deleted, or restored
//! - Direct Gemini API access, or a proxy server speaking the `/models` + `/generate` protocol

mod cli;
mod core;
mod run;

use clap::Parser;
use dotenv::dotenv;

use crate::cli::Args;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    if let Err(e) = run::dispatch(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
