use anyhow::Context;
use clap::Parser;
use kotoba_config::Config;
use kotoba_engine::Lookup;
use kotoba_lang_japanese::{JapaneseNormalizer, preprocess};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[command(name = "kotoba", version, about = "Offline-cached Japanese dictionary lookup")]
struct Args {
    /// Look up a single selection and exit; omit for an interactive session
    query: Option<String>,

    /// Override the dataset source URL
    #[arg(long)]
    dataset_url: Option<String>,

    /// Skip the persistent dataset cache for this run
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    let mut config = Config::new();
    if let Some(url) = args.dataset_url {
        config.network.dataset_url = url;
    }
    if args.no_cache {
        config.cache.enabled = false;
    }

    let lookup = Lookup::new(&config);

    tracing::info!(url = %config.network.dataset_url, "initializing dictionary");
    lookup
        .ensure_ready()
        .await
        .context("dictionary initialization failed")?;

    let normalizer = match JapaneseNormalizer::new() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!(error = %e, "tokenizer unavailable, using raw selections");
            None
        }
    };

    match args.query {
        Some(selection) => run_query(&lookup, normalizer.as_ref(), &selection).await,
        None => repl(&lookup, normalizer.as_ref()).await,
    }
}

/// Read selections from stdin until EOF or Ctrl+C
async fn repl(lookup: &Lookup, normalizer: Option<&JapaneseNormalizer>) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                run_query(lookup, normalizer, &line).await?;
            }
        }
    }

    Ok(())
}

async fn run_query(
    lookup: &Lookup,
    normalizer: Option<&JapaneseNormalizer>,
    selection: &str,
) -> anyhow::Result<()> {
    let raw = preprocess(selection);
    if raw.is_empty() {
        return Ok(());
    }

    // Surface form → citation form; on any normalizer miss the raw
    // selection is the query key
    let query = match normalizer {
        Some(n) => match n.normalize(&raw) {
            Ok(Some(base)) => base,
            Ok(None) => raw.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "normalization failed, using raw selection");
                raw.clone()
            }
        },
        None => raw.clone(),
    };

    match lookup.search(&query).await {
        Ok(results) if results.is_empty() => println!("not found"),
        Ok(results) => {
            for result in &results {
                let pos = result.part_of_speech.as_deref().unwrap_or("-");
                println!(
                    "{} [{}] ({}) {}",
                    result.term, result.reading, pos, result.definition
                );
            }
        }
        Err(e) => {
            // Single-search failures degrade to "not found"
            tracing::warn!(error = %e, %query, "lookup failed");
            println!("not found");
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if atty::is(atty::Stream::Stderr) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
