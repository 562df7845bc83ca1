//! # tarkov-data
//!
//! Command line front end for fetching and inspecting tarkov.dev data.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tarkov_data::catalog::Catalog;
use tarkov_data::tasks::{self, Task};
use tarkov_data::wipe::{self, DEFAULT_AVERAGE_WINDOW, WipeDetail};
use tarkov_data::{Collection, DEFAULT_ENDPOINT, Fetcher, HttpTransport, data};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "tarkov-data: fetches Escape from Tarkov companion data (items, barters, maps, tasks, ...)\n\
                  from the tarkov.dev GraphQL API and prints or snapshots it."
)]
struct Args {
    /// GraphQL endpoint to query
    #[arg(long, env = "TARKOV_API_URL", default_value = DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    /// Give up on a request after this many seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one collection and print it as JSON
    Fetch {
        /// Collection to fetch (items, barters, bosses, crafts, hideout, maps, meta, traders, quests)
        collection: Collection,

        /// Language code
        #[arg(short, long, default_value = "en")]
        lang: String,

        /// Fail on any GraphQL error instead of returning partial data
        #[arg(long)]
        strict: bool,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Fetch every collection in strict mode and write snapshots
    Prebuild {
        /// Language codes to fetch (repeatable)
        #[arg(short, long = "lang", default_values_t = ["en".to_string()])]
        langs: Vec<String>,

        /// Output directory (default: the application data directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show a task with its requirements and objectives
    Task {
        /// Task id, legacy numeric id, or normalized name
        identifier: String,

        /// Language code
        #[arg(short, long, default_value = "en")]
        lang: String,

        /// Read collections from a prebuild snapshot directory instead of the API
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Show wipe lengths and the recent average from a wipe history file
    WipeLength {
        /// JSON file with `[{ "name": ..., "start": ... }]` entries
        #[arg(short, long)]
        file: PathBuf,

        /// Number of most recent ended wipes to average
        #[arg(short, long, default_value_t = DEFAULT_AVERAGE_WINDOW)]
        window: usize,
    },
    /// Show the paths and endpoint in use
    Paths,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "tarkov_data=debug"
    } else {
        "tarkov_data=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let transport = HttpTransport::with_timeout(args.timeout.map(Duration::from_secs))?;
    let fetcher = Fetcher::with_transport(transport, args.endpoint.clone());

    match args.command {
        Command::Fetch {
            collection,
            lang,
            strict,
            out,
        } => {
            let records = fetcher
                .fetch(collection, &lang, strict)
                .with_context(|| format!("failed to load {}", collection))?;
            match out {
                Some(path) => {
                    let json = serde_json::to_string_pretty(&records)?;
                    fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Wrote {} {} to {}", records.len(), collection, path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&records)?),
            }
        }
        Command::Prebuild { langs, out } => {
            let out = match out {
                Some(dir) => dir,
                None => data::get_data_dir()?,
            };
            prebuild(&fetcher, &langs, &out)?;
        }
        Command::Task {
            identifier,
            lang,
            snapshot,
        } => show_task(&fetcher, &identifier, &lang, snapshot.as_deref())?,
        Command::WipeLength { file, window } => show_wipe_length(&file, window)?,
        Command::Paths => {
            println!("App Paths:");
            println!("  Data:     {}", data::get_data_dir()?.display());
            println!("  Endpoint: {}", fetcher.endpoint());
        }
    }

    Ok(())
}

/// Fetches `jobs` concurrently, one thread per collection.
fn fetch_all<'a>(
    fetcher: &Fetcher,
    jobs: &[(Collection, &'a str)],
    strict: bool,
) -> Vec<(Collection, &'a str, Result<Vec<Value>>)> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .iter()
            .map(|&(collection, lang)| {
                let handle = scope.spawn(move || {
                    fetcher
                        .fetch(collection, lang, strict)
                        .map_err(anyhow::Error::from)
                });
                (collection, lang, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(collection, lang, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(anyhow::anyhow!("fetch thread for {} panicked", collection))
                });
                (collection, lang, result)
            })
            .collect()
    })
}

fn prebuild(fetcher: &Fetcher, langs: &[String], out: &Path) -> Result<()> {
    let jobs: Vec<(Collection, &str)> = langs
        .iter()
        .flat_map(|lang| Collection::ALL.into_iter().map(move |c| (c, lang.as_str())))
        .collect();

    tracing::info!(jobs = jobs.len(), out = %out.display(), "Starting prebuild");

    let mut failures = 0;
    for (collection, lang, result) in fetch_all(fetcher, &jobs, true) {
        match result {
            Ok(records) => {
                let path = data::write_snapshot(out, collection, lang, &records)?;
                println!("{:>8} {:<3} {:>6} records -> {}", collection, lang, records.len(), path.display());
            }
            Err(err) => {
                tracing::error!(%collection, lang, error = %err, "Prebuild fetch failed");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} collections failed to load", failures, jobs.len());
    }
    Ok(())
}

fn show_task(
    fetcher: &Fetcher,
    identifier: &str,
    lang: &str,
    snapshot: Option<&Path>,
) -> Result<()> {
    const NEEDED: [Collection; 4] = [
        Collection::Items,
        Collection::Traders,
        Collection::Quests,
        Collection::Maps,
    ];

    let mut loaded = Vec::with_capacity(NEEDED.len());
    match snapshot {
        Some(dir) => {
            for collection in NEEDED {
                loaded.push(data::load_snapshot(dir, collection, lang)?);
            }
        }
        None => {
            let jobs: Vec<(Collection, &str)> = NEEDED.iter().map(|&c| (c, lang)).collect();
            for (collection, _, result) in fetch_all(fetcher, &jobs, false) {
                loaded.push(result.with_context(|| format!("failed to load {}", collection))?);
            }
        }
    }

    let [items, traders, quests, maps]: [Vec<Value>; 4] = loaded
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected {} collections", NEEDED.len()))?;

    let all_tasks: Vec<Task> = quests
        .iter()
        .filter_map(|value| match serde_json::from_value::<Task>(value.clone()) {
            Ok(task) => Some(task),
            Err(err) => {
                tracing::warn!(error = %err, "Skipping unreadable task record");
                None
            }
        })
        .collect();

    let catalog = Catalog::new(items, traders, quests, maps);
    let task = tasks::find_task(&all_tasks, identifier)
        .ok_or_else(|| anyhow::anyhow!("No task matches '{}'", identifier))?;

    for line in tasks::summarize(task, &all_tasks, &catalog) {
        println!("{}", line);
    }
    Ok(())
}

fn show_wipe_length(file: &Path, window: usize) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let details: Vec<WipeDetail> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", file.display()))?;

    let wipes = wipe::wipe_lengths(&details, chrono::Utc::now());

    println!("{:<12} {:<12} {:<14} {:>6}", "Patch", "Wipe start", "Wipe end", "Days");
    for w in wipes.iter().rev() {
        let end = if w.ongoing {
            "Ongoing wipe".to_string()
        } else {
            w.end.format("%Y-%m-%d").to_string()
        };
        println!(
            "{:<12} {:<12} {:<14} {:>6}",
            w.name,
            w.start.format("%Y-%m-%d"),
            end,
            w.length_days
        );
    }

    match wipe::compute_average(&wipes, window) {
        Some(average) => println!("\nAverage wipe length among last {} wipes: {} days", window, average),
        None => println!("\nNo ended wipes to average."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_fetch() {
        let args = Args::try_parse_from(["tarkov-data", "fetch", "barters", "--lang", "de", "--strict"])
            .unwrap();
        match args.command {
            Command::Fetch {
                collection,
                lang,
                strict,
                out,
            } => {
                assert_eq!(collection, Collection::Barters);
                assert_eq!(lang, "de");
                assert!(strict);
                assert!(out.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_args_prebuild_langs() {
        let args =
            Args::try_parse_from(["tarkov-data", "prebuild", "-l", "en", "-l", "ru", "--timeout", "30"])
                .unwrap();
        assert_eq!(args.timeout, Some(30));
        match args.command {
            Command::Prebuild { langs, .. } => assert_eq!(langs, vec!["en", "ru"]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_args_rejects_unknown_collection() {
        assert!(Args::try_parse_from(["tarkov-data", "fetch", "weather"]).is_err());
    }

    #[test]
    fn test_args_wipe_length_default_window() {
        let args = Args::try_parse_from(["tarkov-data", "wipe-length", "-f", "wipes.json"]).unwrap();
        match args.command {
            Command::WipeLength { file, window } => {
                assert_eq!(file, PathBuf::from("wipes.json"));
                assert_eq!(window, DEFAULT_AVERAGE_WINDOW);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
