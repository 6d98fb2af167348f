use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use dataset_lens::config::AppConfig;
use dataset_lens::timing::{refresh_ui, Debouncer};
use dataset_lens::{DatasetLoader, DatasetStore, DisplayItem};

#[derive(Parser)]
#[command(name = "dataset-lens")]
#[command(version, about = "Browse bundled JSON datasets by concept category", long_about = None)]
struct Cli {
    /// Dataset directory (overrides config and DATASET_LENS_DIR)
    #[arg(long)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available datasets
    List,
    /// Print the categories of a dataset
    Categories {
        /// Full or short dataset name
        dataset: String,
    },
    /// Print the display items of a dataset, one JSON object per line
    Show {
        dataset: String,
        /// Category filter; repeating a category toggles it off again
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
    /// Interactive prompt (default)
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut cfg = AppConfig::load();
    if let Some(dir) = cli.dir {
        cfg.datasets_dir = dir;
    }

    let loader = DatasetLoader::discover(&cfg.datasets_dir)
        .await
        .with_context(|| format!("discovering datasets in {}", cfg.datasets_dir.display()))?;
    let mut store = DatasetStore::new(loader);

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::List => print_handles(&store),
        Commands::Categories { dataset } => {
            select(&mut store, &dataset).await?;
            for cat in store.categories() {
                println!("{cat}");
            }
        }
        Commands::Show { dataset, filters } => {
            select(&mut store, &dataset).await?;
            for f in &filters {
                store.select_dataset_filter(f)?;
            }
            print_items(&store.display_items())?;
        }
        Commands::Browse => browse(&mut store, &cfg).await?,
    }
    Ok(())
}

/// Select by full name, falling back to a unique short-name match.
async fn select(store: &mut DatasetStore, name: &str) -> Result<()> {
    let full = if store.loader().contains(name) {
        name.to_string()
    } else {
        let matches: Vec<_> = store
            .handle_short_names()
            .into_iter()
            .filter(|h| h.short == name)
            .collect();
        match matches.as_slice() {
            [only] => only.full.clone(),
            _ => name.to_string(),
        }
    };
    store
        .select_dataset(&full)
        .await
        .with_context(|| format!("selecting dataset '{name}'"))
}

fn print_handles(store: &DatasetStore) {
    for h in store.handle_short_names() {
        println!("{}\t{}", h.short, h.full);
    }
}

fn print_items(items: &[DisplayItem]) -> Result<()> {
    for item in items {
        println!("{}", serde_json::to_string(item)?);
    }
    Ok(())
}

async fn browse(store: &mut DatasetStore, cfg: &AppConfig) -> Result<()> {
    let mut redraw = Debouncer::new(cfg.debounce(), |items: Vec<DisplayItem>| {
        if let Err(e) = print_items(&items) {
            log::error!("printing items failed: {e:#}");
        }
    });

    println!("commands: list | select <dataset> | filter <category> | categories | items | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let (cmd, arg) = match line.trim().split_once(' ') {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (line.trim(), ""),
        };

        let result = match cmd {
            "" => Ok(()),
            "quit" | "exit" => break,
            "list" => {
                print_handles(store);
                Ok(())
            }
            "select" => select(store, arg).await,
            "filter" => store.select_dataset_filter(arg).map_err(Into::into),
            "categories" => {
                for cat in store.categories() {
                    println!("{cat}");
                }
                Ok(())
            }
            "items" => {
                redraw.cancel();
                print_items(&store.display_items())
            }
            other => Err(anyhow::anyhow!("unknown command '{other}'")),
        };

        match result {
            Ok(()) if matches!(cmd, "select" | "filter") => redraw.call(store.display_items()),
            Ok(()) => {}
            Err(e) => eprintln!("error: {e:#}"),
        }
        refresh_ui().await;
    }

    if redraw.is_pending() {
        tokio::time::sleep(cfg.debounce()).await;
    }
    Ok(())
}
