use anyhow::Context;
use clap::{Parser, Subcommand};
use juggler_store::{Juggler, JugglerStore, StoreConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jugglers")]
#[command(version)]
#[command(about = "Keep track of jugglers and their catch records")]
struct Args {
    /// Database file path (defaults to $JUGGLERS_DB, then jugglers.sqlite)
    #[arg(short, long, value_name = "FILE", global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every juggler
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new juggler
    Add {
        name: String,
        country: String,
        catches: u32,
    },
    /// Change a juggler's catch count
    Update { name: String, catches: u32 },
    /// Find jugglers whose name contains TERM (case-insensitive)
    Search {
        term: String,
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a juggler
    Delete { name: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = StoreConfig::resolve(args.database);
    let store = JugglerStore::open(config).context("could not open the juggler database")?;

    run(&store, args.command)
}

fn run(store: &JugglerStore, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List { json } => {
            let jugglers = store.list_all()?;
            print_jugglers(&jugglers, json)?;
        }
        Command::Add {
            name,
            country,
            catches,
        } => {
            let mut juggler = Juggler::new(name, country, catches);
            store
                .insert(&mut juggler)
                .with_context(|| format!("could not add {}", juggler.name))?;
            println!("{juggler}");
        }
        Command::Update { name, catches } => {
            store
                .update_catches(&name, catches)
                .with_context(|| format!("could not update {name}"))?;
            println!("Updated {name} to {catches} catches");
        }
        Command::Search { term, json } => {
            let jugglers = store.search(&term)?;
            if jugglers.is_empty() && !json {
                println!("No juggler matches {term}");
            } else {
                print_jugglers(&jugglers, json)?;
            }
        }
        Command::Delete { name } => {
            store
                .delete(&name)
                .with_context(|| format!("could not delete {name}"))?;
            println!("Deleted {name}");
        }
    }
    Ok(())
}

fn print_jugglers(jugglers: &[Juggler], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(jugglers)?);
    } else {
        for juggler in jugglers {
            println!("{juggler}");
        }
    }
    Ok(())
}
