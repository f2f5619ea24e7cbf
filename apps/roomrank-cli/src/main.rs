use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use roomrank_caption::{download_images, write_catalog, CachedCaptioner, OpenAiCaptioner};
use roomrank_core::cache::MemoryCache;
use roomrank_core::config::{expand_path, Config};
use roomrank_hybrid::{FusionParams, HybridSearchEngine, NamedQuery};
use roomrank_vector::embed_provider::local::LocalProvider;

#[derive(Parser, Debug)]
#[command(name = "roomrank", version, about = "Hybrid semantic + keyword ranking of hotel-room captions")]
struct Cli {
    /// Catalog CSV; defaults to `data.catalog_csv` from config.
    #[arg(long, global = true, env = "ROOMRANK_CSV")]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download the room images, caption them and write the catalog CSV.
    Ingest {
        /// Image directory; defaults to `data.image_dir`.
        #[arg(long)]
        images: Option<PathBuf>,
        /// Skip downloading and caption whatever is already in the directory.
        #[arg(long)]
        no_download: bool,
    },
    /// Run named queries (all four when none are given).
    Rank {
        /// Label, `q1`..`q4` or slug.
        queries: Vec<String>,
    },
    /// Top-k semantic search over free text.
    Search {
        text: String,
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// OR search over exact keywords.
    Keywords {
        #[arg(required = true)]
        keywords: Vec<String>,
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// List the named queries.
    Queries,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let data = config.data()?;
    let csv = cli.csv.clone().unwrap_or_else(|| expand_path(&data.catalog_csv));

    match cli.command {
        Command::Queries => {
            for query in NamedQuery::ALL {
                println!("{:<22} {}", query.slug(), query.label());
            }
        }
        Command::Ingest { images, no_download } => {
            let caption = config.caption()?;
            let image_dir = images.unwrap_or_else(|| expand_path(&data.image_dir));
            if !no_download {
                let summary = download_images(&caption.base_url, &image_dir, caption.image_count, caption.timeout_secs)?;
                println!("Images: {} downloaded, {} present, {} failed", summary.downloaded, summary.skipped, summary.failed);
            }
            let client = OpenAiCaptioner::from_env(&caption)?;
            info!(model = client.model(), "captioning images");
            let mut captioner = CachedCaptioner::new(client, MemoryCache::new());
            let records = write_catalog(&mut captioner, &image_dir, &caption.base_url, &csv)?;
            let failed = records.iter().filter(|r| r.is_failed()).count();
            println!("✅ Wrote {} records to {} ({} failed)", records.len(), csv.display(), failed);
        }
        Command::Rank { queries } => {
            let mut engine = open_engine(&config, &csv)?;
            let selected: Vec<NamedQuery> = if queries.is_empty() {
                NamedQuery::ALL.to_vec()
            } else {
                queries.iter().map(|q| q.parse::<NamedQuery>()).collect::<Result<_, _>>()?
            };
            for query in selected {
                println!("\n{query}");
                for r in engine.rank_query(query)?.iter() {
                    println!(" - {} (score: {:.4})", r.id, r.score);
                }
            }
        }
        Command::Search { text, top_k } => {
            let k = top_k.map_or_else(|| config.ranking().map(|r| r.top_k), Ok)?;
            let mut engine = open_engine(&config, &csv)?;
            for r in engine.search(&text, k)?.iter() {
                println!(" - {} (score: {:.4})", r.id, r.score);
            }
        }
        Command::Keywords { keywords, top_k } => {
            let k = top_k.map_or_else(|| config.ranking().map(|r| r.top_k), Ok)?;
            let mut engine = open_engine(&config, &csv)?;
            for hit in engine.search_by_keywords(keywords.as_slice(), k)?.iter() {
                println!(" - {} (relevance: {})", hit.id, hit.relevance);
            }
        }
    }
    Ok(())
}

fn open_engine(config: &Config, csv: &std::path::Path) -> anyhow::Result<HybridSearchEngine> {
    let ranking = config.ranking()?;
    let embedding = config.embedding()?;
    let model_dir = embedding.model_dir.map(|d| expand_path(d).to_string_lossy().into_owned());
    let provider = LocalProvider::with_model_dir(model_dir.as_deref())?;
    let mut engine = HybridSearchEngine::new(Box::new(provider), MemoryCache::new()).with_params(FusionParams::from(&ranking));
    engine.load(csv).with_context(|| format!("loading catalog {}", csv.display()))?;
    Ok(engine)
}
