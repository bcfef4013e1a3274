mod catalog;
mod docs;
mod error;
mod extract;
mod instructions;
mod manifest;
mod settings;
mod utils;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use catalog::components::{components_markdown, list_all_components};
use catalog::listing::list_all_documentation;
use extract::snapshot::SnapshotPage;
use settings::Settings;

#[derive(Parser)]
#[command(name = "storybook_scraper", about = "Storybook catalog and docs-to-Markdown scraper")]
struct Cli {
    /// Storybook base URL (overrides STORYBOOK_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print structured JSON instead of Markdown
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List documentation pages and components from index.json
    List,
    /// List components, one per story group
    Components,
    /// Show manifest statistics
    Stats,
    /// Resolve story viewer URLs for story ids
    Urls {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show one manifest entry and its public URL
    Entry { id: String },
    /// UI building instructions
    Instructions,
    /// Convert a captured docs page into Markdown
    Doc {
        /// Manifest entry id the page belongs to
        id: String,
        /// DOM snapshot (JSON) of the rendered docs page
        #[arg(short, long)]
        snapshot: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let flag = cli.base_url.as_deref();

    match cli.command {
        Commands::List => {
            let base = settings.base_url(flag)?;
            let manifest = manifest::fetch_manifest(&reqwest::Client::new(), &base).await?;
            let listing = list_all_documentation(&manifest);
            if cli.json {
                print_json(&serde_json::json!({ "entries": listing.entries() }))?;
            } else {
                println!("{}", listing.to_markdown(&manifest, &base)?);
            }
        }
        Commands::Components => {
            let base = settings.base_url(flag)?;
            let manifest = manifest::fetch_manifest(&reqwest::Client::new(), &base).await?;
            let components = list_all_components(&manifest);
            if cli.json {
                print_json(&serde_json::json!({ "components": components }))?;
            } else {
                println!("{}", components_markdown(&components, &base)?);
            }
        }
        Commands::Stats => {
            let base = settings.base_url(flag)?;
            let manifest = manifest::fetch_manifest(&reqwest::Client::new(), &base).await?;
            let groups = catalog::build_component_index(&manifest);
            println!("Index v{}", manifest.v);
            println!("Entries:    {}", manifest.entries.len());
            println!("Docs:       {}", catalog::list_docs(&manifest).len());
            println!("Stories:    {}", catalog::list_stories(&manifest).len());
            println!("Groups:     {}", groups.len());
            println!("With docs:  {}", groups.iter().filter(|g| g.has_docs).count());
        }
        Commands::Urls { ids } => {
            let base = settings.base_url(flag)?;
            let stories = ids
                .into_iter()
                .map(|id| {
                    let url = catalog::story_url(&id, &base)?;
                    Ok(serde_json::json!({ "id": id, "url": url }))
                })
                .collect::<error::Result<Vec<_>>>()?;
            if cli.json {
                print_json(&serde_json::json!({ "stories": stories }))?;
            } else {
                println!(
                    "Resolved {} story URL{}.",
                    stories.len(),
                    if stories.len() == 1 { "" } else { "s" }
                );
                for s in &stories {
                    println!("- {}: {}", s["id"].as_str().unwrap_or_default(), s["url"].as_str().unwrap_or_default());
                }
            }
        }
        Commands::Entry { id } => {
            let base = settings.base_url(flag)?;
            let manifest = manifest::fetch_manifest(&reqwest::Client::new(), &base).await?;
            let entry = manifest
                .get(&id)
                .with_context(|| format!("No entry '{}' in index.json", id))?;
            let url = catalog::resolve_public_url(entry, &base)?;
            if cli.json {
                print_json(&serde_json::json!({ "entry": entry, "url": url }))?;
            } else {
                println!("{} ({})", entry.title(), entry.name());
                println!("  id:     {}", entry.id());
                println!("  import: {}", entry.import_path());
                println!("  tags:   {}", entry.tags().join(", "));
                println!("  url:    {}", url);
            }
        }
        Commands::Instructions => {
            let i = instructions::ui_building_instructions(
                settings.additional_building_instructions.as_deref(),
            );
            if cli.json {
                print_json(&serde_json::json!({ "instructions": i }))?;
            } else {
                println!("{}", i.to_markdown());
            }
        }
        Commands::Doc { id, snapshot } => {
            let base = settings.base_url(flag)?;
            let manifest = manifest::fetch_manifest(&reqwest::Client::new(), &base).await?;
            let entry = manifest
                .get(&id)
                .with_context(|| format!("No entry '{}' in index.json", id))?;
            let url = catalog::resolve_public_url(entry, &base)?;

            let json = std::fs::read_to_string(&snapshot)
                .with_context(|| format!("Failed to read {:?}", snapshot))?;
            let page = SnapshotPage::from_json(url, &json)?;
            let extracted = extract::extract_page(&page, &settings.extract).await?;
            let doc = docs::doc_detail(entry, extracted);
            if cli.json {
                print_json(&serde_json::json!({ "doc": doc }))?;
            } else {
                println!("{}", doc.markdown);
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        tracing::info!("Done in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
