use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rightsdb_core::config::{expand_path, Config};
use rightsdb_core::traits::CatalogStore;
use rightsdb_core::types::SearchResult;
use rightsdb_search::{JsonDirStore, SituationSearch};
use tracing_subscriber::EnvFilter;

// Rank catalog situations for a free-text query.
// Usage:
//   rightsdb-search "me quieren revisar el celular" [--catalog DIR] [--limit N] [--json]
//   rightsdb-search                       # interactive prompt

const USAGE: &str = "Usage: rightsdb-search [--catalog DIR] [--config FILE] [--limit N] [--json] [query...]";

struct Args {
    query: Vec<String>,
    catalog: Option<PathBuf>,
    config: Option<PathBuf>,
    limit: Option<usize>,
    json: bool,
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut parsed = Args { query: Vec::new(), catalog: None, config: None, limit: None, json: false };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" | "--config" | "--limit" => {
                if i + 1 >= args.len() { eprintln!("{} requires a value\n{}", args[i], USAGE); std::process::exit(2); }
                let value = &args[i + 1];
                match args[i].as_str() {
                    "--catalog" => parsed.catalog = Some(expand_path(value)),
                    "--config" => parsed.config = Some(expand_path(value)),
                    _ => match value.parse() {
                        Ok(n) => parsed.limit = Some(n),
                        Err(_) => { eprintln!("--limit expects a number, got {}", value); std::process::exit(2); }
                    },
                }
                i += 2;
            }
            "--json" => { parsed.json = true; i += 1; }
            "-h" | "--help" => { println!("{}", USAGE); std::process::exit(0); }
            s if s.starts_with("--") => { eprintln!("Unknown flag: {}\n{}", s, USAGE); std::process::exit(2); }
            s => { parsed.query.push(s.to_string()); i += 1; }
        }
    }
    parsed
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = parse_args();
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    let search_config = config.search()?;
    let limit = args.limit.unwrap_or(search_config.default_limit);

    // Resolve catalog precedence: flag > config/env > ./data/situations
    let catalog_dir = match args.catalog {
        Some(dir) => dir,
        None => config.catalog_dir()?.unwrap_or_else(|| PathBuf::from("data/situations")),
    };
    tracing::info!(catalog = %catalog_dir.display(), limit, "starting situation search");

    let search = SituationSearch::with_config(JsonDirStore::new(catalog_dir), search_config)?;

    let stdout = io::stdout();
    if !args.query.is_empty() {
        let query = args.query.join(" ");
        let hits = search.search(&query, limit)?;
        return print_hits(&mut stdout.lock(), &query, &hits, args.json);
    }

    interactive(&search, io::stdin().lock(), &mut stdout.lock(), limit, args.json)
}

/// Prompt loop. A failed query is logged and the session keeps going.
fn interactive<S, R, W>(search: &SituationSearch<S>, mut input: R, out: &mut W, limit: usize, json: bool) -> anyhow::Result<()>
where
    S: CatalogStore,
    R: BufRead,
    W: Write,
{
    writeln!(out, "Describe tu situación (\"salir\" para terminar)")?;
    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 { break; }
        let query = line.trim();
        if matches!(query, "salir" | "exit" | "quit") { break; }
        if query.is_empty() { continue; }
        match search.search(query, limit) {
            Ok(hits) => print_hits(out, query, &hits, json)?,
            Err(e) => {
                tracing::error!(query, error = %e, "search failed");
                writeln!(out, "Error: {}", e)?;
            }
        }
    }
    Ok(())
}

fn print_hits<W: Write>(out: &mut W, query: &str, hits: &[SearchResult], json: bool) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(hits)?)?;
        return Ok(());
    }
    writeln!(out, "\nBuscando: \"{}\"\n", query)?;
    if hits.is_empty() {
        writeln!(out, "No se encontraron situaciones relevantes.")?;
        return Ok(());
    }
    for (i, h) in hits.iter().enumerate() {
        writeln!(out, "{:>2}. [{:.2}] {}", i + 1, h.score, h.title)?;
        writeln!(out, "    id={}  severity={}  category={}", h.situation_id, h.severity, h.category)?;
        writeln!(
            out,
            "    nq={:.2} kw={:.2} ti={:.2} pa={:.2}\n",
            h.match_details.natural_query, h.match_details.keywords, h.match_details.title, h.match_details.partial
        )?;
    }
    Ok(())
}
