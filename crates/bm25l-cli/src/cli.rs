//! CLI definition and command dispatch for `bm25l`.
//!
//! Every command that reads documents indexes the given directory in memory
//! first (one file per document), then reports on the fresh index.
//!
//! ## Configuration Precedence
//!
//! 1. CLI flags (`--k1`, `--b`, `--delta`)
//! 2. Environment variables (`BM25L_CONFIG`, `BM25L_VERBOSE`, `BM25L_COLOR`)
//! 3. Config file (`./bm25l.yaml` or the path from `--config`/`BM25L_CONFIG`)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use bm25l_core::similarity::{decode_norm_value, encode_norm_value};
use bm25l_core::{
    Bm25lConfig, CompoundSegmenter, DirectoryCollection, DocId, DocumentCollection, Explanation,
    IndexStats, IndexSummary, Indexer,
};

use crate::ui::{table, ColorMode, MessageType, Style};

// ============================================================================
// CLI Definition
// ============================================================================

/// Config file looked up in the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "bm25l.yaml";

/// BM25L relevance scoring over a directory of documents
#[derive(Parser, Debug)]
#[command(name = "bm25l")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "BM25L_VERBOSE")]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true, env = "BM25L_QUIET")]
    pub quiet: bool,

    /// Path to configuration file (default: ./bm25l.yaml)
    #[arg(long, global = true, env = "BM25L_CONFIG")]
    pub config: Option<PathBuf>,

    /// Color output mode: always, never, or auto (default: auto)
    #[arg(long, global = true, env = "BM25L_COLOR", default_value = "auto")]
    pub color: String,

    /// Override the term frequency saturation k1
    #[arg(long, global = true)]
    pub k1: Option<f32>,

    /// Override the length normalization strength b
    #[arg(long, global = true)]
    pub b: Option<f32>,

    /// Override the BM25L shift delta
    #[arg(long, global = true)]
    pub delta: Option<f32>,

    #[command(subcommand)]
    pub command: Command,
}

/// Where documents come from and how they are segmented.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Directory of documents, one file per document
    pub dir: PathBuf,

    /// Index at most this many documents
    #[arg(long)]
    pub max_docs: Option<usize>,

    /// Also index the parts of `_`-joined compound terms
    #[arg(long)]
    pub compound: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Index a directory and show collection statistics
    #[command(after_help = r#"EXAMPLES:
    # Statistics for a folder of notes
    bm25l stats notes/

    # The 25 most common terms, as JSON
    bm25l stats notes/ --top 25 --json
"#)]
    Stats {
        #[command(flatten)]
        source: SourceArgs,

        /// Number of most common terms to list
        #[arg(long, default_value = "10")]
        top: usize,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Rank the documents of a directory for a single term
    #[command(after_help = r#"EXAMPLES:
    # Rank documents for "ranking"
    bm25l score notes/ ranking

    # Show how each score was computed
    bm25l score notes/ ranking --explain

    # Plain BM25 instead of BM25L
    bm25l score notes/ ranking --delta 0
"#)]
    Score {
        #[command(flatten)]
        source: SourceArgs,

        /// Query term; analyzed like document text
        term: String,

        /// Query boost carried into the weight
        #[arg(long, default_value = "1.0")]
        boost: f32,

        /// Maximum number of documents to list
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,

        /// Print the score explanation of every listed document
        #[arg(long)]
        explain: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the one-byte norm stored for a field length
    #[command(after_help = r#"EXAMPLES:
    # Norm of a 100-token field
    bm25l norm 100

    # With an index-time boost
    bm25l norm 100 --boost 2
"#)]
    Norm {
        /// Number of tokens in the field
        length: u32,

        /// Index-time boost
        #[arg(long, default_value = "1.0")]
        boost: f32,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved configuration and validation warnings
    Config {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TermReport {
    term: String,
    doc_freq: u64,
    total_freq: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    similarity: String,
    summary: IndexSummary,
    stats: IndexStats,
    top_terms: Vec<TermReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoredHit {
    rank: usize,
    doc_id: DocId,
    name: String,
    freq: u32,
    length: f32,
    score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<Explanation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreReport {
    query: String,
    term: String,
    field: String,
    similarity: String,
    doc_freq: u64,
    idf: Option<f32>,
    avg_length: f32,
    hits: Vec<ScoredHit>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NormReport {
    length: u32,
    boost: f32,
    norm: u8,
    decoded_length: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigReport {
    source: Option<String>,
    config: Bm25lConfig,
    warnings: Vec<String>,
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse arguments, run the command and map the outcome to an exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Warnings always; debug output only with --verbose. Logs go to stderr so
    // --json output stays parseable.
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = format!("bm25l_core={},bm25l_cli={}", log_level, log_level);

    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let color_mode = ColorMode::parse(&cli.color).unwrap_or_default();
    let style = Style::new(color_mode);

    let (config, source) = match load_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            let hint = match &cli.config {
                Some(path) => format!("Check your config at {}", path.display()),
                None => format!("Check {} in the current directory", DEFAULT_CONFIG_FILE),
            };
            eprintln!(
                "{}",
                style.error_with_context(
                    "Failed to load configuration",
                    Some(&format!("{:#}", e)),
                    Some(&hint),
                )
            );
            return ExitCode::FAILURE;
        }
    };

    let quiet = cli.quiet;
    let result = match cli.command {
        Command::Stats { source: docs, top, json } => {
            handle_stats(&style, &config, &docs, top, json, quiet)
        }
        Command::Score {
            source: docs,
            term,
            boost,
            limit,
            explain,
            json,
        } => handle_score(&style, &config, &docs, term, boost, limit, explain, json, quiet),
        Command::Norm { length, boost, json } => handle_norm(&style, length, boost, json),
        Command::Config { json } => handle_config(&style, config, source, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style.message(MessageType::Err, &format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}

/// Resolve the configuration, apply flag overrides, then validate.
///
/// Returns the config together with the file it came from, if any.
fn load_config(cli: &Cli) -> Result<(Bm25lConfig, Option<PathBuf>)> {
    let path = match &cli.config {
        Some(path) if !path.exists() => bail!("{} does not exist", path.display()),
        Some(path) => path.clone(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };
    let source = path.exists().then(|| path.clone());

    let mut config = Bm25lConfig::from_path(&path)?;
    if let Some(k1) = cli.k1 {
        config.k1 = k1;
    }
    if let Some(b) = cli.b {
        config.b = b;
    }
    if let Some(delta) = cli.delta {
        config.delta = delta;
    }
    config.validate()?;

    tracing::debug!(k1 = config.k1, b = config.b, delta = config.delta, "Resolved config");
    Ok((config, source))
}

/// Index `source.dir` with the configured analysis chain.
fn build_index(
    config: &Bm25lConfig,
    source: &SourceArgs,
) -> Result<(Indexer, DirectoryCollection, IndexSummary)> {
    let collection = DirectoryCollection::open(&source.dir)?;
    let mut indexer = Indexer::from_config(config)?;
    if source.compound {
        indexer = indexer.with_segmenter(Box::new(CompoundSegmenter::default()));
    }

    let max = source.max_docs.unwrap_or(usize::MAX);
    let summary = indexer
        .index(&collection, max)
        .with_context(|| format!("Failed to index {}", source.dir.display()))?;

    Ok((indexer, collection, summary))
}

// ============================================================================
// Command handlers
// ============================================================================

fn handle_stats(
    style: &Style,
    config: &Bm25lConfig,
    source: &SourceArgs,
    top: usize,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let (indexer, _, summary) = build_index(config, source)?;
    let index = indexer.as_index();
    let stats = index.stats();

    let mut terms: Vec<TermReport> = index
        .terms()
        .map(|term| {
            let postings = index.postings(term);
            TermReport {
                term: term.to_string(),
                doc_freq: postings.len() as u64,
                total_freq: postings.iter().map(|p| u64::from(p.freq)).sum(),
            }
        })
        .collect();
    terms.sort_by(|a, b| {
        b.doc_freq
            .cmp(&a.doc_freq)
            .then(b.total_freq.cmp(&a.total_freq))
            .then_with(|| a.term.cmp(&b.term))
    });
    terms.truncate(top);

    if json {
        let report = StatsReport {
            similarity: indexer.similarity().to_string(),
            summary,
            stats,
            top_terms: terms,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !quiet {
        println!(
            "{}",
            style.message(
                MessageType::Ok,
                &format!(
                    "Indexed {} documents from {}",
                    summary.documents,
                    style.file_path(&source.dir.display().to_string())
                )
            )
        );
        println!();
    }

    println!("{}", style.section("STATS"));
    println!();
    println!("  {}", style.key_value("Field", &stats.field));
    println!("  {}", style.key_value("Similarity", &indexer.similarity().to_string()));
    println!("  {}", style.key_value("Documents", &stats.documents.to_string()));
    println!("  {}", style.key_value("Vocabulary", &stats.vocabulary.to_string()));
    println!("  {}", style.key_value("Postings", &stats.postings.to_string()));
    println!("  {}", style.key_value("Total terms", &stats.total_terms.to_string()));
    if summary.overlaps > 0 {
        println!("  {}", style.key_value("Overlaps", &summary.overlaps.to_string()));
    }
    println!("  {}", style.key_value("Avg length", &format!("{:.4}", stats.avg_length)));

    if !terms.is_empty() {
        let rows: Vec<table::TermRow> = terms
            .into_iter()
            .map(|t| table::TermRow {
                term: t.term,
                doc_freq: t.doc_freq,
                total_freq: t.total_freq,
            })
            .collect();
        println!();
        println!("{}", style.section("TOP TERMS"));
        println!();
        println!("{}", table::render_terms_table(&rows));
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_score(
    style: &Style,
    config: &Bm25lConfig,
    source: &SourceArgs,
    query: String,
    boost: f32,
    limit: usize,
    explain: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let (indexer, collection, _) = build_index(config, source)?;
    let term = match indexer.parser().parse(&query).as_slice() {
        [term] => term.clone(),
        [] => bail!("`{}` produces no index term after analysis", query),
        terms => bail!(
            "`{}` analyzes to {} terms ({}); score takes a single term",
            query,
            terms.len(),
            terms.join(", ")
        ),
    };

    let index = indexer.as_index();
    let sim = indexer.similarity();
    let collection_stats = index.collection_statistics();

    let mut report = ScoreReport {
        query,
        term: term.clone(),
        field: index.field().to_string(),
        similarity: sim.to_string(),
        doc_freq: 0,
        idf: None,
        avg_length: bm25l_core::similarity::avg_field_length(&collection_stats),
        hits: Vec::new(),
    };

    if let Some(term_stats) = index.term_statistics(&term) {
        report.doc_freq = term_stats.doc_freq;
        let weight = sim
            .compute_weight(boost, &collection_stats, &[term_stats])?
            .normalize(1.0, 1.0);
        let scorer = sim.scorer(&weight, index)?;
        report.idf = Some(weight.idf().value());

        let mut hits = Vec::new();
        for posting in index.postings(&term) {
            let doc_id = posting.doc_id;
            hits.push(ScoredHit {
                rank: 0,
                doc_id,
                name: collection
                    .name(doc_id)
                    .unwrap_or_else(|| format!("#{}", doc_id)),
                freq: posting.freq,
                length: scorer.document_length(doc_id)?,
                score: scorer.score(doc_id, posting.freq as f32)?,
                explanation: None,
            });
        }

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
        hits.truncate(limit);

        for (i, hit) in hits.iter_mut().enumerate() {
            hit.rank = i + 1;
            if explain {
                let freq = Explanation::new(hit.freq as f32, format!("termFreq={}", hit.freq));
                hit.explanation = Some(scorer.explain(hit.doc_id, freq)?);
            }
        }
        report.hits = hits;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.hits.is_empty() {
        println!(
            "{}",
            style.message(
                MessageType::Info,
                &format!("No documents contain `{}`", style.term(&report.term))
            )
        );
        return Ok(());
    }

    if !quiet {
        println!(
            "{}",
            style.message(
                MessageType::Ok,
                &format!(
                    "{} of {} matching documents for `{}`",
                    report.hits.len(),
                    report.doc_freq,
                    style.term(&report.term)
                )
            )
        );
        println!();
    }

    println!("{}", style.section("SCORE"));
    println!();
    println!("  {}", style.key_value("Similarity", &report.similarity));
    if let Some(idf) = report.idf {
        println!("  {}", style.key_value("Idf", &format!("{:.4}", idf)));
    }
    println!("  {}", style.key_value("Avg length", &format!("{:.4}", report.avg_length)));
    println!();

    let rows: Vec<table::HitRow> = report
        .hits
        .iter()
        .map(|hit| table::HitRow {
            rank: hit.rank,
            name: hit.name.clone(),
            freq: hit.freq,
            length: hit.length,
            score: hit.score,
        })
        .collect();
    println!("{}", table::render_hits_table(&rows));

    for hit in &report.hits {
        if let Some(explanation) = &hit.explanation {
            println!();
            println!("{}", style.section(&format!("#{} {}", hit.rank, hit.name)));
            print!("{}", explanation);
        }
    }

    Ok(())
}

fn handle_norm(style: &Style, length: u32, boost: f32, json: bool) -> Result<()> {
    if !boost.is_finite() || boost <= 0.0 {
        bail!("boost must be a positive number, got {}", boost);
    }

    let norm = encode_norm_value(boost, length);
    let report = NormReport {
        length,
        boost,
        norm,
        decoded_length: decode_norm_value(norm),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", style.section("NORM"));
    println!();
    println!("  {}", style.key_value("Length", &report.length.to_string()));
    println!("  {}", style.key_value("Boost", &report.boost.to_string()));
    println!("  {}", style.key_value("Norm byte", &report.norm.to_string()));
    println!(
        "  {}",
        style.key_value("Decoded length", &format!("{:.4}", report.decoded_length))
    );

    Ok(())
}

fn handle_config(
    style: &Style,
    config: Bm25lConfig,
    source: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let warnings = config.validate()?;

    if json {
        let report = ConfigReport {
            source: source.map(|p| p.display().to_string()),
            config,
            warnings,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let origin = source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());

    println!("{}", style.section("CONFIG"));
    println!();
    println!("  {}", style.key_value("Source", &origin));
    println!("  {}", style.key_value("k1", &config.k1.to_string()));
    println!("  {}", style.key_value("b", &config.b.to_string()));
    println!("  {}", style.key_value("delta", &config.delta.to_string()));
    println!(
        "  {}",
        style.key_value("discountOverlaps", &config.discount_overlaps.to_string())
    );
    println!("  {}", style.key_value("field", &config.field));
    println!(
        "  {}",
        style.key_value("analysis.stemming", &config.analysis.stemming.to_string())
    );
    println!(
        "  {}",
        style.key_value(
            "analysis.removeStopwords",
            &config.analysis.remove_stopwords.to_string()
        )
    );
    println!(
        "  {}",
        style.key_value(
            "analysis.minTokenLength",
            &config.analysis.min_token_length.to_string()
        )
    );

    if !warnings.is_empty() {
        println!();
        for warning in &warnings {
            println!("{}", style.message(MessageType::Warn, warning));
        }
        println!(
            "{}",
            style.message(MessageType::Hint, "Recommended values: k1=1.2, b=0.75, delta=0.5")
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_score_arguments() {
        let cli = Cli::parse_from([
            "bm25l", "score", "docs", "ranking", "--limit", "3", "--b", "0.5",
        ]);
        assert_eq!(cli.b, Some(0.5));
        match cli.command {
            Command::Score { source, term, limit, boost, .. } => {
                assert_eq!(source.dir, PathBuf::from("docs"));
                assert_eq!(term, "ranking");
                assert_eq!(limit, 3);
                assert_eq!(boost, 1.0);
            }
            other => panic!("expected score, got {other:?}"),
        }
    }
}
