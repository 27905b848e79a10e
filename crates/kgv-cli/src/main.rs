//! kgv: interactive shell over a knowledge graph session.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use kgv_graph::formats::RdfFormat;
use kgv_graph::{
    FilterId, Hits, KgvResult, MemoryView, NodeId, QueryOutcome, Session, SessionEvent,
    SourceFormat, ViewConfig,
};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use tracing::{debug, warn};

type Shell = Session<MemoryView>;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let cli_args = parse_args(&args);

    let level = if cli_args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut session = Session::new(cli_args.config.clone(), MemoryView::new());
    if let Some(path) = &cli_args.file
        && let Err(e) = load_file(&mut session, path, cli_args.format)
    {
        eprintln!("Error loading '{}': {e}", path.display());
        std::process::exit(1);
    }

    println!("kgv v{}: knowledge graph shell", env!("CARGO_PKG_VERSION"));
    println!("Type help for query syntax, :help for commands, :quit to exit.\n");

    let mut line_editor = match history_path().map(|p| FileBackedHistory::with_file(1000, p)) {
        Some(Ok(history)) => Reedline::create().with_history(Box::new(history)),
        Some(Err(e)) => {
            warn!("history disabled: {e}");
            Reedline::create()
        }
        None => Reedline::create(),
    };

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("kgv".to_string()),
        DefaultPromptSegment::Empty,
    );

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed.starts_with(':') {
                    match handle_meta_command(trimmed, &mut session) {
                        MetaResult::Continue => continue,
                        MetaResult::Quit => break,
                        MetaResult::NotMeta => {}
                    }
                }
                run_query(&mut session, trimmed);
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Bye!");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }
    }
}

// ---- Argument parsing ----

struct CliArgs {
    file: Option<PathBuf>,
    format: Option<SourceFormat>,
    config: ViewConfig,
    verbose: bool,
}

fn parse_args(args: &[String]) -> CliArgs {
    let mut result = CliArgs {
        file: None,
        format: None,
        config: ViewConfig::default(),
        verbose: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--format" | "-f" => {
                let name = required_value(args, i, "--format");
                result.format = Some(SourceFormat::from_name(name).unwrap_or_else(|| {
                    eprintln!("Error: unknown format '{name}' (json, ttl, nt, nq, rdf)");
                    std::process::exit(1);
                }));
                i += 2;
            }
            "--threshold" => {
                result.config.big_import_threshold = numeric_value(args, i, "--threshold");
                i += 2;
            }
            "--node-batch" => {
                result.config.node_batch_size = numeric_value(args, i, "--node-batch");
                i += 2;
            }
            "--edge-batch" => {
                result.config.edge_batch_size = numeric_value(args, i, "--edge-batch");
                i += 2;
            }
            "--verbose" | "-v" => {
                result.verbose = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                result.file = Some(PathBuf::from(arg));
                i += 1;
            }
            other => {
                eprintln!("Warning: ignoring unknown option '{other}'");
                i += 1;
            }
        }
    }

    result
}

fn required_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(v) => v,
        None => {
            eprintln!("Error: {flag} requires an argument");
            std::process::exit(1);
        }
    }
}

fn numeric_value(args: &[String], i: usize, flag: &str) -> usize {
    required_value(args, i, flag).parse().unwrap_or_else(|_| {
        eprintln!("Error: {flag} must be a number");
        std::process::exit(1);
    })
}

fn print_usage() {
    println!("Usage: kgv [OPTIONS] [FILE]");
    println!();
    println!("Arguments:");
    println!("  [FILE]                 Graph to load (.json, .ttl, .nt, .nq, .rdf)");
    println!();
    println!("Options:");
    println!("  -f, --format <NAME>    Input format, overriding detection");
    println!("      --threshold <N>    Element count at which imports are chunked (default: 6000)");
    println!("      --node-batch <N>   Nodes per import chunk (default: 3000)");
    println!("      --edge-batch <N>   Edges per import chunk (default: 4000)");
    println!("  -v, --verbose          Debug logging");
    println!("  -h, --help             Print this help message");
}

// ---- History ----

fn history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".kgv_history"))
}

// ---- Loading ----

fn load_file(session: &mut Shell, path: &PathBuf, format: Option<SourceFormat>) -> KgvResult<()> {
    let text = std::fs::read_to_string(path)?;
    let format = format.unwrap_or_else(|| SourceFormat::detect(&path.to_string_lossy(), &text));
    let start = Instant::now();
    session.start_ingest(text, format)?;

    loop {
        match session.poll() {
            SessionEvent::Idle => std::thread::sleep(Duration::from_millis(5)),
            SessionEvent::Progress(stage) => debug!(?stage, "ingest progress"),
            SessionEvent::ImportChunk { phase, applied } => {
                debug!(?phase, applied, "chunk applied");
            }
            SessionEvent::Imported(summary) => {
                println!(
                    "Loaded {} nodes, {} edges as {format}{} ({:.1}ms)\n",
                    summary.nodes,
                    summary.edges,
                    if summary.batched { ", chunked" } else { "" },
                    start.elapsed().as_secs_f64() * 1000.0
                );
                return Ok(());
            }
            SessionEvent::Failed(e) => return Err(e),
        }
    }
}

// ---- Queries ----

fn run_query(session: &mut Shell, line: &str) {
    let intent = match kgv_graph::parse(line) {
        Ok(intent) => intent,
        Err(e) => {
            eprintln!("{}", e.render("query", line));
            return;
        }
    };
    match session.run_intent(intent) {
        Ok(outcome) => print_outcome(session, &outcome),
        Err(e) => eprintln!("Error: {e}\n"),
    }
}

fn print_outcome(session: &Shell, outcome: &QueryOutcome) {
    match outcome {
        QueryOutcome::Reset => println!("Filters cleared.\n"),
        QueryOutcome::Help(text) => println!("{text}\n"),
        QueryOutcome::NodeMatches(ids) => {
            println!("{} node(s):", ids.len());
            for id in ids {
                print_node(session, *id);
            }
            println!();
        }
        QueryOutcome::EdgeMatches(ids) => {
            println!("{} edge(s):", ids.len());
            for id in ids {
                if let Some(edge) = session.graph().edge(id) {
                    println!("  {id}  {} -[{}]-> {}", edge.from, edge.label, edge.to);
                }
            }
            println!();
        }
        QueryOutcome::FilterAdded { id, label } => {
            let stats = session.stats();
            println!(
                "Added {id}: {label}  ({} of {} nodes visible)\n",
                stats.nodes - stats.hidden_nodes,
                stats.nodes
            );
        }
        QueryOutcome::Suggestions {
            query,
            filter,
            suggestions,
        } => {
            println!("No exact match for {query}. Did you mean:");
            for s in suggestions {
                let noun = match s.hits {
                    Hits::Nodes(_) => "node",
                    Hits::Edges(_) => "edge",
                };
                println!("  {}={}  ({} {noun}(s))", query.key, s.value, s.count);
            }
            if *filter {
                println!("No filter was added.");
            }
            println!();
        }
        QueryOutcome::NoResults { query } => println!("No results for {query}.\n"),
    }
}

fn print_node(session: &Shell, id: NodeId) {
    if let Some(node) = session.graph().node(id) {
        let hidden = if node.hidden { " (hidden)" } else { "" };
        println!("  {id}  {}  [{}]{hidden}", node.label, node.kind.type_name());
    }
}

// ---- Meta-commands ----

enum MetaResult {
    Continue,
    Quit,
    NotMeta,
}

fn handle_meta_command(cmd: &str, session: &mut Shell) -> MetaResult {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    let Some(head) = parts.first() else {
        return MetaResult::NotMeta;
    };

    match head.to_lowercase().as_str() {
        ":quit" | ":exit" | ":q" => {
            println!("Bye!");
            MetaResult::Quit
        }
        ":help" | ":h" => {
            print_help();
            MetaResult::Continue
        }
        ":load" => {
            match parts.get(1) {
                Some(path) => {
                    let format = parts.get(2).and_then(|n| SourceFormat::from_name(n));
                    if let Err(e) = load_file(session, &PathBuf::from(path), format) {
                        eprintln!("Error: {e}\n");
                    }
                }
                None => eprintln!("Usage: :load <FILE> [FORMAT]\n"),
            }
            MetaResult::Continue
        }
        ":export" => {
            match (parts.get(1), parts.get(2)) {
                (Some(kind), Some(path)) => export(session, kind, path),
                _ => eprintln!("Usage: :export json|ttl|nt <FILE>\n"),
            }
            MetaResult::Continue
        }
        ":filters" => {
            if session.filters().is_empty() {
                println!("No filters.\n");
            } else {
                for filter in session.filters() {
                    println!("  {}  {}", filter.id, filter.label());
                }
                println!();
            }
            MetaResult::Continue
        }
        ":unfilter" => {
            match parts.get(1).and_then(|s| parse_filter_id(s)) {
                Some(id) => match session.remove_filter(id) {
                    Ok(filter) => println!("Removed {}: {}\n", filter.id, filter.label()),
                    Err(e) => eprintln!("Error: {e}\n"),
                },
                None => eprintln!("Usage: :unfilter <ID>\n"),
            }
            MetaResult::Continue
        }
        ":stats" => {
            let stats = session.stats();
            println!(
                "Nodes:    {} ({} hidden, {} literal)",
                stats.nodes, stats.hidden_nodes, stats.literal_nodes
            );
            println!("Edges:    {} ({} hidden)", stats.edges, stats.hidden_edges);
            println!("Filters:  {}\n", session.filters().len());
            MetaResult::Continue
        }
        _ => MetaResult::NotMeta,
    }
}

fn parse_filter_id(s: &str) -> Option<FilterId> {
    s.trim_start_matches('f').parse().ok().map(FilterId)
}

fn export(session: &Shell, kind: &str, path: &str) {
    let rendered = match kind.to_lowercase().as_str() {
        "json" => session.export_json(),
        "ttl" | "turtle" => session.export_rdf(RdfFormat::Turtle),
        "nt" | "ntriples" => session.export_rdf(RdfFormat::NTriples),
        other => {
            eprintln!("Error: cannot export as '{other}'\n");
            return;
        }
    };
    match rendered.and_then(|text| std::fs::write(path, text).map_err(Into::into)) {
        Ok(()) => println!("Wrote {path}\n"),
        Err(e) => eprintln!("Error: {e}\n"),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  :help                       Show this help");
    println!("  :quit                       Exit the shell");
    println!("  :load FILE [FORMAT]         Load a graph, replacing the current one");
    println!("  :export json|ttl|nt FILE    Write the graph to FILE");
    println!("  :filters                    List standing filters");
    println!("  :unfilter ID                Remove one filter");
    println!("  :stats                      Node, edge and visibility counts");
    println!();
    println!("Anything else is a query; type help for the syntax.");
    println!();
    println!("Examples:");
    println!("  node:name=alice");
    println!("  filter edge:label=knows");
    println!("  reset");
    println!();
}
