use clap::Parser;
use itertools::Itertools;
use lantu::prelude::*;
use std::time::Instant;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Loads a blueprint document and evaluates it on a headless platform
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the blueprint JSON file
    blueprint_path: Option<String>,

    /// Pins to evaluate, as `node.pin`; defaults to every output that feeds nothing
    #[arg(short, long = "output", value_name = "NODE.PIN")]
    outputs: Vec<String>,

    /// Number of evaluation passes to run against the same graph
    #[arg(short = 'n', long, default_value_t = 1)]
    passes: usize,

    /// Maximum dependency depth of a single pass
    #[arg(long, default_value_t = Evaluator::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print the registered node kinds grouped by category and exit
    #[arg(long)]
    list_kinds: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,lantu=info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let registry = NodeRegistry::with_defaults();

    if cli.list_kinds {
        print_palette(&registry);
        return;
    }

    let Some(blueprint_path) = cli.blueprint_path.as_deref() else {
        exit_with_error("A blueprint path is required unless --list-kinds is given.");
    };
    run_blueprint(&registry, blueprint_path, &cli);
}

fn print_palette(registry: &NodeRegistry) {
    for (category, entries) in registry.palette() {
        println!("{}:", category);
        for entry in entries {
            println!("  {}", entry.kind);
        }
    }
}

fn run_blueprint(registry: &NodeRegistry, path: &str, cli: &Cli) {
    let total_start = Instant::now();

    println!("Loading blueprint from: {}", path);
    let load_start = Instant::now();
    let definition = BlueprintDefinition::from_path(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read blueprint: {}", e)));
    let mut loaded = definition
        .build(registry)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to build graph: {}", e)));
    let load_duration = load_start.elapsed();

    let targets: Vec<PinId> = if cli.outputs.is_empty() {
        loaded.terminal_outputs()
    } else {
        cli.outputs
            .iter()
            .map(|reference| loaded.pin(reference))
            .collect::<std::result::Result<_, _>>()
            .unwrap_or_else(|e| exit_with_error(&format!("Invalid output reference: {}", e)))
    };
    if targets.is_empty() {
        exit_with_error("The blueprint has no outputs to evaluate.");
    }

    println!(
        "Graph ready: {} nodes, {} links, {} requested pins",
        loaded.graph.len(),
        loaded.graph.connections().count(),
        targets.len()
    );

    let evaluator = Evaluator::builder(Platform::headless())
        .max_depth(cli.max_depth)
        .build();

    let eval_start = Instant::now();
    let mut failed = false;
    for pass in 1..=cli.passes.max(1) {
        let report = evaluator.evaluate(&mut loaded.graph, &targets);
        println!("\n--- Pass {} ---", pass);
        println!(
            "Executed: {}",
            report
                .executed
                .iter()
                .map(|&node| describe_node(&loaded.graph, node))
                .join(" -> ")
        );
        for (pin, result) in &report.results {
            let label = describe_pin(&loaded.graph, *pin);
            match result {
                ExecuteResult::Ok => println!("  {} = {}", label, loaded.graph[*pin].value()),
                ExecuteResult::Error { node, message } => println!(
                    "  {} -> error in {}: {}",
                    label,
                    describe_node(&loaded.graph, *node),
                    message
                ),
            }
        }
        failed |= report.has_error();
    }
    let eval_duration = eval_start.elapsed();

    println!("\n--- Performance Summary ---");
    println!("Blueprint Loading:    {:?}", load_duration);
    println!("Evaluation:           {:?}", eval_duration);
    println!("-----------------------------");
    println!("Total Execution:      {:?}", total_start.elapsed());

    if failed {
        std::process::exit(1);
    }
}

fn describe_node(graph: &Graph, node: NodeId) -> String {
    match graph.node(node) {
        Some(found) => format!("{} ({})", found.name(), node),
        None => node.to_string(),
    }
}

fn describe_pin(graph: &Graph, pin: PinId) -> String {
    let pin = &graph[pin];
    format!("{}.{}", describe_node(graph, pin.node()), pin.label())
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
