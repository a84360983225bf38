use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use sg_core::TypeRegistry;
use sg_export::{ExportError, ExportOptions, Exporter, document_digest, save_with, to_json_string};
use sg_graph::{GraphError, GraphRegistry};
use sg_infer::{InferenceOptions, PropertyInferencer};
use sg_project::{ImportFile, ProjectError, build_type_registry, import_into, load};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sg")]
#[command(about = "Stratigraph CLI - stratigraphic graph import, inference and export", long_about = None)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an import file
    Validate {
        /// Path to the import file (.yaml, .yml or .json)
        file: PathBuf,
    },
    /// List the graphs of an import file
    Graphs {
        /// Path to the import file
        file: PathBuf,
    },
    /// Run temporal inference and report what it would add
    Infer {
        /// Path to the import file
        file: PathBuf,
    },
    /// Import, infer and write the multigraph document
    Export {
        /// Path to the import file
        file: PathBuf,
        /// Output JSON path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the document
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,
        /// Compact single-line document
        #[arg(long)]
        compact: bool,
        /// Fill `context` with the ontology mapping
        #[arg(long)]
        ontology_context: bool,
        /// Skip temporal inference
        #[arg(long)]
        no_infer: bool,
        /// Locale of the metadata keys
        #[arg(long)]
        locale: Option<String>,
    },
    /// Print the kind -> ontology mapping
    Ontology {
        /// Include extension kinds declared in this import file
        file: Option<PathBuf>,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Graphs { file } => cmd_graphs(&file),
        Commands::Infer { file } => cmd_infer(&file),
        Commands::Export {
            file,
            output,
            pretty,
            compact,
            ontology_context,
            no_infer,
            locale,
        } => {
            let overrides = ExportOverrides {
                pretty: (pretty || compact).then_some(pretty),
                ontology_context,
                no_infer,
                locale,
            };
            cmd_export(&file, output.as_deref(), overrides)
        }
        Commands::Ontology { file } => cmd_ontology(file.as_deref()),
    }
}

/// Load, register extension kinds and import every graph.
fn open(file: &Path) -> CliResult<(ImportFile, TypeRegistry, GraphRegistry)> {
    let import = load(file)?;
    let types = build_type_registry(&import)?;
    let registry = GraphRegistry::new();
    import_into(&import, &registry, &types)?;
    Ok((import, types, registry))
}

fn cmd_validate(file: &Path) -> CliResult<()> {
    println!("Validating import file: {}", file.display());
    let (_, _, registry) = open(file)?;
    println!("✓ Import file is valid ({} graphs)", registry.len());
    Ok(())
}

fn cmd_graphs(file: &Path) -> CliResult<()> {
    let (import, _, registry) = open(file)?;

    if registry.is_empty() {
        println!("No graphs found in import file");
        return Ok(());
    }
    println!("Graphs:");
    for handle in registry.snapshot() {
        let graph = handle.read()?;
        let name = graph
            .metadata
            .name
            .get(&import.export.locale)
            .cloned()
            .unwrap_or_default();
        let units = graph
            .nodes()
            .iter()
            .filter(|n| n.kind().is_stratigraphic())
            .count();
        let epochs = graph.epochs().count();
        println!(
            "  {} - {} ({} nodes, {} edges, {} units, {} epochs{})",
            graph.id(),
            name,
            graph.node_count(),
            graph.edge_count(),
            units,
            epochs,
            if graph.geo_position().is_some() {
                ""
            } else {
                ", no geo_position"
            }
        );
    }
    Ok(())
}

/// Run one inference pass per graph; returns the number of unresolved units.
fn run_inference(registry: &GraphRegistry, locale: &str, print: bool) -> CliResult<usize> {
    let inferencer = PropertyInferencer::with_options(InferenceOptions {
        locale: locale.to_string(),
        ..InferenceOptions::default()
    });
    let mut unresolved = 0;
    for handle in registry.snapshot() {
        let mut graph = handle.write()?;
        let report = inferencer.run(&mut graph);
        if print {
            println!(
                "  {}: {} units examined, {} properties inferred, {} already complete",
                report.graph_id,
                report.examined,
                report.records.len(),
                report.already_complete
            );
            for diagnostic in &report.diagnostics {
                println!("    ! {diagnostic}");
            }
        }
        unresolved += report.unresolved().count();
    }
    Ok(unresolved)
}

fn cmd_infer(file: &Path) -> CliResult<()> {
    let (import, _, registry) = open(file)?;
    println!("Temporal inference:");
    let unresolved = run_inference(&registry, &import.export.locale, true)?;
    if unresolved == 0 {
        println!("✓ Every unit has temporal bounds");
    } else {
        println!("{unresolved} unit(s) left without temporal bounds");
    }
    Ok(())
}

/// Command-line flags layered over the file's `export` settings.
struct ExportOverrides {
    pretty: Option<bool>,
    ontology_context: bool,
    no_infer: bool,
    locale: Option<String>,
}

fn cmd_export(file: &Path, output: Option<&Path>, overrides: ExportOverrides) -> CliResult<()> {
    let (import, types, registry) = open(file)?;
    let settings = import.export;
    let pretty = overrides.pretty.unwrap_or(settings.pretty);
    let locale = overrides.locale.unwrap_or(settings.locale);

    if settings.infer && !overrides.no_infer {
        // stdout carries only the document
        let unresolved = run_inference(&registry, &locale, false)?;
        if unresolved > 0 {
            tracing::warn!(unresolved, "units left without temporal bounds");
        }
    }

    let report = Exporter::new(types)
        .with_options(ExportOptions {
            locale,
            include_ontology_context: overrides.ontology_context || settings.ontology_context,
        })
        .export(&registry);

    match output {
        Some(path) => {
            save_with(&report.document, path, pretty)?;
            println!(
                "✓ Exported {} graphs to {}",
                report.document.multigraph.len(),
                path.display()
            );
            for skipped in &report.skipped {
                println!("  skipped {}: {}", skipped.graph_id, skipped.reason);
            }
            println!("  sha256: {}", document_digest(&report.document)?);
        }
        None => println!("{}", to_json_string(&report.document, pretty)?),
    }
    Ok(())
}

fn cmd_ontology(file: Option<&Path>) -> CliResult<()> {
    let types = match file {
        Some(path) => build_type_registry(&load(path)?)?,
        None => TypeRegistry::new(),
    };

    println!("Node kinds:");
    for (tag, term) in types.node_mappings() {
        println!("  {:<14} -> {}", tag, describe(&term));
    }
    println!("Edge kinds:");
    for (kind, term) in types.edge_mappings() {
        println!("  {:<14} -> {}", kind.as_str(), describe(term));
    }
    Ok(())
}

fn describe(term: &sg_core::OntologyTerm) -> String {
    let mut out = term.label().to_string();
    if let Some(code) = term.code() {
        out.push_str(&format!(" ({code})"));
    }
    if let Some(modifier) = term.modifier() {
        out.push_str(&format!(" [{modifier}]"));
    }
    if term.is_custom() {
        out.push_str(" *custom");
    }
    out
}
