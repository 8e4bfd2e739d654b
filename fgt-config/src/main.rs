use anyhow::{Context, Result};
use clap::Parser;
use fgt_config_core::{parse_file, Config, Container, SectionCatalog};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod inspect;
mod report;

use cli::{Cli, Command, GetArgs, InspectArgs, OutputFormat, SectionsArgs, VdomsArgs};
use inspect::{render_flat, render_tree};
use report::{
    build_vdom_report, render_node_value, render_sections, render_vdoms, SectionReport,
    SectionRow,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Inspect(args) => run_inspect(args),
        Command::Get(args) => run_get(args),
        Command::Sections(args) => run_sections(args),
        Command::Vdoms(args) => run_vdoms(args),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "fgt_config=debug,fgt_config_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(path: &std::path::Path) -> Result<Config> {
    let config =
        parse_file(path).with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(
        file = %path.display(),
        has_vdom = config.has_vdom(),
        "loaded configuration"
    );
    Ok(config)
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let config = load(&args.file)?;
    let scope = config.scope(args.vdom.as_deref())?;

    let node = match &args.path {
        Some(path) => Some(
            scope
                .lookup(path)
                .with_context(|| format!("path '{path}' not found"))?,
        ),
        None => None,
    };

    match args.format {
        OutputFormat::Json => {
            let json = match node {
                Some(node) => serde_json::to_string_pretty(node)?,
                None => serde_json::to_string_pretty(scope)?,
            };
            println!("{json}");
        }
        OutputFormat::Text if args.flat => match node {
            Some(node) => print!("{}", render_flat(node.walk("/"))),
            None => print!("{}", render_flat(scope.walk("/"))),
        },
        OutputFormat::Text => match node {
            Some(node) => match node.children() {
                Some(children) => print!("{}", render_tree(node.name(), children, args.depth)),
                None => println!("{} = {}", node.name(), render_node_value(node)),
            },
            None => print!("{}", render_tree(scope.name(), scope.children(), args.depth)),
        },
    }

    Ok(())
}

fn run_get(args: GetArgs) -> Result<()> {
    let config = load(&args.file)?;
    let scope = config.scope(args.vdom.as_deref())?;
    let node = scope
        .lookup(&args.path)
        .with_context(|| format!("path '{}' not found", args.path))?;

    println!("{}", render_node_value(node));
    Ok(())
}

fn run_sections(args: SectionsArgs) -> Result<()> {
    let config = load(&args.file)?;
    let scope = config.scope(args.vdom.as_deref())?;

    let catalog = match &args.catalog {
        Some(path) => SectionCatalog::load(path)?,
        None => SectionCatalog::default(),
    };

    let report = SectionReport {
        scope: scope.name().to_string(),
        sections: scope
            .sections(args.prefix.as_deref())
            .map(|(name, node)| SectionRow {
                name: name.to_string(),
                kind: node.kind(),
                entries: node.children().map_or(0, |c| c.len()),
            })
            .collect(),
        mismatches: catalog.check(scope),
    };

    match args.format {
        OutputFormat::Text => println!("{}", render_sections(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn run_vdoms(args: VdomsArgs) -> Result<()> {
    let config = load(&args.file)?;
    let report = build_vdom_report(&config);

    match args.format {
        OutputFormat::Text => println!("{}", render_vdoms(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
