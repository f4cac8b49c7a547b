use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Value};
use toolconf_inline::{open_source, ConfItem, ConfSource};
use toolconf_store::{FileBackend, StoreConfig, StoreView, VersionedStore};
use toolconf_types::{Document, ExpectedVersion, VersionStamp};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = store_config(&cli)?;
    match cli.command {
        Command::Init(_) => cmd_init(&config),
        Command::Get(args) => cmd_get(&config, args, &cli.format),
        Command::Update(args) => cmd_update(&config, args),
        Command::Apply(args) => cmd_apply(&config, args),
        Command::Inline(args) => cmd_inline(args, &cli.format),
        Command::Load(args) => cmd_load(&config, args),
    }
}

/// Settings file first, then `--path` on top.
fn store_config(cli: &Cli) -> anyhow::Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(file) => StoreConfig::load(file)?,
        None => StoreConfig::default(),
    };
    if let Some(path) = &cli.path {
        config.path = path.clone();
    }
    Ok(config)
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_committed(store: &VersionedStore<FileBackend>, version: VersionStamp) {
    println!(
        "{} Saved {} at version {}",
        "✓".green().bold(),
        store.backend().path().display().to_string().bold(),
        version.short_hex().yellow()
    );
}

fn cmd_init(config: &StoreConfig) -> anyhow::Result<()> {
    let store = config.open();
    store.ensure_exists()?;
    let snapshot = store.read()?;
    println!(
        "{} Managed configuration at {}",
        "✓".green().bold(),
        store.backend().path().display().to_string().bold()
    );
    println!("  Version: {}", snapshot.version.to_hex().yellow());
    Ok(())
}

fn cmd_get(config: &StoreConfig, args: GetArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let store = config.open();
    let snapshot = StoreView::new(&store).get()?;
    if args.version_only {
        println!("{}", snapshot.version.to_hex());
        return Ok(());
    }
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => {
            println!("Version: {}", snapshot.version.to_hex().yellow());
            let items = snapshot.document.items.as_deref().unwrap_or_default();
            println!("Items: {}", items.len().to_string().bold());
            for item in items {
                print_item(ConfItem::new(item), 1);
            }
        }
    }
    Ok(())
}

fn print_item(item: ConfItem<'_>, depth: usize) {
    let indent = "  ".repeat(depth);
    let kind = item.kind().unwrap_or("?");
    let id = item.get_str("id").unwrap_or("-");
    match item.get_str("name") {
        Some(name) => println!("{indent}{} {} ({})", kind.cyan(), id, name.dimmed()),
        None => println!("{indent}{} {}", kind.cyan(), id),
    }
    if let Some(labels) = item.labels() {
        println!("{indent}  labels: {}", labels.join(", "));
    }
    for child in item.children().unwrap_or_default() {
        print_item(child, depth + 1);
    }
}

fn cmd_update(config: &StoreConfig, args: UpdateArgs) -> anyhow::Result<()> {
    let store = config.open();
    let version = if args.force {
        let document: Document = serde_json::from_value(read_json(&args.document)?)?;
        store.update(&document, ExpectedVersion::Force)?
    } else {
        let expect = args.expect.unwrap_or_default();
        let expected = VersionStamp::from_hex(&expect)
            .with_context(|| format!("invalid version `{expect}`"))?;
        let payload = json!({
            "version": expected,
            "document": read_json(&args.document)?,
        });
        StoreView::new(&store).update(payload)?
    };
    print_committed(&store, version);
    Ok(())
}

fn cmd_apply(config: &StoreConfig, args: ApplyArgs) -> anyhow::Result<()> {
    let payload = match read_json(&args.actions)? {
        Value::Array(actions) => json!({ "actions": actions }),
        other => other,
    };
    let store = config.open();
    let version = StoreView::new(&store).update(payload)?;
    print_committed(&store, version);
    Ok(())
}

fn cmd_inline(args: InlineArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let source = open_source(&args.source)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(source.document())?),
        OutputFormat::Text => {
            if let Some(tool_path) = source.tool_path() {
                println!("Tool path: {}", tool_path.bold());
            }
            println!("Monitor: {}", source.monitor());
            for item in source.items() {
                print_item(item, 1);
            }
        }
    }
    Ok(())
}

fn cmd_load(config: &StoreConfig, args: LoadArgs) -> anyhow::Result<()> {
    let source = open_source(&args.source)?;
    let store = config.open();
    let version = store.update(source.document(), ExpectedVersion::Force)?;
    print_committed(&store, version);
    Ok(())
}
