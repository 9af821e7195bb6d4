//! CBash CLI - Command-line tool for inspecting plugin records.
//!
//! This is the main entry point for the `cbash` command-line application.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cbash::prelude::*;
use cbash::records::dump;

/// CBash - plugin record inspection tool
#[derive(Parser)]
#[command(name = "cbash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the CBash shared library
    #[arg(short, long, global = true, env = "CBASH_LIBRARY", default_value = "CBash.dll")]
    library: PathBuf,

    /// Game data directory
    #[arg(short, long, global = true, env = "CBASH_DATA_PATH", default_value = ".")]
    data: PathBuf,

    /// Game the plugins belong to (oblivion, fallout3, newvegas, skyrim)
    #[arg(short, long, global = true, default_value = "oblivion")]
    game: GameMode,

    /// Encoding of string fields (windows-1252, utf-8)
    #[arg(short, long, global = true, default_value = "windows-1252")]
    encoding: TextEncoding,

    /// Plugins to load, in load order
    #[arg(short, long = "plugin", global = true, value_delimiter = ',')]
    plugins: Vec<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List loaded mods in load order
    Mods,

    /// List the records of a type
    Records {
        /// Record type, such as NPC_
        signature: Signature,

        /// Only list winning records
        #[arg(short, long)]
        winning: bool,
    },

    /// Print a record's fields
    Dump {
        /// Record type, such as NPC_
        signature: Signature,

        /// Editor id, or a FormID written as `Master.esm:0x00014C`
        target: String,

        /// Print JSON instead of text
        #[arg(short, long)]
        json: bool,
    },

    /// List records that more than one mod overrides, winning mod first
    Conflicts {
        /// Record type, such as NPC_
        signature: Signature,
    },

    /// Export winning records of every known type as JSON
    Export {
        /// Output directory
        #[arg(short, long, env = "OUTPUT_FOLDER")]
        output: PathBuf,

        /// Only export these record types
        #[arg(short, long, value_delimiter = ',')]
        signatures: Vec<Signature>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let engine = NativeEngine::open(&cli.library)
        .with_context(|| format!("Failed to load CBash from {}", cli.library.display()))?;
    let collection = open_collection(&engine, &cli)?;

    let result = match &cli.command {
        Commands::Mods => cmd_mods(&collection),
        Commands::Records { signature, winning } => cmd_records(&collection, *signature, *winning),
        Commands::Dump { signature, target, json } => cmd_dump(&collection, *signature, target, *json),
        Commands::Conflicts { signature } => cmd_conflicts(&collection, *signature),
        Commands::Export { output, signatures } => cmd_export(&collection, output, signatures),
    };

    collection.delete().context("Failed to close collection")?;
    result
}

fn open_collection<'e>(engine: &'e NativeEngine, cli: &Cli) -> Result<Collection<'e, NativeEngine>> {
    if cli.plugins.is_empty() {
        bail!("No plugins given; pass them with --plugin");
    }

    let data_path = cli.data.to_str().context("Data path is not valid UTF-8")?;
    let config = AccessorConfig {
        text_encoding: cli.encoding,
    };
    let collection = Collection::create(engine, data_path, cli.game)
        .context("Failed to create collection")?
        .with_config(config);

    for plugin in &cli.plugins {
        collection
            .add_mod(plugin, ModFlags::editing())
            .with_context(|| format!("Failed to add {}", plugin))?;
    }

    let start = Instant::now();
    collection.load().context("Failed to load collection")?;
    info!(mods = cli.plugins.len(), elapsed = ?start.elapsed(), "loaded collection");

    Ok(collection)
}

fn cmd_mods(collection: &Collection<'_, NativeEngine>) -> Result<()> {
    for file in collection.all_mods() {
        let name = file.name().unwrap_or_default();
        match file.load_order() {
            Some(order) => println!("{:02X} {}", order, name),
            None => println!("-- {}", name),
        }
    }

    Ok(())
}

fn cmd_records(collection: &Collection<'_, NativeEngine>, signature: Signature, winning: bool) -> Result<()> {
    let mut count = 0;
    for file in collection.mods() {
        for record in file.records(signature)? {
            if winning && !record.is_winning(false)? {
                continue;
            }
            println!("{} {}", record.form_id(), record.editor_id().unwrap_or_default());
            count += 1;
        }
    }

    println!("\nTotal: {} records", count);

    Ok(())
}

fn cmd_dump(collection: &Collection<'_, NativeEngine>, signature: Signature, target: &str, json: bool) -> Result<()> {
    let form_id = parse_form_id(target)?;
    let record = collection
        .winning_records(signature)?
        .into_iter()
        .find(|r| match &form_id {
            Some(form_id) => r.form_id() == *form_id,
            None => r.editor_id().is_some_and(|eid| eid.eq_ignore_ascii_case(target)),
        })
        .with_context(|| format!("No {} record matches {}", signature, target))?;

    if json {
        let value = dump::to_json(&record)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        dump::dump(&record, 0, &mut out)?;
        out.flush()?;
    }

    Ok(())
}

fn cmd_conflicts(collection: &Collection<'_, NativeEngine>, signature: Signature) -> Result<()> {
    let mut count = 0;
    for record in collection.winning_records(signature)? {
        let Some(versions) = override_chain(&record) else {
            continue;
        };

        println!("{} {}", record.form_id(), record.editor_id().unwrap_or_default());
        for version in versions {
            println!("  {}", owner_name(&version));
        }
        count += 1;
    }

    println!("\nTotal: {} conflicting records", count);

    Ok(())
}

/// Every version of a record, winner first, when more than one mod
/// overrides the defining version.
fn override_chain<'e, E: Engine + ?Sized>(record: &RecordView<'e, E>) -> Option<Vec<RecordView<'e, E>>> {
    let versions = record.conflicts(false);
    (versions.len() > 2).then_some(versions)
}

fn owner_name<E: Engine + ?Sized>(record: &RecordView<'_, E>) -> String {
    record
        .mod_id()
        .and_then(|id| record.accessor().engine().mod_name(id))
        .unwrap_or_default()
}

fn cmd_export(collection: &Collection<'_, NativeEngine>, output: &Path, signatures: &[Signature]) -> Result<()> {
    let signatures = if signatures.is_empty() {
        collection.registry().signatures()
    } else {
        signatures.to_vec()
    };

    let mut records = Vec::new();
    for signature in &signatures {
        match collection.winning_records(*signature) {
            Ok(found) => records.extend(found),
            Err(e) => warn!(%signature, error = %e, "skipping record type"),
        }
    }

    println!("Exporting {} records to {}...", records.len(), output.display());

    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut exported = 0;
    let mut errors = 0;

    for record in &records {
        let output_path = output
            .join(record.signature().to_string())
            .join(export_file_name(record));

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        match dump::to_json(record) {
            Ok(value) => {
                fs::write(&output_path, serde_json::to_string_pretty(&value)?)?;
                debug!(path = %output_path.display(), "exported record");
                exported += 1;
            }
            Err(e) => {
                eprintln!("Error exporting {}: {}", record.form_id(), e);
                errors += 1;
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    println!(
        "Exported {} records in {:?} ({} errors)",
        exported,
        start.elapsed(),
        errors
    );

    Ok(())
}

/// `Master.esm:0x00014C` as a FormID. Anything without a colon is an editor id.
fn parse_form_id(target: &str) -> Result<Option<FormId>> {
    let Some((master, local)) = target.rsplit_once(':') else {
        return Ok(None);
    };
    let digits = local.trim_start_matches("0x").trim_start_matches("0X");
    let local = u32::from_str_radix(digits, 16).with_context(|| format!("Invalid FormID: {}", target))?;
    if local > 0x00FF_FFFF {
        bail!("FormID local part exceeds 24 bits: {}", target);
    }
    Ok(Some(FormId::long(master, local)))
}

/// `<master>_<local>.json`, or the editor id for records without a FormID.
fn export_file_name(record: &RecordView<'_, NativeEngine>) -> String {
    let form_id = record.form_id();
    match (form_id.master(), form_id.local()) {
        (Some(master), Some(local)) => format!("{}_{:06X}.json", master.replace('.', "_"), local),
        _ => format!("{}.json", record.editor_id().unwrap_or_else(|| record.id().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_chain_needs_two_overriding_mods() {
        let engine = MemoryEngine::new();
        SchemaRegistry::global().install(&engine);
        let collection = Collection::create(&engine, "Data", GameMode::Oblivion).unwrap();
        let master = collection.add_mod("Oblivion.esm", ModFlags::editing()).unwrap();
        let first = collection.add_mod("First.esp", ModFlags::editing()).unwrap();
        let second = collection.add_mod("Second.esp", ModFlags::editing()).unwrap();

        let base = master.create_record(Signature::new(*b"NPC_"), Some("Guard")).unwrap();
        let single = base.copy_as_override(first.id(), None).unwrap();
        assert!(override_chain(&single).is_none());

        let winner = base.copy_as_override(second.id(), None).unwrap();
        let chain = override_chain(&winner).unwrap();
        let owners: Vec<String> = chain.iter().map(owner_name).collect();
        assert_eq!(owners, ["Second.esp", "First.esp", "Oblivion.esm"]);
    }

    #[test]
    fn test_parse_form_id() {
        assert_eq!(parse_form_id("GuardEID").unwrap(), None);
        assert_eq!(
            parse_form_id("Oblivion.esm:0x00014C").unwrap(),
            Some(FormId::long("Oblivion.esm", 0x14C))
        );
        assert_eq!(parse_form_id("Patch.esp:800").unwrap(), Some(FormId::long("Patch.esp", 0x800)));
        assert!(parse_form_id("Patch.esp:zz").is_err());
        assert!(parse_form_id("Patch.esp:0x01000000").is_err());
    }
}
