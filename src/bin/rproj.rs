//! rproj - Record projection CLI tool
//!
//! Deep-merges and projects YAML/JSON records from the command line.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use record_projection::value::{self, Value};
use record_projection::{merge_values, Projection, Spec};

#[derive(Parser)]
#[command(name = "rproj", version)]
#[command(about = "Deep-merge and project YAML/JSON records", long_about = None)]
struct Cli {
    /// Output location. Use '-' for stdout
    #[arg(short, long, default_value = "-", global = true)]
    output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json, global = true)]
    format: Format,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Command {
    /// Deep-merge record files; later files win
    Merge {
        /// Record files (YAML or JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Project a record, or a list of records, through layered specs
    Project {
        /// Record file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Projection spec files, merged in order; later files win
        #[arg(short, long = "spec")]
        specs: Vec<PathBuf>,

        /// Print the merged spec instead of projecting
        #[arg(long)]
        print_spec: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(cli.debug)
        .with_writer(io::stderr)
        .init();

    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .with_context(|| format!("Failed to create output file {:?}", cli.output))?,
        )
    };

    let result = match cli.command {
        Command::Merge { files } => merge(&files)?,
        Command::Project {
            input,
            specs,
            print_spec,
        } => project(&input, &specs, print_spec)?,
    };

    write_value(&result, cli.format, &mut output)
}

fn merge(files: &[PathBuf]) -> Result<Value> {
    let layers = files
        .iter()
        .map(|file| read_value(file))
        .collect::<Result<Vec<_>>>()?;
    info!(layers = layers.len(), "merging records");

    let refs: Vec<&Value> = layers.iter().collect();
    Ok(merge_values(&refs).into_owned())
}

fn project(input: &Path, spec_files: &[PathBuf], print_spec: bool) -> Result<Value> {
    let specs = spec_files
        .iter()
        .map(|file| {
            let raw = read_value(file)?;
            Spec::from_value(&raw).with_context(|| format!("Invalid projection spec in {:?}", file))
        })
        .collect::<Result<Vec<_>>>()?;

    let refs: Vec<&Spec> = specs.iter().collect();
    if print_spec {
        let projection = Projection::new(&refs).context("Cannot build projection")?;
        return Ok(projection.spec().to_value());
    }

    // Lists are dispatched before specs are counted, so an empty list
    // projects fine without any spec.
    let record = read_value(input)?;
    info!(specs = specs.len(), "projecting {:?}", input);
    let projected = record_projection::project(&record, &refs).context("Cannot project record")?;
    Ok(projected.into_owned())
}

fn read_value(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))?;
    debug!(bytes = content.len(), "read {:?}", path);

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        value::from_yaml(&content).with_context(|| format!("Failed to parse YAML in {:?}", path))
    } else {
        value::from_json(&content).with_context(|| format!("Failed to parse JSON in {:?}", path))
    }
}

fn write_value(value: &Value, format: Format, output: &mut dyn Write) -> Result<()> {
    match format {
        Format::Json => {
            let json = value::to_json_pretty(value).context("Failed to serialize result")?;
            writeln!(output, "{}", json)?;
        }
        Format::Yaml => {
            let yaml = value::to_yaml(value).context("Failed to serialize result")?;
            write!(output, "{}", yaml)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_fixture(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rproj-{}-{}", std::process::id(), name));
        fs::write(&path, content).expect("fixture should be writable");
        path
    }

    #[test]
    fn test_project_empty_list_without_specs() {
        let input = write_fixture("empty-list.json", "[]");
        assert_eq!(project(&input, &[], false).unwrap(), Value::List(vec![]));
    }

    #[test]
    fn test_project_record_without_specs_fails() {
        let input = write_fixture("record.json", r#"{"a": 1}"#);
        let err = project(&input, &[], false).unwrap_err();
        assert!(format!("{:#}", err).contains("You must provide at least one projection spec."));
    }

    #[test]
    fn test_project_layers_spec_files() {
        let input = write_fixture("users.yaml", "- id: 1\n  name: ann\n- id: 2\n  name: bob\n");
        let base = write_fixture("base.json", r#"{"id": 1, "name": 1}"#);
        let rename = write_fixture("rename.yaml", "name: login\n");

        let projected = project(&input, &[base.clone(), rename.clone()], false).unwrap();
        assert_eq!(
            projected,
            value::from_json(r#"[{"id": 1, "login": "ann"}, {"id": 2, "login": "bob"}]"#).unwrap()
        );

        let merged_spec = project(&input, &[base, rename], true).unwrap();
        assert_eq!(merged_spec, value::from_json(r#"{"id": 1, "name": "login"}"#).unwrap());
    }

    #[test]
    fn test_merge_record_files() {
        let first = write_fixture("first.json", r#"{"a": {"b": 1}, "c": 1}"#);
        let second = write_fixture("second.yml", "a:\n  d: 2\nc: 3\n");
        assert_eq!(
            merge(&[first, second]).unwrap(),
            value::from_json(r#"{"a": {"b": 1, "d": 2}, "c": 3}"#).unwrap()
        );
    }
}
