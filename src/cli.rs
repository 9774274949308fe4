//! Minimal CLI: convert → (sdl | enums)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::convert::Converter;
use crate::emit::{self, Target};
use crate::registry::Registry;
use crate::schema::SchemaDocument;
use crate::types::Mode;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// convert JSON-Schema documents into GraphQL output/input types
#[derive(Parser, Debug)]
#[command(name = "jsonschema-gql", version)]
pub struct CommandLineInterface {
    /// debug logging on stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// convert and print every produced type as GraphQL SDL
    Sdl(SdlOut),
    /// convert and emit functions mapping enum values back to schema literals
    Enums(EnumsOut),
}

#[derive(Args, Debug)]
struct InputSettings {
    /// JSON Pointer to select the schema inside each file (e.g. /components/schemas/User)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each file; every output is one schema document
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns.
    /// All documents share one registry and are converted in the given order.
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct SdlOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .graphql file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct EnumsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// language of the emitted functions
    #[arg(long, value_enum, default_value_t = Target::JavaScript)]
    target: Target,

    /// qualified path of a single enum (e.g. `Person.role`); all enums if omitted
    #[arg(long)]
    path: Option<String>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// One loaded document and where it came from.
struct Source {
    label: String,
    document: SchemaDocument,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Reads and parses all inputs in parallel; order follows the input list.
    fn load_documents(&self) -> Result<Vec<Source>> {
        let source_paths =
            resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        // `SchemaDocument` is `!Send`, so only raw JSON crosses threads
        let per_file = source_paths
            .par_iter()
            .map(|path| self.load_file(path))
            .collect::<Result<Vec<_>>>()?;
        per_file
            .into_iter()
            .flatten()
            .map(|(label, value)| {
                let document = SchemaDocument::from_value(value)
                    .with_context(|| format!("invalid schema document ({label})"))?;
                Ok(Source { label, document })
            })
            .collect()
    }

    /// Labelled JSON documents of one file, after pointer selection and jq.
    fn load_file(&self, source_path: &Path) -> Result<Vec<(String, serde_json::Value)>> {
        let source_path_str = source_path.to_string_lossy().to_string();
        let source = std::fs::read_to_string(source_path)
            .with_context(|| format!("failed to read source file ({source_path_str})"))?;
        let json_value = serde_json::from_str::<serde_json::Value>(&source)
            .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;

        let json_value = match self.json_pointer.as_deref() {
            None => json_value,
            Some(pointer) => json_value
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| anyhow!("JSON pointer {pointer} selects nothing in {source_path_str}"))?,
        };

        let values = match self.jq_expr.as_ref() {
            None => vec![json_value],
            Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, &json_value).with_context(|| {
                format!("failed to apply jq expression to source file ({source_path_str})")
            })?,
        };

        let many = values.len() > 1;
        Ok(values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                let label = if many { format!("{source_path_str}[{i}]") } else { source_path_str.clone() };
                (label, value)
            })
            .collect())
    }

    /// Converts every document into one registry and resolves the whole graph.
    fn convert_all(&self) -> Result<Registry> {
        let sources = self.load_documents()?;
        let mut converter = Converter::new();
        for source in &sources {
            converter
                .convert(&source.document)
                .with_context(|| format!("failed to convert {}", source.label))?;
        }
        let registry = converter.finish().context("failed to resolve converted types")?;
        eprintln!(
            "{} {} document(s) → {} output / {} input types, {} enums",
            "converted".green().bold(),
            sources.len(),
            registry.len(Mode::Output),
            registry.len(Mode::Input),
            registry.enum_types().count(),
        );
        Ok(registry)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// stderr subscriber; `RUST_LOG` wins over `--verbose`.
    pub fn init_logging(&self) {
        let default = if self.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Sdl(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let mut registry = target.input_settings.convert_all()?;
                let sdl = crate::sdl::print_registry(&mut registry)?;
                write_output(target.out.as_deref(), &sdl)
            }
            Command::Enums(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let registry = target.input_settings.convert_all()?;
                let src = match target.path.as_deref() {
                    Some(path) => emit::enum_converter(&registry, path, target.target)?,
                    None => emit::all_enum_converters(&registry, target.target)?,
                };
                if src.is_empty() {
                    eprintln!("{} no enums in the given documents", "warning:".yellow().bold());
                }
                write_output(target.out.as_deref(), &src)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), out.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Literal paths pass through untouched; glob patterns expand in sorted order and
/// have to match at least one file.
fn resolve_file_path_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(pattern));
            continue;
        }
        let mut matched = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern {pattern}"))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("failed to expand {pattern}"))?;
        if matched.is_empty() {
            bail!("glob pattern matched no files: {pattern}");
        }
        matched.sort();
        paths.extend(matched);
    }
    if paths.is_empty() {
        bail!("no input files");
    }
    Ok(paths)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jsonschema-gql-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn settings(input: Vec<String>) -> InputSettings {
        InputSettings { json_pointer: None, jq_expr: None, input }
    }

    #[test]
    fn parses_subcommands() {
        let cli = CommandLineInterface::try_parse_from([
            "jsonschema-gql", "enums", "-i", "a.json", "b.json", "--target", "rust", "--path", "A.kind",
        ])
        .unwrap();
        match cli.cmd {
            Command::Enums(target) => {
                assert_eq!(target.target, Target::Rust);
                assert_eq!(target.path.as_deref(), Some("A.kind"));
                assert_eq!(target.input_settings.input, ["a.json", "b.json"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = CommandLineInterface::try_parse_from(["jsonschema-gql", "sdl", "-i", "x.json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.cmd, Command::Sdl(ref t) if t.input_settings.jq_expr.is_none()));

        assert!(CommandLineInterface::try_parse_from(["jsonschema-gql", "sdl"]).is_err());
    }

    #[test]
    fn glob_inputs_are_sorted_and_must_match() {
        let dir = scratch_dir("glob");
        for name in ["b.json", "a.json"] {
            std::fs::write(dir.join(name), "{}").unwrap();
        }
        let pattern = format!("{}/*.json", dir.display());
        let paths = resolve_file_path_patterns(&[pattern]).unwrap();
        let names = paths.iter().map(|p| p.file_name().unwrap().to_string_lossy().to_string()).collect::<Vec<_>>();
        assert_eq!(names, ["a.json", "b.json"]);

        let missing = format!("{}/*.yaml", dir.display());
        assert!(resolve_file_path_patterns(&[missing]).is_err());

        // literal paths are not checked here, reading them reports the error
        let literal = resolve_file_path_patterns(&["not/there.json".to_string()]).unwrap();
        assert_eq!(literal, [PathBuf::from("not/there.json")]);
    }

    #[test]
    fn converts_files_with_pointer_and_jq() {
        let dir = scratch_dir("load");
        let envelope = serde_json::json!({
            "schemas": [
                { "id": "first", "type": "object", "properties": { "kind": { "type": "string", "enum": ["a", "b"] } } },
                { "id": "second", "type": "object", "properties": { "first": { "type": "string" } } }
            ]
        });
        let file = dir.join("envelope.json");
        std::fs::write(&file, envelope.to_string()).unwrap();
        let input = vec![file.to_string_lossy().to_string()];

        let mut jq = settings(input.clone());
        jq.jq_expr = Some(".schemas[]".to_string());
        let sources = jq.load_documents().unwrap();
        assert_eq!(sources.len(), 2);
        assert!(sources[1].label.ends_with("[1]"));

        let registry = jq.convert_all().unwrap();
        assert!(registry.output("First").is_some());
        assert!(registry.input("SecondInput").is_some());
        assert!(registry.enum_values("First.kind").is_some());

        let mut pointer = settings(input);
        pointer.json_pointer = Some("/schemas/1".to_string());
        let sources = pointer.load_documents().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].document.id.as_deref(), Some("second"));

        pointer.json_pointer = Some("/nope".to_string());
        assert!(pointer.load_documents().is_err());
    }
}
