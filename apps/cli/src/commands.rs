//! `compile` and `check` subcommands.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde_json::{Map, Value};
use sieve_filter::{
    ApiVersion, CompileOptions, Compiled, Compiler, Diagnostic, FindOptions, Params,
};

use crate::config::Config;

#[derive(Args, Debug, Default)]
pub struct CompileArgs {
    /// Params JSON file; reads stdin when absent or `-`
    pub input: Option<PathBuf>,

    /// Wire version of the input (v2 or v3)
    #[arg(short = 'a', long = "api-version")]
    pub api_version: Option<ApiVersion>,

    /// Fail when no clause was parsed
    #[arg(long)]
    pub required: bool,

    /// Include the parsed count and diagnostics
    #[arg(long)]
    pub diagnostics: bool,

    /// Include sort, skip and limit
    #[arg(long)]
    pub options: bool,

    /// Single-line JSON output
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Params JSON file; reads stdin when absent or `-`
    pub input: Option<PathBuf>,

    /// Wire version of the input (v2 or v3)
    #[arg(short = 'a', long = "api-version")]
    pub api_version: Option<ApiVersion>,
}

pub fn run_compile(args: &CompileArgs, config: &Config) -> anyhow::Result<String> {
    let version = resolve_version(args.api_version, config)?;
    let params = read_params(args.input.as_deref(), version)?;
    let required = args.required || config.compile.required;

    let compiled = Compiler::new(CompileOptions { required })
        .compile(&params)
        .context("Failed to compile filter")?;

    if !args.diagnostics {
        log_diagnostics(&compiled);
    }

    let output = compile_output(&params, &compiled, args);
    render(&output, config.compile.pretty && !args.compact)
}

pub fn run_check(args: &CheckArgs, config: &Config) -> anyhow::Result<String> {
    let version = resolve_version(args.api_version, config)?;
    let params = read_params(args.input.as_deref(), version)?;

    let compiled = Compiler::new(CompileOptions::required())
        .compile(&params)
        .context("Check failed")?;

    tracing::info!(
        parsed = compiled.parsed,
        clauses = compiled.clauses.len(),
        "Params accepted"
    );

    let mut output = Map::new();
    output.insert("parsed".to_string(), Value::from(compiled.parsed));
    output.insert("diagnostics".to_string(), diagnostics_json(&compiled));
    render(&output, config.compile.pretty)
}

fn resolve_version(flag: Option<ApiVersion>, config: &Config) -> anyhow::Result<ApiVersion> {
    match flag {
        Some(v) => Ok(v),
        None => config.api_version().map_err(anyhow::Error::msg),
    }
}

fn read_params(input: Option<&Path>, version: ApiVersion) -> anyhow::Result<Params> {
    let raw = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    tracing::debug!(%version, bytes = raw.len(), "Decoding params");
    Params::from_json_str(&raw, version).context("Failed to decode params")
}

fn compile_output(params: &Params, compiled: &Compiled, args: &CompileArgs) -> Map<String, Value> {
    let mut output = Map::new();
    output.insert("filter".to_string(), compiled.clauses.to_json());

    if args.options {
        let options = FindOptions::from_params(params);
        output.insert("sort".to_string(), Value::Object(options.sort_document()));
        if let Some(skip) = options.skip {
            output.insert("skip".to_string(), Value::from(skip));
        }
        if let Some(limit) = options.limit {
            output.insert("limit".to_string(), Value::from(limit));
        }
    }

    if args.diagnostics {
        output.insert("parsed".to_string(), Value::from(compiled.parsed));
        output.insert("diagnostics".to_string(), diagnostics_json(compiled));
    }

    output
}

/// Skipped entries never reached a builder; everything else still compiled, in part.
fn log_message(diagnostic: &Diagnostic) -> &'static str {
    if diagnostic.is_skip() {
        "Clause skipped"
    } else {
        "Clause degraded"
    }
}

fn log_diagnostics(compiled: &Compiled) {
    for diagnostic in &compiled.diagnostics {
        if diagnostic.is_skip() {
            tracing::debug!(%diagnostic, "{}", log_message(diagnostic));
        } else {
            tracing::warn!(%diagnostic, "{}", log_message(diagnostic));
        }
    }
}

fn diagnostics_json(compiled: &Compiled) -> Value {
    compiled
        .diagnostics
        .iter()
        .map(|d| Value::String(d.to_string()))
        .collect()
}

fn render(output: &Map<String, Value>, pretty: bool) -> anyhow::Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(output)?
    } else {
        serde_json::to_string(output)?
    };
    Ok(rendered)
}
