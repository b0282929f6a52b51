//! `fgd parse`: convert FGD files to one JSON document each.

use std::io::Write;
use std::path::{Path, PathBuf};

use fgd_core::serialize;
use tracing::{debug, error, info};

use crate::error::CliError;

pub struct BatchOptions<'a> {
    /// Write `<out>/<name>.json` files; stdout when `None`.
    pub out: Option<&'a Path>,
    /// Extension (no dot) selected when walking directories.
    pub ext: &'a str,
    pub strip_prefix: Option<&'a str>,
    /// Defaults to `.<ext>`.
    pub strip_suffix: Option<&'a str>,
    pub pretty: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
}

/// Expand the command-line inputs into a sorted list of files.
pub fn collect_inputs(inputs: &[PathBuf], ext: &str) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            collect_files(input, ext, &mut files)?;
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(CliError::MissingInput(input.clone()));
        }
    }
    Ok(files)
}

/// Recursively collect files with the given extension (no dot prefix) under `dir`.
fn collect_files(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> Result<(), CliError> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| CliError::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut entries: Vec<PathBuf> = read_dir.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_files(&path, extension, files)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        {
            files.push(path);
        }
    }
    Ok(())
}

/// The document name for `path`: its file name minus the configured prefix and suffix.
pub fn logical_name(path: &Path, opts: &BatchOptions<'_>) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = file_name.as_str();
    if let Some(prefix) = opts.strip_prefix {
        name = name.strip_prefix(prefix).unwrap_or(name);
    }
    let default_suffix = format!(".{}", opts.ext);
    let suffix = opts.strip_suffix.unwrap_or(&default_suffix);
    name = name.strip_suffix(suffix).unwrap_or(name);
    name.to_owned()
}

/// Parse one file into its JSON document.
pub fn convert(path: &Path, name: &str) -> Result<serde_json::Value, CliError> {
    let src = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serialize::document(name, fgd_core::parse(name, &src)).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn encode(doc: &serde_json::Value, pretty: bool) -> Result<String, CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_json::to_string(doc)?
    };
    Ok(text)
}

fn emit(doc: &serde_json::Value, name: &str, opts: &BatchOptions<'_>) -> Result<(), CliError> {
    let text = encode(doc, opts.pretty)?;
    match opts.out {
        Some(dir) => {
            let target = dir.join(format!("{}.json", name));
            std::fs::write(&target, text + "\n").map_err(|source| CliError::Write {
                path: target.clone(),
                source,
            })?;
            debug!(output = %target.display(), "wrote document");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", text)?;
        }
    }
    Ok(())
}

/// Convert every input. A failing file is logged and skipped.
pub fn run(inputs: &[PathBuf], opts: &BatchOptions<'_>) -> Result<BatchSummary, CliError> {
    let files = collect_inputs(inputs, opts.ext)?;
    if let Some(dir) = opts.out {
        std::fs::create_dir_all(dir).map_err(|source| CliError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let mut summary = BatchSummary::default();
    for path in &files {
        let name = logical_name(path, opts);
        let result = convert(path, &name).and_then(|doc| emit(&doc, &name, opts));
        match result {
            Ok(()) => {
                summary.converted += 1;
                debug!(file = %path.display(), name = %name, "converted");
            }
            Err(CliError::Parse { path, source }) => {
                summary.failed += 1;
                error!(
                    file = %path.display(),
                    kind = ?source.kind(),
                    offset = ?source.offset(),
                    "{}",
                    source
                );
            }
            Err(e) => {
                summary.failed += 1;
                error!(file = %path.display(), "{}", e);
            }
        }
    }
    info!(
        converted = summary.converted,
        failed = summary.failed,
        "batch finished"
    );
    Ok(summary)
}
