//! The `precall` command: expand files (or stdin) and write the result.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use precall_core::{KeywordOption, PrecallOptions};
use precall_ecma::Precall;
use tracing::{debug, info};

use crate::diagnostics::with_source;
use crate::{CliError, Result};

/// Name used for source read from stdin unless `--stdin-filename` is given.
pub const STDIN_FILENAME: &str = "stdin.js";

#[derive(Debug, Clone, Default, Args)]
pub struct ExpandArgs {
    /// Files to expand; stdin is read when none are given
    pub inputs: Vec<PathBuf>,

    /// Write the expanded source here instead of stdout
    #[arg(short, long, conflicts_with = "out_dir")]
    pub output: Option<PathBuf>,

    /// Write each expanded file into this directory, keeping its file name
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Keyword to expand (repeatable, overrides the configuration file)
    #[arg(long = "value", value_name = "KEYWORD")]
    pub values: Vec<String>,

    /// Leave import/require specifiers untouched
    #[arg(long)]
    pub no_specifiers: bool,

    /// Name of the source read from stdin; also selects its syntax
    #[arg(long, value_name = "NAME")]
    pub stdin_filename: Option<String>,
}

impl ExpandArgs {
    /// Fold command line overrides into the loaded options.
    pub fn apply(&self, mut options: PrecallOptions) -> PrecallOptions {
        if !self.values.is_empty() {
            options.value = KeywordOption::Many(self.values.clone());
        }
        if self.no_specifiers {
            options.rewrite_specifiers = false;
        }
        options
    }
}

/// Run the pass over every input. Returns the number of inputs written.
pub fn expand_command(args: ExpandArgs, options: &PrecallOptions) -> Result<usize> {
    let options = args.apply(options.clone());
    let precall = Precall::new(&options)?;

    if args.output.is_some() && args.inputs.len() > 1 {
        return Err(CliError::InvalidInput(
            "--output takes a single input; use --out-dir for several".to_string(),
        ));
    }

    if args.inputs.is_empty() {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        let name = args.stdin_filename.as_deref().unwrap_or(STDIN_FILENAME);
        let expanded = expand_source(&precall, &source, name)?;
        write_output(args.output.as_deref(), &expanded)?;
        return Ok(1);
    }

    for input in &args.inputs {
        let expanded = expand_file(&precall, input)?;
        let target = match (&args.output, &args.out_dir) {
            (Some(output), _) => Some(output.clone()),
            (None, Some(dir)) => Some(out_dir_target(dir, input)?),
            (None, None) => None,
        };
        write_output(target.as_deref(), &expanded)?;
        info!(input = %input.display(), "expanded");
    }
    Ok(args.inputs.len())
}

pub fn expand_file(precall: &Precall, path: &Path) -> Result<String> {
    let source = fs::read_to_string(path)?;
    expand_source(precall, &source, &path.display().to_string())
}

/// Expand one source, attaching the source text to any failure.
pub fn expand_source(precall: &Precall, source: &str, name: &str) -> Result<String> {
    debug!(name, bytes = source.len(), "expanding source");
    precall
        .transform_source(source, name)
        .map_err(|err| with_source(err, name, source))
}

fn out_dir_target(dir: &Path, input: &Path) -> Result<PathBuf> {
    let name = input.file_name().ok_or_else(|| {
        CliError::InvalidInput(format!("{} has no file name", input.display()))
    })?;
    fs::create_dir_all(dir)?;
    Ok(dir.join(name))
}

fn write_output(target: Option<&Path>, contents: &str) -> Result<()> {
    match target {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, contents)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
