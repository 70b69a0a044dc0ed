//! Output format selection and the Graphviz hand-off.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{anyhow, bail, Context, Result};

use crate::viz::{render_dot, render_json, RenderGraph, RenderOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// DOT source, written as-is.
    Dot,
    /// The render model as JSON.
    Json,
    /// Any other Graphviz `-T` format (`svg`, `png`, `pdf`, ...).
    Graphviz(String),
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "" => Err(anyhow!("empty output format")),
            "dot" | "gv" => Ok(Self::Dot),
            "json" => Ok(Self::Json),
            other => Ok(Self::Graphviz(other.to_string())),
        }
    }

    /// `explicit` wins; otherwise the output file's extension decides.
    pub fn resolve(explicit: Option<&str>, output: &Path) -> Result<Self> {
        if let Some(format) = explicit {
            return Self::parse(format);
        }
        let ext = output
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                anyhow!(
                    "cannot infer output format from `{}` (add an extension or pass --format)",
                    output.display()
                )
            })?;
        Self::parse(ext)
    }
}

pub fn write_output(
    graph: &RenderGraph,
    options: &RenderOptions,
    format: &OutputFormat,
    out: &Path,
) -> Result<()> {
    match format {
        OutputFormat::Dot => fs::write(out, render_dot(graph, options))
            .with_context(|| format!("failed to write `{}`", out.display())),
        OutputFormat::Json => fs::write(out, render_json(graph)?)
            .with_context(|| format!("failed to write `{}`", out.display())),
        OutputFormat::Graphviz(fmt) => run_graphviz(&render_dot(graph, options), options, fmt, out),
    }
}

fn run_graphviz(dot: &str, options: &RenderOptions, fmt: &str, out: &Path) -> Result<()> {
    tracing::debug!(engine = %options.engine, format = %fmt, out = %out.display(), "invoking graphviz");

    let mut child = Command::new(&options.engine)
        .arg(format!("-T{fmt}"))
        .arg("-o")
        .arg(out)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to run `{}` (is Graphviz installed?)", options.engine))?;

    // The engine may exit before reading all of stdin; its stderr explains why.
    let sent = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(dot.as_bytes()),
        None => Err(std::io::Error::other("graphviz stdin unavailable")),
    };

    let result = child
        .wait_with_output()
        .context("failed to wait for graphviz")?;
    if !result.status.success() {
        bail!(
            "`{}` exited with {}: {}",
            options.engine,
            result.status,
            String::from_utf8_lossy(&result.stderr).trim()
        );
    }
    sent.context("failed to send graph to graphviz")
}
