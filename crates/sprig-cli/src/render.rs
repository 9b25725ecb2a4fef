//! Hand-off of DOT text to Graphviz and the platform image viewer.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Context};
use tracing::debug;

/// Run `dot -Tpng -o <output>` with `dot_text` on stdin.
pub fn render_png(dot_text: &str, output: &Path) -> anyhow::Result<()> {
    let mut child = Command::new("dot")
        .arg("-Tpng")
        .arg("-o")
        .arg(output)
        .stdin(Stdio::piped())
        .spawn()
        .context("failed to run `dot`; is Graphviz installed?")?;

    child
        .stdin
        .take()
        .context("dot stdin is not available")?
        .write_all(dot_text.as_bytes())
        .context("failed to write graph to dot")?;

    let status = child.wait().context("failed to wait for dot")?;
    if !status.success() {
        bail!("dot exited with {status}");
    }
    debug!(output = %output.display(), "rendered graph");
    Ok(())
}

/// The command that opens `path` in the platform's default viewer.
pub fn viewer_command(path: &Path) -> Command {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("rundll32");
        cmd.arg("url.dll,FileProtocolHandler");
        cmd
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(path);
    cmd
}

/// Launch the viewer without waiting for it to exit.
pub fn open(path: &Path) -> anyhow::Result<()> {
    viewer_command(path)
        .spawn()
        .with_context(|| format!("failed to open {}", path.display()))?;
    Ok(())
}
