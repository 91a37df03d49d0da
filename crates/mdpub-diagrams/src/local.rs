//! Local `mmdc` (mermaid-cli) renderer.

use std::fs;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::RenderError;
use crate::rasterizer::DiagramRenderer;

/// Default renderer executable.
pub const DEFAULT_MMDC: &str = "mmdc";

/// Default time budget for one invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Renders diagrams by running mermaid-cli on a temporary file.
///
/// Each call works in its own temporary directory, removed when the call
/// returns on every path.
#[derive(Debug, Clone)]
pub struct LocalCliRenderer {
    program: String,
    timeout: Duration,
}

impl LocalCliRenderer {
    /// Create a renderer for `program`, a name looked up on `PATH` or a path.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-invocation time budget.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn executable(&self) -> Option<PathBuf> {
        which::which(&self.program).ok()
    }
}

impl Default for LocalCliRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_MMDC)
    }
}

impl DiagramRenderer for LocalCliRenderer {
    fn name(&self) -> &'static str {
        "mmdc"
    }

    fn is_available(&self) -> bool {
        self.executable().is_some()
    }

    fn render(&self, source: &str) -> Result<Vec<u8>, RenderError> {
        let executable = self
            .executable()
            .ok_or_else(|| RenderError::Unavailable(format!("{} not found", self.program)))?;

        let dir = tempfile::Builder::new().prefix("mdpub-mermaid-").tempdir()?;
        let input = dir.path().join("diagram.mmd");
        let output = dir.path().join("diagram.svg");
        fs::write(&input, source)?;

        let mut child = Command::new(&executable)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        wait_with_timeout(&mut child, self.timeout)?;

        let data = fs::read(&output)?;
        if data.is_empty() {
            return Err(RenderError::InvalidSvg);
        }
        Ok(data)
    }
}

/// Wait for `child`, killing it once `timeout` elapses.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(), RenderError> {
    let start = Instant::now();

    loop {
        if let Some(status) = child.try_wait()? {
            if status.success() {
                return Ok(());
            }
            return Err(RenderError::Exit(status.to_string()));
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(RenderError::Timeout(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    }
}
