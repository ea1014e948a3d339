use crate::error::{Result, TracemarkError};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Seam for the external metadata-editing collaborator.
///
/// The engine decides *which* field and *what* value; the collaborator owns
/// the codec internals. An absent field reads as `Ok(None)`, never an error.
pub trait MetadataEditor {
    fn read_field(&self, path: &Path, field: &str) -> Result<Option<String>>;
    fn write_field(&self, path: &Path, field: &str, value: &str) -> Result<()>;
}

/// Metadata collaborator backed by the `exiftool` binary.
///
/// Every invocation runs under a hard deadline: exiftool is an external
/// process and can hang on pathological inputs.
pub struct ExifTool {
    binary: PathBuf,
    timeout: Duration,
}

impl Default for ExifTool {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("exiftool"),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ExifTool {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Probe whether the exiftool binary can be spawned at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-ver")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| TracemarkError::ExternalTool {
            tool: "exiftool".into(),
            detail: format!("failed to spawn {}: {}", self.binary.display(), e),
        })?;

        // Drain both pipes on their own threads while polling for exit; a
        // child emitting more than a pipe buffer would otherwise stall and
        // hit the deadline without having hung at all
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                let _ = stdout_reader.join();
                let _ = stderr_reader.join();
                return Err(TracemarkError::ToolTimeout {
                    tool: "exiftool".into(),
                    secs: self.timeout.as_secs(),
                });
            }
            std::thread::sleep(Duration::from_millis(25));
        };

        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            return Err(TracemarkError::ExternalTool {
                tool: "exiftool".into(),
                detail: if stderr.trim().is_empty() {
                    format!("exit status {}", status)
                } else {
                    stderr.trim().to_string()
                },
            });
        }
        Ok(stdout)
    }
}

fn spawn_reader<R: std::io::Read + Send + 'static>(
    stream: Option<R>,
) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_string(&mut buf);
        }
        buf
    })
}

impl MetadataEditor for ExifTool {
    fn read_field(&self, path: &Path, field: &str) -> Result<Option<String>> {
        let tag = format!("-{}", field);
        let path_arg = path.to_string_lossy();
        let out = self.run(&["-s3", &tag, &path_arg])?;
        let value = out.trim();
        if value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(value.to_string()))
        }
    }

    fn write_field(&self, path: &Path, field: &str, value: &str) -> Result<()> {
        let assignment = format!("-{}={}", field, value);
        let path_arg = path.to_string_lossy();
        self.run(&["-overwrite_original", &assignment, &path_arg])?;
        Ok(())
    }
}

/// Collaborator used when no metadata tool is installed: reads nothing,
/// refuses writes. Detection degrades to the other three channels.
pub struct NullEditor;

impl MetadataEditor for NullEditor {
    fn read_field(&self, _path: &Path, _field: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn write_field(&self, _path: &Path, _field: &str, _value: &str) -> Result<()> {
        Err(TracemarkError::ExternalTool {
            tool: "exiftool".into(),
            detail: "no metadata tool available; install exiftool or disable the metadata channel"
                .into(),
        })
    }
}
