use std::{
    collections::VecDeque,
    ffi::{OsStr, OsString},
    fs,
    io::{ErrorKind, Read},
    path::Path,
    process::{Command, Stdio},
};

use log::{debug, info, warn};
use tempfile::tempdir;
use walkdir::WalkDir;

use crate::{
    core::audio::{read_audio, write_audio},
    error::{HarnessError, Result},
    types::{AudioData, StemSet},
};

const STDERR_TAIL_LINES: usize = 20;

/// A backend's command-line tool, run to completion as a child process.
#[derive(Clone, Debug)]
pub struct ExternalTool {
    backend: &'static str,
    program: String,
}

impl ExternalTool {
    pub fn new(backend: &'static str, program: impl Into<String>) -> Self {
        Self {
            backend,
            program: program.into(),
        }
    }

    /// Runs the tool with stdout passed through to ours. Stderr is relayed to the
    /// log line by line as it arrives, and its last lines are kept for the error.
    pub fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());
        debug!("Running {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => HarnessError::BackendUnavailable {
                program: self.program.clone(),
            },
            _ => e.into(),
        })?;

        let mut tail = StderrTail::new(self.backend, STDERR_TAIL_LINES);
        if let Some(mut stderr) = child.stderr.take() {
            let mut buf = [0u8; 4096];
            loop {
                let n = stderr.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                tail.feed(&buf[..n]);
            }
        }
        let status = child.wait()?;

        if !status.success() {
            return Err(HarnessError::BackendFailed {
                backend: self.backend,
                status: status.to_string(),
                stderr: tail.finish(),
            });
        }

        Ok(())
    }

    /// Writes `audio` to a scratch WAV, runs the tool with the arguments built from
    /// `(input_wav, output_root)`, and reads every WAV under `output_root` back as a stem.
    pub fn separate<F>(&self, audio: &AudioData, build_args: F) -> Result<StemSet>
    where
        F: FnOnce(&Path, &Path) -> Vec<OsString>,
    {
        let tmp = tempdir()?;
        let input_wav = tmp.path().join("mix.wav");
        let output_root = tmp.path().join("stems");
        fs::create_dir_all(&output_root)?;

        write_audio(&input_wav, audio)?;
        info!(
            "🔍 Running {} on {:.1}s of audio",
            self.backend,
            audio.duration_secs()
        );

        self.run(build_args(&input_wav, &output_root))?;

        let stems = collect_stems(&output_root)?;
        if stems.is_empty() {
            return Err(HarnessError::NoStems {
                backend: self.backend,
            });
        }

        info!("{} produced stems: {:?}", self.backend, stems.names());
        Ok(stems)
    }
}

/// Every `*.wav` below `root`, keyed by file stem.
pub fn collect_stems(root: &Path) -> Result<StemSet> {
    let mut stems = StemSet::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_wav(path) {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        if stems.insert(name, read_audio(path)?).is_some() {
            warn!("Duplicate stem `{}` at {}, keeping the last one", name, path.display());
        }
    }

    Ok(stems)
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

/// Splits a byte stream on `\n` and `\r` (progress bars redraw with `\r`),
/// logging each line and keeping the last `cap` non-empty ones.
struct StderrTail {
    backend: &'static str,
    cap: usize,
    partial: Vec<u8>,
    lines: VecDeque<String>,
}

impl StderrTail {
    fn new(backend: &'static str, cap: usize) -> Self {
        Self {
            backend,
            cap,
            partial: Vec::new(),
            lines: VecDeque::with_capacity(cap),
        }
    }

    fn feed(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if b == b'\n' || b == b'\r' {
                self.flush_line();
            } else {
                self.partial.push(b);
            }
        }
    }

    fn flush_line(&mut self) {
        if self.partial.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.partial).trim_end().to_string();
        self.partial.clear();
        if line.is_empty() {
            return;
        }

        info!("[{}] {}", self.backend, line);
        if self.lines.len() == self.cap {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    fn finish(mut self) -> String {
        self.flush_line();
        Vec::from(self.lines).join("\n")
    }
}
