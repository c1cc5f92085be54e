//! OS-specific launch and kill commands

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

/// Program and arguments that start the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// OS family whose shell tools launch and kill the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// `sh`/`nohup` background launch, `kill -9`
    Posix,
    /// `cmd /C start /B` launch, `taskkill /F`
    Windows,
}

impl Platform {
    /// Platform of the running process
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    /// Command that starts the worker detached and returns immediately
    pub fn launch_command(&self, worker: &WorkerCommand) -> Command {
        match self {
            Platform::Posix => {
                let mut line = String::from("nohup ");
                line.push_str(&shell_quote(&worker.program.to_string_lossy()));
                for arg in &worker.args {
                    line.push(' ');
                    line.push_str(&shell_quote(&arg.to_string_lossy()));
                }
                line.push_str(" > /dev/null 2>&1 &");

                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(line);
                cmd
            }
            Platform::Windows => {
                let mut cmd = Command::new("cmd");
                // Empty title argument keeps `start` from treating a quoted
                // program path as the window title
                cmd.args(["/C", "start", "", "/B"])
                    .arg(&worker.program)
                    .args(&worker.args);
                cmd
            }
        }
    }

    /// Command that force-kills a process
    pub fn kill_command(&self, pid: u32) -> Command {
        match self {
            Platform::Posix => {
                let mut cmd = Command::new("kill");
                cmd.arg("-9").arg(pid.to_string());
                cmd
            }
            Platform::Windows => {
                let mut cmd = Command::new("taskkill");
                cmd.args(["/F", "/PID"]).arg(pid.to_string());
                cmd
            }
        }
    }
}

/// Single-quote a word for `sh -c`
fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}
