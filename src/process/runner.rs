use std::{
    io::{self, BufRead, BufReader, PipeReader},
    path::PathBuf,
    process::{Child, Command, Stdio},
};

use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

use super::models::{InvocationRequest, InvocationResult};

/// A launched validator whose merged stdout/stderr is read line by line.
///
/// Iterating yields lines as the child writes them. Dropping the value before
/// [`RunningProcess::finish`] kills and reaps the child.
pub struct RunningProcess {
    program: PathBuf,
    child: Child,
    reader: BufReader<PipeReader>,
    exhausted: bool,
}

pub fn spawn_process(request: &InvocationRequest) -> ClientResult<RunningProcess> {
    let launch_error = |source| ClientError::ProcessLaunch {
        program: request.executable.clone(),
        source,
    };

    let (reader, writer) = io::pipe().map_err(launch_error)?;
    let stderr_writer = writer.try_clone().map_err(launch_error)?;

    debug!(
        command = %request.display_command(),
        overrides = ?request.environment_overrides.keys().collect::<Vec<_>>(),
        "spawning validator"
    );

    // The Command owns the parent's copies of the write end; it must be gone
    // before reading or the pipe never reports EOF.
    let child = {
        let mut command = Command::new(&request.executable);
        command
            .args(&request.arguments)
            .envs(&request.environment_overrides)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr_writer);
        if let Some(dir) = &request.working_dir {
            command.current_dir(dir);
        }
        command.spawn().map_err(launch_error)?
    };

    debug!(pid = child.id(), "validator started");

    Ok(RunningProcess {
        program: request.executable.clone(),
        child,
        reader: BufReader::new(reader),
        exhausted: false,
    })
}

/// Runs the request to completion, handing each output line to `on_line` as
/// soon as it is read.
pub fn stream_process<F>(
    request: &InvocationRequest,
    mut on_line: F,
) -> ClientResult<InvocationResult>
where
    F: FnMut(&str),
{
    let mut running = spawn_process(request)?;
    let mut output_lines = Vec::new();
    for line in &mut running {
        let line = line?;
        on_line(&line);
        output_lines.push(line);
    }
    let exit_code = running.wait()?;
    Ok(InvocationResult {
        exit_code,
        output_lines,
    })
}

pub fn run_process(request: &InvocationRequest) -> ClientResult<InvocationResult> {
    spawn_process(request)?.finish()
}

impl RunningProcess {
    /// OS process id of the running validator.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Drains any unread output and waits for the child to exit.
    pub fn finish(mut self) -> ClientResult<InvocationResult> {
        let output_lines = (&mut self).collect::<ClientResult<Vec<_>>>()?;
        let exit_code = self.wait()?;
        Ok(InvocationResult {
            exit_code,
            output_lines,
        })
    }

    fn wait(&mut self) -> ClientResult<i32> {
        let status = self.child.wait().map_err(|source| ClientError::ProcessIo {
            program: self.program.clone(),
            source,
        })?;
        let exit_code = status.code().unwrap_or(-1);
        info!(program = %self.program.display(), exit_code, "validator exited");
        Ok(exit_code)
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

impl Iterator for RunningProcess {
    type Item = ClientResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.read_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.exhausted = true;
                None
            }
            Err(source) => {
                self.exhausted = true;
                Some(Err(ClientError::ProcessIo {
                    program: self.program.clone(),
                    source,
                }))
            }
        }
    }
}

impl Drop for RunningProcess {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            warn!(pid = self.id(), "killing unfinished validator");
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
