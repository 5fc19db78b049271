//! Backend child processes and their output relay.

use std::{
    io::{self, BufRead, BufReader, Read, Write},
    path::Path,
    process::Child,
    thread,
    time::Duration,
};

use anyhow::Result;

use crate::{logger, utils::exec::Cmd};

/// What a backend is serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The generated application server.
    Normal,
    /// The stand-in that renders a failure.
    Diagnostic,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "backend",
            Self::Diagnostic => "diagnostic backend",
        }
    }
}

/// A spawned backend plus its bookkeeping.
#[derive(Debug)]
pub struct BackendHandle {
    /// Unique per spawn; lets a waiter tell its own process from a successor.
    pub id: u64,
    pub role: Role,
    pub generation: u64,
    /// Set right before a deliberate stop.
    pub expected_exit: bool,
    pub child: Child,
}

/// Spawn `binary -dev=true -port=<port>` with both streams relayed.
pub fn spawn(binary: &Path, cwd: &Path, port: u16) -> Result<Child> {
    let mut attempt = 0;
    let mut child = loop {
        let cmd = Cmd::new(binary)
            .args(["-dev=true".to_string(), format!("-port={port}")])
            .cwd(cwd);
        match cmd.spawn_piped() {
            Ok(child) => break child,
            Err(err) if attempt < 3 && is_text_busy(&err) => {
                attempt += 1;
                thread::sleep(Duration::from_millis(20));
            }
            Err(err) => return Err(err),
        }
    };

    if let Some(stdout) = child.stdout.take() {
        relay(stdout, io::stdout);
    }
    if let Some(stderr) = child.stderr.take() {
        relay(stderr, io::stderr);
    }
    Ok(child)
}

/// ETXTBSY: the binary was just written and a concurrently forked process
/// still holds the write descriptor.
fn is_text_busy(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .and_then(io::Error::raw_os_error)
        .is_some_and(|code| cfg!(unix) && code == 26)
}

/// Copy lines from `source` to `sink` until EOF. The thread is detached
/// and ends when the child closes its end of the pipe.
fn relay<R, W, F>(source: R, sink: F)
where
    R: Read + Send + 'static,
    W: Write,
    F: Fn() -> W + Send + 'static,
{
    let spawned = thread::Builder::new()
        .name("ego-relay".into())
        .spawn(move || {
            let reader = BufReader::new(source);
            for line in reader.split(b'\n') {
                let Ok(mut line) = line else { break };
                line.push(b'\n');
                logger::status_detach();
                let mut out = sink();
                if out.write_all(&line).and_then(|()| out.flush()).is_err() {
                    break;
                }
            }
        });
    if let Err(err) = spawned {
        crate::log!("error"; "cannot relay backend output: {}", err);
    }
}
