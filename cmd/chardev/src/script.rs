//! Device scripts: one command per line.
//!
//! ```text
//! # comments and blank lines are ignored
//! open                      # prints the new session id
//! write 1 hello world       # rest of the line is the payload
//! write-at 1 16 tail        # payload at offset 16 past the write cursor
//! read 2 64                 # read up to 64 bytes (default: capacity)
//! close 1
//! stat
//! dump
//! ```

use std::collections::HashMap;
use std::io::Write;

use chardev::{Device, Session};

/// Script parse or execution error.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: {message}")]
    BadArgument { line: usize, message: String },

    #[error("line {line}: no open session {session}")]
    NoSession { line: usize, session: u64 },

    #[error("line {line}: {source}")]
    Device {
        line: usize,
        #[source]
        source: chardev::DeviceError,
    },

    #[error("end of script: closing session {session}: {source}")]
    Cleanup {
        session: u64,
        #[source]
        source: chardev::DeviceError,
    },

    #[error("output: {0}")]
    Io(#[from] std::io::Error),
}

/// A single script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Open,
    Close(u64),
    Write {
        session: u64,
        offset: usize,
        data: Vec<u8>,
    },
    Read {
        session: u64,
        len: Option<usize>,
    },
    Stat,
    Dump,
}

/// Parses one line. Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Op>, ScriptError> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (command, rest) = split_word(line);
    let op = match command {
        "open" => Op::Open,
        "close" => Op::Close(parse_num(line_no, "session", split_word(rest).0)?),
        "write" => {
            let (session, data) = split_word(rest);
            Op::Write {
                session: parse_num(line_no, "session", session)?,
                offset: 0,
                data: payload(line_no, data)?,
            }
        }
        "write-at" => {
            let (session, rest) = split_word(rest);
            let (offset, data) = split_word(rest);
            Op::Write {
                session: parse_num(line_no, "session", session)?,
                offset: parse_num(line_no, "offset", offset)?,
                data: payload(line_no, data)?,
            }
        }
        "read" => {
            let (session, rest) = split_word(rest);
            let (len, _) = split_word(rest);
            Op::Read {
                session: parse_num(line_no, "session", session)?,
                len: if len.is_empty() {
                    None
                } else {
                    match parse_num(line_no, "length", len)? {
                        0 => {
                            return Err(ScriptError::BadArgument {
                                line: line_no,
                                message: "length must be greater than 0".into(),
                            });
                        }
                        n => Some(n),
                    }
                },
            }
        }
        "stat" => Op::Stat,
        "dump" => Op::Dump,
        other => {
            return Err(ScriptError::UnknownCommand {
                line: line_no,
                command: other.to_string(),
            });
        }
    };
    Ok(Some(op))
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_end_matches(['\r', '\n'])),
        None => (s.trim_end(), ""),
    }
}

fn payload(line: usize, data: &str) -> Result<Vec<u8>, ScriptError> {
    if data.is_empty() {
        return Err(ScriptError::BadArgument {
            line,
            message: "missing payload".into(),
        });
    }
    Ok(data.as_bytes().to_vec())
}

fn parse_num<T: std::str::FromStr>(line: usize, what: &str, s: &str) -> Result<T, ScriptError> {
    if s.is_empty() {
        return Err(ScriptError::BadArgument {
            line,
            message: format!("missing {}", what),
        });
    }
    s.parse().map_err(|_| ScriptError::BadArgument {
        line,
        message: format!("invalid {} '{}'", what, s),
    })
}

/// Executes script commands against a device, keeping open sessions by id.
pub struct Runner<'a, W: Write> {
    device: &'a Device,
    sessions: HashMap<u64, Session>,
    out: W,
}

impl<'a, W: Write> Runner<'a, W> {
    pub fn new(device: &'a Device, out: W) -> Self {
        Self {
            device,
            sessions: HashMap::new(),
            out,
        }
    }

    /// Runs every line of `script`, stopping at the first error.
    pub fn run_script(&mut self, script: &str) -> Result<(), ScriptError> {
        for (i, line) in script.lines().enumerate() {
            if let Some(op) = parse_line(i + 1, line)? {
                self.exec(i + 1, op)?;
            }
        }
        Ok(())
    }

    /// Executes one command.
    pub fn exec(&mut self, line: usize, op: Op) -> Result<(), ScriptError> {
        let device_err = |source| ScriptError::Device { line, source };
        match op {
            Op::Open => {
                let session = self.device.open();
                writeln!(self.out, "open: session {}", session.id())?;
                self.sessions.insert(session.id(), session);
            }
            Op::Close(id) => {
                let session = self.take(line, id)?;
                self.device.close(session).map_err(device_err)?;
                writeln!(self.out, "close: session {}", id)?;
            }
            Op::Write {
                session,
                offset,
                data,
            } => {
                let s = self.get(line, session)?;
                let n = self.device.write(s, &data, offset).map_err(device_err)?;
                if n == 0 {
                    writeln!(self.out, "write: session {}: out of space", session)?;
                } else {
                    writeln!(self.out, "write: session {}: {} bytes", session, n)?;
                }
            }
            Op::Read { session, len } => {
                // a read never moves more than the capacity
                let cap = self.device.capacity();
                let len = len.unwrap_or(cap).min(cap);
                let mut buf = vec![0u8; len];
                let s = self
                    .sessions
                    .get_mut(&session)
                    .ok_or(ScriptError::NoSession { line, session })?;
                let n = self.device.read(s, &mut buf).map_err(device_err)?;
                if n == 0 {
                    writeln!(self.out, "read: session {}: end of data", session)?;
                } else {
                    writeln!(
                        self.out,
                        "read: session {}: {} bytes \"{}\"",
                        session,
                        n,
                        buf[..n].escape_ascii()
                    )?;
                }
            }
            Op::Stat => {
                let stats = self.device.stats();
                writeln!(
                    self.out,
                    "stat: capacity={} write_cursor={} opens={} closes={} live={}",
                    stats.capacity,
                    stats.write_cursor,
                    stats.open_count,
                    stats.close_count,
                    stats.live_sessions
                )?;
            }
            Op::Dump => {
                writeln!(self.out, "dump: \"{}\"", self.device.contents().escape_ascii())?;
            }
        }
        Ok(())
    }

    /// Returns ids of sessions still open, sorted.
    pub fn open_sessions(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.sessions.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Closes every session still open.
    pub fn close_all(&mut self) -> Result<(), ScriptError> {
        for id in self.open_sessions() {
            let Some(session) = self.sessions.remove(&id) else {
                continue;
            };
            self.device
                .close(session)
                .map_err(|source| ScriptError::Cleanup {
                    session: id,
                    source,
                })?;
            writeln!(self.out, "close: session {}", id)?;
        }
        Ok(())
    }

    /// Consumes the runner and returns the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    fn get(&self, line: usize, session: u64) -> Result<&Session, ScriptError> {
        self.sessions
            .get(&session)
            .ok_or(ScriptError::NoSession { line, session })
    }

    fn take(&mut self, line: usize, session: u64) -> Result<Session, ScriptError> {
        self.sessions
            .remove(&session)
            .ok_or(ScriptError::NoSession { line, session })
    }
}
