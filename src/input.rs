use std::{collections::HashSet, error, fmt, fs, io, path::Path};

use crate::process::{Pid, Process};

/// Reads a process list: one `arrival pid memory_kb time` record per line.
pub fn read_processes<P: AsRef<Path>>(path: P) -> Result<Vec<Process>, InputError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_processes(&content)
}

pub fn parse_processes(content: &str) -> Result<Vec<Process>, InputError> {
    let mut processes = Vec::new();
    let mut seen = HashSet::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let fields: Vec<&str> = raw.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 4 {
            return Err(InputError::Malformed {
                line,
                message: format!("expected 4 fields, found {}", fields.len()),
            });
        }

        let mut values = [0u32; 4];
        for (value, field) in values.iter_mut().zip(&fields) {
            *value = field.parse().map_err(|_| InputError::Malformed {
                line,
                message: format!("`{}` is not a non-negative integer", field),
            })?;
        }
        let [arrival, pid, memory_kb, time] = values;

        let pid = Pid(pid);
        if !seen.insert(pid) {
            return Err(InputError::DuplicatePid { line, pid });
        }
        if time == 0 {
            return Err(InputError::ZeroJobTime { line, pid });
        }
        processes.push(Process::new(pid, arrival, memory_kb, time));
    }

    Ok(processes)
}

/// Renders processes in the same format `parse_processes` reads.
pub fn format_processes(processes: &[Process]) -> String {
    processes
        .iter()
        .map(|p| {
            format!(
                "{} {} {} {}\n",
                p.arrival_time, p.pid, p.memory_required, p.job_time
            )
        })
        .collect()
}

#[derive(Debug)]
pub enum InputError {
    Io { path: String, source: io::Error },
    Malformed { line: usize, message: String },
    DuplicatePid { line: usize, pid: Pid },
    ZeroJobTime { line: usize, pid: Pid },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Io { path, .. } => write!(f, "cannot read process list {}", path),
            InputError::Malformed { line, message } => write!(f, "line {}: {}", line, message),
            InputError::DuplicatePid { line, pid } => {
                write!(f, "line {}: process {} listed twice", line, pid)
            }
            InputError::ZeroJobTime { line, pid } => {
                write!(f, "line {}: process {} needs no CPU time", line, pid)
            }
        }
    }
}

impl error::Error for InputError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            InputError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
