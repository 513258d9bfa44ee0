use std::{
    collections::TryReserveError,
    error::Error,
    fmt::Display,
    io::{Error as IoError, ErrorKind},
};

#[derive(Debug)]
pub enum PQueueError {
    Allocation(TryReserveError),
    BadArgument(usize, String),
    DuplicateName(usize, String),
    Io(std::io::Error),
    FileError(String, Box<dyn Error + Send + Sync + 'static>),
    Invariant(usize, String),
    MissingArgument(usize, String),
    NotMember(usize, usize),
    UnknownCommand(usize, String),
    UnknownName(usize, String),
}

impl Display for PQueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PQueueError::Allocation(error) => {
                write!(f, "Unable to allocate queue storage: {}", error)
            }
            PQueueError::BadArgument(line, arg) => {
                write!(f, "Bad argument '{}' at line {}", arg, line)
            }
            PQueueError::DuplicateName(line, name) => {
                write!(f, "Element '{}' is already queued (line {})", name, line)
            }
            PQueueError::FileError(filename, error) => {
                write!(
                    f,
                    "With file '{}' the following error occurred: {}",
                    filename,
                    error.as_ref().to_string()
                )
            }
            PQueueError::Io(error) => write!(f, "{}", error),
            PQueueError::Invariant(line, what) => {
                write!(f, "Queue invariant violated after line {}: {}", line, what)
            }
            PQueueError::MissingArgument(line, what) => {
                write!(f, "Missing {} at line {}", what, line)
            }
            PQueueError::NotMember(pos, size) => {
                write!(
                    f,
                    "Element is not a queue member - position {} outside 1..={}",
                    pos, size
                )
            }
            PQueueError::UnknownCommand(line, cmd) => {
                write!(f, "Unknown command '{}' at line {}", cmd, line)
            }
            PQueueError::UnknownName(line, name) => {
                write!(f, "No queued element named '{}' (line {})", name, line)
            }
        }
    }
}

impl std::error::Error for PQueueError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PQueueError::Allocation(error) => Some(error),
            PQueueError::FileError(_, error) => Some(error.as_ref()),
            PQueueError::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<TryReserveError> for PQueueError {
    fn from(error: TryReserveError) -> Self {
        PQueueError::Allocation(error)
    }
}

impl From<std::io::Error> for PQueueError {
    fn from(error: std::io::Error) -> Self {
        PQueueError::Io(error)
    }
}

pub fn as_io_error(error: PQueueError) -> std::io::Error {
    match error {
        PQueueError::Io(error) => error,
        error => IoError::new(ErrorKind::Other, error),
    }
}

pub fn wrap_file_error<E: std::error::Error + Send + Sync + 'static>(
    e: E,
    filename: &str,
) -> std::io::Error {
    log::error!("error in {}: {:?}", filename, e);
    as_io_error(PQueueError::FileError(String::from(filename), Box::new(e)))
}
