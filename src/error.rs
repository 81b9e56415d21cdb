use std::error::Error;
use std::fmt;
use std::io;

/// One variant per pipeline phase, so a failure names the phase that
/// produced it.
#[derive(Debug)]
pub enum CountError {
    Config(String),
    Input(io::Error),
    Range { index: usize, source: io::Error },
    Cancelled,
    Output(io::Error),
}

impl fmt::Display for CountError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CountError::Config(msg) => write!(f, "configuration error: {}", msg),
            CountError::Input(err) => write!(f, "can't read input: {}", err),
            CountError::Range { index, source } => {
                write!(f, "read error in range {}: {}", index, source)
            }
            CountError::Cancelled => write!(f, "counting cancelled"),
            CountError::Output(err) => write!(f, "can't write results: {}", err),
        }
    }
}

impl Error for CountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CountError::Input(err) | CountError::Output(err) => Some(err),
            CountError::Range { source, .. } => Some(source),
            CountError::Config(_) | CountError::Cancelled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_phase() {
        let err = CountError::Range {
            index: 3,
            source: io::Error::new(io::ErrorKind::Other, "bad sector"),
        };
        assert_eq!(format!("{}", err), "read error in range 3: bad sector");

        let err = CountError::Config("worker count must be at least 1".to_string());
        assert!(format!("{}", err).starts_with("configuration error"));
    }
}
