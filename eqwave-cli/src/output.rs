//! Where the finished document goes.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use eqwave_core::error::{Error, Result};

use crate::cli::Args;

#[derive(Clone, Debug, PartialEq)]
pub enum Sink {
    File(PathBuf),
    Stdout,
}

impl Sink {
    pub fn from_args(args: &Args) -> Self {
        if args.stdout {
            Sink::Stdout
        } else {
            Sink::File(args.out.clone())
        }
    }

    /// Write `svg` once; IO errors become `WriteFailure`.
    pub fn write(&self, svg: &str) -> Result<()> {
        match self {
            Sink::File(path) => {
                fs::write(path, svg).map_err(|source| Error::WriteFailure { path: path.clone(), source })
            }
            Sink::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(svg.as_bytes())
                    .and_then(|()| out.flush())
                    .map_err(|source| Error::WriteFailure { path: PathBuf::from("<stdout>"), source })
            }
        }
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::File(p) => write!(f, "{}", p.display()),
            Sink::Stdout => f.write_str("<stdout>"),
        }
    }
}
