//! Error taxonomy shared by every eqwave crate.
//!
//! - `InvalidParameter`    : non-positive counts/dimensions, non-finite inputs. Fails fast.
//! - `UpstreamUnavailable` : the optional external series could not be fetched.
//! - `WriteFailure`        : the finished document could not be persisted.

use std::path::PathBuf;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A count, dimension or numeric setting is outside its valid domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// External series fetch failed (network, auth, malformed payload).
    #[error("upstream series unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Persisting the generated document failed.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    #[inline]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name, reason: reason.into() }
    }

    #[inline]
    pub fn upstream(reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(reason.into())
    }
}

/// Reject non-finite or non-positive values.
#[inline]
pub fn ensure_positive(name: &'static str, v: f64) -> Result<f64> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(Error::invalid(name, format!("must be a positive finite number, got {v}")))
    }
}

/// Reject NaN / infinities.
#[inline]
pub fn ensure_finite(name: &'static str, v: f64) -> Result<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(Error::invalid(name, format!("must be finite, got {v}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_guard() {
        assert!(ensure_positive("w", 1.0).is_ok());
        assert!(ensure_positive("w", 0.0).is_err());
        assert!(ensure_positive("w", -3.0).is_err());
        assert!(ensure_positive("w", f64::NAN).is_err());
    }

    #[test]
    fn messages_name_the_parameter() {
        let e = Error::invalid("bar_count", "must be at least 1");
        assert_eq!(e.to_string(), "invalid parameter `bar_count`: must be at least 1");
    }
}
