use thiserror::Error;

/// Errors surfaced by the virtualizer.
///
/// Fatal errors indicate a misconfigured host and are returned to the caller as-is.
/// Non-fatal errors are expected to clear up on their own (e.g. the surface has not been laid
/// out yet) and are retried on the next recompute.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum VirtualizerError {
    /// `ElementFactory::create_elements` returned fewer handles than requested.
    #[error("element factory returned {returned} element(s), {requested} were requested")]
    UnderProvisioned { requested: usize, returned: usize },

    /// A raw item count was negative, fractional or not a number.
    #[error("invalid item count: {0}")]
    InvalidSize(f64),

    /// The scroll surface could not report its metrics (not attached / not laid out).
    #[error("scroll surface metrics are unavailable")]
    SurfaceUnavailable,
}

impl VirtualizerError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::SurfaceUnavailable)
    }
}

/// Converts a raw host-provided item count into a `usize`.
///
/// Hosts that track counts as floating point numbers (e.g. script bindings) should go through
/// this so that negative or fractional values fail fast instead of being truncated.
pub fn checked_size(raw: f64) -> Result<usize, VirtualizerError> {
    if !raw.is_finite() || raw < 0.0 || raw >= usize::MAX as f64 {
        return Err(VirtualizerError::InvalidSize(raw));
    }
    let size = raw as usize;
    if size as f64 != raw {
        return Err(VirtualizerError::InvalidSize(raw));
    }
    Ok(size)
}
