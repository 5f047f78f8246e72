//! Feature-gated tracing hooks.
//!
//! With the `tracing` feature, `trace_span!` opens an info-level span and
//! `trace_event!` emits an info-level event. Without it both expand to
//! nothing observable, so call sites need no `cfg` attributes.
//!
//! Spans emitted by the crate:
//! - `apply_filter` (`filter`, `width`, `height`): one per [`crate::Filter`]
//!   application, including each block the dispatcher renders.
//! - `phase_congruency` (`orientations`, `scales`, `parallel`).
//! - `adaptive_regions` (`blocks`, `block_size`, `parallel`): block rendering
//!   and stitching in the dispatcher.
//! - `finalize_sketch` (`width`, `height`): blur and inversion.
//!
//! Events: `blocks_classified` carries the per-class block counts after
//! planning; `phase_congruency_max` carries the normalization maximum.

#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Stand-in span guard when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Mirrors `tracing::Span::entered`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
