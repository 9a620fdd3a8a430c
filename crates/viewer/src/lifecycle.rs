#![forbid(unsafe_code)]

/// Mount state of the viewer. Nothing is rendered before [`Readiness::Ready`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Readiness {
    #[default]
    Uninitialized,
    Ready,
}

impl Readiness {
    pub fn is_ready(self) -> bool {
        self == Readiness::Ready
    }

    /// Move to `Ready`. Returns `true` only on the first transition.
    pub fn mark_ready(&mut self) -> bool {
        let first = *self == Readiness::Uninitialized;
        *self = Readiness::Ready;
        first
    }
}
