use std::collections::TryReserveError;

/// Returned by a push that could not store its value.
///
/// The rejected value is always handed back, and the deque is left exactly
/// as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PushError<T> {
    #[error("deque is full")]
    Full(T),
    #[error("failed to allocate deque storage: {1}")]
    AllocFailed(T, #[source] TryReserveError),
}

impl<T> PushError<T> {
    /// Recovers the value that was not pushed.
    #[inline]
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(value) | Self::AllocFailed(value, _) => value,
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }

    #[inline]
    pub fn is_alloc_failed(&self) -> bool {
        matches!(self, Self::AllocFailed(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_into_inner() {
        let err = PushError::Full(String::from("thegazed"));
        assert!(err.is_full());
        assert!(!err.is_alloc_failed());
        assert_eq!(err.to_string(), "deque is full");
        assert_eq!(err.into_inner(), "thegazed");
    }

    #[test]
    fn t_alloc_failed_source() {
        let source = Vec::<u64>::new()
            .try_reserve(usize::MAX)
            .expect_err("reserving usize::MAX u64s must fail");
        let err = PushError::AllocFailed(7, source.clone());
        assert!(err.is_alloc_failed());
        assert!(err.to_string().starts_with("failed to allocate deque storage"));
        assert_eq!(
            std::error::Error::source(&err).map(|s| s.to_string()),
            Some(source.to_string())
        );
        assert_eq!(err.into_inner(), 7);
    }
}
