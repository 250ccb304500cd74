const UNREAD_COUNT_DEGRADED: &str = "UNREAD_COUNT_DEGRADED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnreadCountSourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
}

pub trait UnreadCountSource {
    /// `None` when the server has nothing to report (no conversations).
    fn unread_count(&self) -> Result<Option<u32>, UnreadCountSourceError>;
}

impl<T> UnreadCountSource for &T
where
    T: UnreadCountSource + ?Sized,
{
    fn unread_count(&self) -> Result<Option<u32>, UnreadCountSourceError> {
        (*self).unread_count()
    }
}

/// Total unread messages across conversations. Never fails: any source
/// error degrades to 0.
pub fn unread_count(source: &dyn UnreadCountSource) -> u32 {
    match source.unread_count() {
        Ok(count) => count.unwrap_or(0),
        Err(error) => {
            tracing::warn!(
                code = UNREAD_COUNT_DEGRADED,
                error = ?error,
                "unread count unavailable; reporting 0"
            );
            0
        }
    }
}
