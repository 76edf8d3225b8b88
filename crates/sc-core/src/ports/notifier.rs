use crate::notice::Notice;

/// Surfaces transient notices to the user.
pub trait NotifierPort: Send + Sync {
    fn notify(&self, notice: Notice);
}
