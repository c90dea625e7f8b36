//! User preference storage port
//!
//! Defines the interface for persisting how many nearby stops each chat wants.

use async_trait::async_trait;
use domain::{ChatId, StopCount};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for per-chat preference storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Stored stop count for a chat, `None` if never set
    async fn get(&self, chat_id: ChatId) -> Result<Option<StopCount>, ApplicationError>;

    /// Store the stop count for a chat, replacing any previous value
    async fn put(&self, chat_id: ChatId, count: StopCount) -> Result<(), ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn PreferenceStore) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PreferenceStore>();
    }
}
