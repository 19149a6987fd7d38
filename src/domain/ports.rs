use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// A rendered message for one gifter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Opens or checks the connection before the first message goes out.
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn send(&self, notification: &Notification) -> Result<()>;

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}
