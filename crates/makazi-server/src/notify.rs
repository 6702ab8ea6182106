use async_trait::async_trait;
use makazi_model::Inquiry;
use std::time::Duration;

#[derive(Debug)]
pub struct NotifyError(pub String);

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for NotifyError {}

/// Outbound side effect fired after an inquiry row is durably created.
/// Delivery is best-effort: callers spawn it and log failures, never
/// failing the request that triggered it.
#[async_trait]
pub trait InquiryNotifier: Send + Sync + 'static {
    async fn inquiry_created(&self, inquiry: &Inquiry) -> Result<(), NotifyError>;
}

/// Default when no webhook is configured.
pub struct NoopNotifier;

#[async_trait]
impl InquiryNotifier for NoopNotifier {
    async fn inquiry_created(&self, _inquiry: &Inquiry) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Posts the inquiry JSON to a configured webhook (the mail relay in
/// production).
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| NotifyError(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl InquiryNotifier for WebhookNotifier {
    async fn inquiry_created(&self, inquiry: &Inquiry) -> Result<(), NotifyError> {
        self.client
            .post(&self.url)
            .json(inquiry)
            .send()
            .await
            .map_err(|e| NotifyError(e.to_string()))?
            .error_for_status()
            .map_err(|e| NotifyError(e.to_string()))?;
        Ok(())
    }
}
