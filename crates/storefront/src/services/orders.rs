//! Order submission client.
//!
//! Sends the delivery details as a form-encoded POST to the configured order
//! endpoint. Only successful completion matters; the response body is not
//! inspected. There is no retry: the checkout state machine surfaces a
//! failure and the customer resubmits.

use thiserror::Error;
use tracing::instrument;

use bistro_core::{DeliveryDetails, OrderId};

/// Errors that can occur when submitting an order.
#[derive(Debug, Error)]
pub enum OrderApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint returned a non-success status.
    #[error("Order endpoint rejected the submission: {status} - {message}")]
    Rejected { status: u16, message: String },
}

/// Client for the order submission endpoint.
#[derive(Debug, Clone)]
pub struct OrderClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OrderClient {
    /// Create a new order client for the given endpoint URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Submit an order and return a fresh order reference on success.
    ///
    /// # Errors
    ///
    /// Returns `OrderApiError::Http` if the request never completed, or
    /// `OrderApiError::Rejected` on a non-success status.
    #[instrument(skip(self, details), fields(endpoint = %self.endpoint))]
    pub async fn place_order(&self, details: &DeliveryDetails) -> Result<OrderId, OrderApiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(details)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OrderApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let order = OrderId::generate();
        tracing::info!(order = %order, "order placed");
        Ok(order)
    }
}
