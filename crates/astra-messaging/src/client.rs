// ============================================================================
// Outbound messaging client
// ============================================================================
//
// Sends WhatsApp messages through the Twilio REST API. Construction never
// fails; an unconfigured client reports [`DeliveryError::NotConfigured`] on
// send so the rest of the service can run without credentials.

use serde::Deserialize;

use astra_core::config::TwilioConfig;

use crate::error::DeliveryError;

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Provider acknowledgement of an accepted send.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryReceipt {
    pub sid: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

pub struct MessagingClient {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    configured: bool,
}

impl MessagingClient {
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: with_channel_prefix(&config.phone_number),
            configured: config.is_configured(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Sends `body` to `to_number` over WhatsApp. The channel prefix is
    /// added to bare numbers.
    pub async fn send(&self, to_number: &str, body: &str) -> Result<DeliveryReceipt, DeliveryError> {
        if !self.configured {
            return Err(DeliveryError::NotConfigured);
        }

        let url = format!("{API_BASE}/Accounts/{}/Messages.json", self.account_sid);
        let to = with_channel_prefix(to_number);
        let form = [
            ("To", to.as_str()),
            ("From", self.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ProviderError>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let receipt = response.json::<DeliveryReceipt>().await?;
        tracing::info!(sid = %receipt.sid, status = %receipt.status, "message accepted");
        Ok(receipt)
    }
}

fn with_channel_prefix(number: &str) -> String {
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{number}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(sid: &str, token: &str) -> TwilioConfig {
        TwilioConfig {
            account_sid: sid.to_string(),
            auth_token: token.to_string(),
            phone_number: "+14155238886".to_string(),
            validate_signatures: true,
        }
    }

    #[test]
    fn test_channel_prefix_added_once() {
        assert_eq!(with_channel_prefix("+911234567890"), "whatsapp:+911234567890");
        assert_eq!(
            with_channel_prefix("whatsapp:+911234567890"),
            "whatsapp:+911234567890"
        );
    }

    #[test]
    fn test_unconfigured_client_reports_itself() {
        let client = MessagingClient::new(&config("", ""));
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn test_send_without_credentials_fails_fast() {
        let client = MessagingClient::new(&config("", ""));
        let err = client.send("+911234567890", "hello").await.unwrap_err();
        assert!(matches!(err, DeliveryError::NotConfigured));
    }

    #[test]
    fn test_receipt_parses_provider_payload() {
        let receipt: DeliveryReceipt = serde_json::from_str(
            r#"{"sid": "SM123", "status": "queued", "num_segments": "1"}"#,
        )
        .unwrap();
        assert_eq!(receipt.sid, "SM123");
        assert_eq!(receipt.status, "queued");
    }
}
