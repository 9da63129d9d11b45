use tracing::debug;

/// Outbound SMS boundary. Production use goes through `TwilioClient`; tests
/// inject fakes.
pub trait SmsSender {
    async fn send(&self, body: &str, from: &str, to: &str) -> Result<(), SmsError>;
}

/// Minimal client for the provider's Messages endpoint.
pub struct TwilioClient {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
}

impl TwilioClient {
    pub fn new(account_sid: String, auth_token: String) -> Result<TwilioClient, SmsError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(SmsError::Http)?;
        Ok(TwilioClient {
            http,
            account_sid,
            auth_token,
        })
    }
}

impl SmsSender for TwilioClient {
    async fn send(&self, body: &str, from: &str, to: &str) -> Result<(), SmsError> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("Body", body), ("From", from), ("To", to)])
            .send()
            .await
            .map_err(SmsError::Http)?;

        let status = response.status();
        if !status.is_success() {
            // The provider reports failures as a JSON body with a message field.
            let detail = match response.json::<serde_json::Value>().await {
                Ok(json) => json
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("no detail")
                    .to_string(),
                Err(e) => format!("unreadable error body: {}", e),
            };
            return Err(SmsError::Provider(status.as_u16(), detail));
        }
        debug!(to, "SMS accepted by provider");
        Ok(())
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum SmsError {
        Http(error: reqwest::Error) {
            display("unable to reach SMS provider: {}", error)
            source(error)
        }
        Provider(status: u16, detail: String) {
            display("SMS provider rejected message (status {}): {}", status, detail)
        }
    }
}
