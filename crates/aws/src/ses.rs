use aws_sdk_sesv2::config::http::HttpResponse;
use aws_sdk_sesv2::config::retry::RetryConfig;
use aws_sdk_sesv2::config::timeout::TimeoutConfig;
use aws_sdk_sesv2::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_sesv2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sesv2::operation::send_email::builders::SendEmailFluentBuilder;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use mailgate_core::{DeliveryReceipt, NormalizedEmail};
use mailgate_provider::{BackendError, ConfigError, EmailBackend, ErrorClass, NetworkErrorKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AwsBaseConfig;
use crate::error::{SesError, classify_ses_error};

/// Configuration for the AWS SES backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SesConfig {
    /// Shared AWS configuration (region, credentials, endpoint URL).
    #[serde(flatten)]
    pub aws: AwsBaseConfig,

    /// Optional SES configuration set name for tracking.
    #[serde(default)]
    pub configuration_set: Option<String>,
}

impl SesConfig {
    pub fn new(
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            aws: AwsBaseConfig::new(region, access_key_id, secret_access_key),
            configuration_set: None,
        }
    }

    /// Set the SES configuration set name.
    #[must_use]
    pub fn with_configuration_set(mut self, name: impl Into<String>) -> Self {
        self.configuration_set = Some(name.into());
        self
    }

    /// Set the endpoint URL override (for `LocalStack`).
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.aws.endpoint_url = Some(endpoint_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.aws.timeout_secs = Some(secs);
        self
    }
}

/// SES v2 backend that delivers with `SendEmail`.
pub struct SesBackend {
    config: SesConfig,
    client: aws_sdk_sesv2::Client,
}

impl std::fmt::Debug for SesBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SesBackend")
            .field("config", &self.config)
            .field("client", &"<SesV2Client>")
            .finish()
    }
}

impl SesBackend {
    /// Create an SES backend from static credentials.
    ///
    /// The SDK client is built synchronously with retries disabled.
    pub fn new(config: SesConfig) -> Result<Self, ConfigError> {
        config.aws.validate()?;
        let client = build_client(&config.aws);
        Ok(Self { config, client })
    }

    /// Create an `SesBackend` with a pre-built client (for testing).
    pub fn with_client(config: SesConfig, client: aws_sdk_sesv2::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &SesConfig {
        &self.config
    }

    fn send_email_request(&self, email: &NormalizedEmail) -> Result<SendEmailFluentBuilder, SesError> {
        let mut body = Body::builder().text(utf8_content(email.text_body())?);
        if let Some(html) = email.html_body() {
            body = body.html(utf8_content(html)?);
        }

        let message = Message::builder()
            .subject(utf8_content(email.subject())?)
            .body(body.build())
            .build();

        let mut request = self
            .client
            .send_email()
            .from_email_address(email.from_address())
            .destination(Destination::builder().to_addresses(email.to()).build())
            .content(EmailContent::builder().simple(message).build());

        if let Some(reply_to) = email.reply_to() {
            request = request.reply_to_addresses(reply_to);
        }
        if let Some(config_set) = &self.config.configuration_set {
            request = request.configuration_set_name(config_set);
        }
        Ok(request)
    }
}

impl EmailBackend for SesBackend {
    type Error = SesError;

    fn provider_name(&self) -> &'static str {
        "ses"
    }

    fn display_name(&self) -> &'static str {
        "SES"
    }

    async fn perform_delivery(
        &self,
        email: &NormalizedEmail,
    ) -> Result<DeliveryReceipt, BackendError<SesError>> {
        let request = self
            .send_email_request(email)
            .map_err(BackendError::Transport)?;

        debug!(region = %self.config.aws.region, "calling SES SendEmail");
        let output = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(from_sdk_error(&e)))?;

        let receipt = DeliveryReceipt::new("ses", "sent");
        Ok(match output.message_id() {
            Some(id) => receipt.with_message_id(id),
            None => receipt,
        })
    }

    fn classify_error(&self, error: &SesError) -> ErrorClass {
        classify_ses_error(error)
    }
}

fn build_client(config: &AwsBaseConfig) -> aws_sdk_sesv2::Client {
    let credentials = Credentials::new(
        config.access_key_id.clone(),
        config.secret_access_key.clone(),
        None,
        None,
        "mailgate-static",
    );
    let timeout = config.timeout();

    let mut builder = aws_sdk_sesv2::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .retry_config(RetryConfig::disabled())
        .timeout_config(
            TimeoutConfig::builder()
                .connect_timeout(timeout)
                .operation_timeout(timeout)
                .build(),
        );

    if let Some(endpoint) = &config.endpoint_url {
        debug!(endpoint = %endpoint, "using custom AWS endpoint");
        builder = builder.endpoint_url(endpoint);
    }

    aws_sdk_sesv2::Client::from_conf(builder.build())
}

fn utf8_content(data: &str) -> Result<Content, SesError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| SesError::Request(e.to_string()))
}

/// Convert an SDK error into an [`SesError`].
///
/// Service errors keep their code and HTTP status; dispatch failures and
/// timeouts become network errors.
pub fn from_sdk_error<E>(error: &SdkError<E, HttpResponse>) -> SesError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let message = DisplayErrorContext(error).to_string();
    match error {
        SdkError::ServiceError(context) => {
            let err = context.err();
            SesError::Service {
                code: err.code().unwrap_or("Unknown").to_owned(),
                message: err.message().unwrap_or_default().to_owned(),
                status: context.raw().status().as_u16(),
            }
        }
        SdkError::TimeoutError(_) => SesError::Network {
            kind: NetworkErrorKind::Timeout,
            message,
        },
        SdkError::DispatchFailure(failure) => {
            let kind = if failure.is_timeout() {
                Some(NetworkErrorKind::Timeout)
            } else if failure.is_io() {
                Some(NetworkErrorKind::from_source_chain(error).unwrap_or(NetworkErrorKind::Io))
            } else {
                NetworkErrorKind::from_source_chain(error)
            };
            match kind {
                Some(kind) => SesError::Network { kind, message },
                None => SesError::Request(message),
            }
        }
        _ => SesError::Request(message),
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use mailgate_core::EmailMessage;

    struct MockSesServer {
        listener: TcpListener,
        endpoint: String,
    }

    impl MockSesServer {
        async fn start() -> Self {
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("failed to bind mock server");
            let port = listener.local_addr().unwrap().port();
            Self {
                listener,
                endpoint: format!("http://127.0.0.1:{port}"),
            }
        }

        /// Read one full request, then answer it.
        fn respond_once(self, status_line: &'static str, headers: &'static str, body: &'static str) {
            tokio::spawn(async move {
                let (mut stream, _) = self.listener.accept().await.unwrap();
                read_request(&mut stream).await;
                let response = format!(
                    "HTTP/1.1 {status_line}\r\n\
                     {headers}\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\
                     \r\n\
                     {body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            });
        }

        /// Accept one request and never answer it.
        fn stall(self) {
            tokio::spawn(async move {
                let (mut stream, _) = self.listener.accept().await.unwrap();
                read_request(&mut stream).await;
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            });
        }
    }

    async fn read_request(stream: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    return;
                }
            }
        }
    }

    fn config_for(endpoint: &str) -> SesConfig {
        SesConfig::new("us-east-1", "AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG")
            .with_endpoint_url(endpoint)
            .with_timeout_secs(5)
    }

    fn email() -> EmailMessage {
        EmailMessage::new("user@example.com", "noreply@example.com", "Hi", "Hello")
    }

    #[test]
    fn construction_requires_region_first() {
        let config = SesConfig::default();
        assert_eq!(
            SesBackend::new(config).unwrap_err(),
            ConfigError::MissingSetting("region")
        );

        let config = SesConfig::new("us-east-1", "", "secret");
        assert_eq!(
            SesBackend::new(config).unwrap_err(),
            ConfigError::MissingSetting("access_key_id")
        );
    }

    #[test]
    fn config_builder_chain() {
        let config = SesConfig::new("eu-west-1", "AKID", "secret")
            .with_configuration_set("my-set")
            .with_endpoint_url("http://localhost:4566");
        assert_eq!(config.aws.region, "eu-west-1");
        assert_eq!(config.configuration_set.as_deref(), Some("my-set"));
        assert!(config.aws.endpoint_url.is_some());
    }

    #[test]
    fn config_deserializes_flattened() {
        let json = serde_json::json!({
            "region": "us-west-2",
            "access_key_id": "AKID",
            "secret_access_key": "secret",
            "configuration_set": "tracking"
        });
        let config: SesConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.aws.region, "us-west-2");
        assert_eq!(config.configuration_set.as_deref(), Some("tracking"));
    }

    #[tokio::test]
    async fn successful_send_returns_message_id() {
        let server = MockSesServer::start().await;
        let backend = SesBackend::new(config_for(&server.endpoint)).unwrap();
        server.respond_once("200 OK", "", r#"{"MessageId":"0100-abc"}"#);

        let receipt = EmailBackend::deliver(&backend, &email()).await.unwrap();
        assert_eq!(receipt.provider, "ses");
        assert_eq!(receipt.status, "sent");
        assert_eq!(receipt.message_id.as_deref(), Some("0100-abc"));
    }

    #[tokio::test]
    async fn unknown_code_with_server_error_is_transient() {
        let server = MockSesServer::start().await;
        let backend = SesBackend::new(config_for(&server.endpoint)).unwrap();
        server.respond_once(
            "503 Service Unavailable",
            "x-amzn-ErrorType: SomethingNew\r\n",
            r#"{"message":"try later"}"#,
        );

        let err = EmailBackend::deliver(&backend, &email()).await.unwrap_err();
        assert!(err.is_transient());
        assert!(matches!(
            err.downcast_original::<SesError>(),
            Some(SesError::Service { code, status: 503, .. }) if code == "SomethingNew"
        ));
    }

    #[tokio::test]
    async fn unknown_code_with_client_error_is_fatal() {
        let server = MockSesServer::start().await;
        let backend = SesBackend::new(config_for(&server.endpoint)).unwrap();
        server.respond_once(
            "403 Forbidden",
            "x-amzn-ErrorType: SomethingNew\r\n",
            r#"{"message":"nope"}"#,
        );

        let err = EmailBackend::deliver(&backend, &email()).await.unwrap_err();
        assert!(!err.is_transient());
        assert!(err.message().starts_with("SES delivery error: SomethingNew"));
    }

    #[tokio::test]
    async fn known_fatal_code_is_fatal() {
        let server = MockSesServer::start().await;
        let backend = SesBackend::new(config_for(&server.endpoint)).unwrap();
        server.respond_once(
            "400 Bad Request",
            "x-amzn-ErrorType: MessageRejected\r\n",
            r#"{"message":"Email address is not verified."}"#,
        );

        let err = EmailBackend::deliver(&backend, &email()).await.unwrap_err();
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn refused_connection_is_transient() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let backend = SesBackend::new(config_for(&format!("http://127.0.0.1:{port}"))).unwrap();

        let err = EmailBackend::deliver(&backend, &email()).await.unwrap_err();
        assert!(err.is_transient());
        assert!(matches!(
            err.downcast_original::<SesError>(),
            Some(SesError::Network { .. })
        ));
    }

    #[tokio::test]
    async fn unanswered_request_times_out_as_transient() {
        let server = MockSesServer::start().await;
        let config = config_for(&server.endpoint).with_timeout_secs(1);
        let backend = SesBackend::new(config).unwrap();
        server.stall();

        let err = EmailBackend::deliver(&backend, &email()).await.unwrap_err();
        assert!(err.is_transient());
        assert!(matches!(
            err.downcast_original::<SesError>(),
            Some(SesError::Network {
                kind: NetworkErrorKind::Timeout,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn unresolvable_endpoint_is_transient() {
        let backend = SesBackend::new(config_for("http://mailgate-ses.invalid")).unwrap();

        let err = EmailBackend::deliver(&backend, &email()).await.unwrap_err();
        assert!(err.is_transient());
        assert!(matches!(
            err.downcast_original::<SesError>(),
            Some(SesError::Network {
                kind: NetworkErrorKind::Dns | NetworkErrorKind::Io,
                ..
            })
        ));
    }
}
