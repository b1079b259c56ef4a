//! Contact form submission to an EmailJS-compatible delivery endpoint.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    #[error("email delivery is not configured (missing {0})")]
    NotConfigured(&'static str),

    #[error("email delivery failed: {0}")]
    Delivery(#[from] reqwest::Error),

    #[error("email service rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Services offered on the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Wedding,
    Portrait,
    Corporate,
    Event,
    Nature,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wedding => "wedding",
            Self::Portrait => "portrait",
            Self::Corporate => "corporate",
            Self::Event => "event",
            Self::Nature => "nature",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wedding" => Ok(Self::Wedding),
            "portrait" => Ok(Self::Portrait),
            "corporate" => Ok(Self::Corporate),
            "event" => Ok(Self::Event),
            "nature" => Ok(Self::Nature),
            _ => Err(ContactError::Invalid {
                field: "service",
                reason: "unknown service",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub service: Service,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::Invalid {
                field: "name",
                reason: "must not be empty",
            });
        }
        if !looks_like_email(self.email.trim()) {
            return Err(ContactError::Invalid {
                field: "email",
                reason: "not an email address",
            });
        }
        if self.message.trim().is_empty() {
            return Err(ContactError::Invalid {
                field: "message",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !s.chars().any(char::is_whitespace)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailJsConfig {
    pub endpoint: String,
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    name: &'a str,
    address: &'a str,
    #[serde(rename = "companyName")]
    company_name: &'a str,
    #[serde(rename = "serviceName")]
    service_name: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

/// Client for the EmailJS REST send endpoint.
pub struct EmailJsClient {
    http: reqwest::Client,
    endpoint: String,
    service_id: String,
    template_id: String,
    public_key: String,
}

impl EmailJsClient {
    pub fn from_config(config: &EmailJsConfig) -> Result<Self, ContactError> {
        let service_id = config
            .service_id
            .clone()
            .ok_or(ContactError::NotConfigured("service id"))?;
        let template_id = config
            .template_id
            .clone()
            .ok_or(ContactError::NotConfigured("template id"))?;
        let public_key = config
            .public_key
            .clone()
            .ok_or(ContactError::NotConfigured("public key"))?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            service_id,
            template_id,
            public_key,
        })
    }

    fn payload<'a>(&'a self, form: &'a ContactForm) -> SendRequest<'a> {
        SendRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: TemplateParams {
                name: form.name.trim(),
                address: form.email.trim(),
                company_name: form.company.as_deref().unwrap_or("").trim(),
                service_name: form.service.as_str(),
                message: &form.message,
            },
        }
    }

    /// Validates and delivers the form. No retries.
    pub async fn send(&self, form: &ContactForm) -> Result<(), ContactError> {
        form.validate()?;

        debug!(service = %form.service, endpoint = %self.endpoint, "Sending contact form");
        let response = self
            .http
            .post(self.endpoint.as_str())
            .json(&self.payload(form))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("Contact form delivered");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Contact form rejected");
        Err(ContactError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Layla".into(),
            email: "layla@example.com".into(),
            company: None,
            service: Service::Wedding,
            message: "We are getting married in June.".into(),
        }
    }

    fn configured() -> EmailJsConfig {
        EmailJsConfig {
            endpoint: DEFAULT_EMAILJS_ENDPOINT.into(),
            service_id: Some("service_x".into()),
            template_id: Some("template_y".into()),
            public_key: Some("key_z".into()),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_rejects_blank_fields() {
        let mut f = form();
        f.name = "   ".into();
        assert!(matches!(
            f.validate(),
            Err(ContactError::Invalid { field: "name", .. })
        ));

        let mut f = form();
        f.message.clear();
        assert!(matches!(
            f.validate(),
            Err(ContactError::Invalid {
                field: "message",
                ..
            })
        ));
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@@b.co"));
        assert!(!looks_like_email("a b@c.de"));
        assert!(!looks_like_email("plain"));
    }

    #[test]
    fn test_service_parse() {
        assert_eq!("Portrait".parse::<Service>().unwrap(), Service::Portrait);
        assert!("drone".parse::<Service>().is_err());
    }

    #[test]
    fn test_client_requires_credentials() {
        let mut config = configured();
        config.public_key = None;
        assert!(matches!(
            EmailJsClient::from_config(&config),
            Err(ContactError::NotConfigured("public key"))
        ));
    }

    #[test]
    fn test_payload_shape() {
        let client = EmailJsClient::from_config(&configured()).unwrap();
        let mut f = form();
        f.company = Some(" Studio ".into());
        let value = serde_json::to_value(client.payload(&f)).unwrap();

        assert_eq!(value["service_id"], "service_x");
        assert_eq!(value["template_id"], "template_y");
        assert_eq!(value["user_id"], "key_z");
        assert_eq!(value["template_params"]["address"], "layla@example.com");
        assert_eq!(value["template_params"]["companyName"], "Studio");
        assert_eq!(value["template_params"]["serviceName"], "wedding");
    }
}
