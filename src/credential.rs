//! Identity used to authenticate against the schema registry.
//!
//! The adapters never look up secrets themselves, a [`CredentialSource`] is handed to them when
//! they are created. This makes it possible to supply the credential directly, read it from the
//! environment with [`EnvConfig`], or use a plain map in tests.
use core::fmt;
use std::collections::HashMap;
use std::env;

use crate::error::SerdeError;

pub const TENANT_ID_CONFIG: &str = "eh.tenant.id";
pub const CLIENT_ID_CONFIG: &str = "eh.client.id";
pub const CLIENT_SECRET_CONFIG: &str = "eh.client.secret";

/// Something the identity parameters can be read from.
pub trait CredentialSource: Send + Sync {
    fn get_value(&self, key: &str) -> Option<String>;
}

impl CredentialSource for HashMap<String, String> {
    fn get_value(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Reads the values from the environment of the process. For `eh.tenant.id` it will try
/// `eh.tenant.id`, `eh_tenant_id` and `EH_TENANT_ID`, in that order.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvConfig;

impl CredentialSource for EnvConfig {
    fn get_value(&self, key: &str) -> Option<String> {
        env_keys(key).iter().find_map(|k| env::var(k).ok())
    }
}

fn env_keys(key: &str) -> [String; 3] {
    let sanitized: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let upper = sanitized.to_ascii_uppercase();
    [String::from(key), sanitized, upper]
}

/// Client secret credential for an app registration, the secret is never printed.
#[derive(Clone, PartialEq)]
pub struct ClientSecretCredential {
    tenant_id: String,
    client_id: String,
    client_secret: String,
}

impl fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ClientSecretCredential`], all three values are required.
/// ```
/// use azure_schemaregistry_kafka_avro::credential::ClientSecretCredential;
/// let credential = ClientSecretCredential::new_builder()
///     .tenant_id("tenant")
///     .client_id("client")
///     .client_secret("secret")
///     .build()
///     .unwrap();
/// assert_eq!(credential.client_id(), "client");
/// ```
#[derive(Default)]
pub struct ClientSecretCredentialBuilder {
    tenant_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl ClientSecretCredential {
    pub fn new_builder() -> ClientSecretCredentialBuilder {
        ClientSecretCredentialBuilder::default()
    }

    /// Reads the three identity values from the source, fails when one of them is missing.
    pub fn from_source(
        source: &dyn CredentialSource,
    ) -> Result<ClientSecretCredential, SerdeError> {
        let mut builder = ClientSecretCredential::new_builder();
        if let Some(v) = source.get_value(TENANT_ID_CONFIG) {
            builder.tenant_id(&v);
        }
        if let Some(v) = source.get_value(CLIENT_ID_CONFIG) {
            builder.client_id(&v);
        }
        if let Some(v) = source.get_value(CLIENT_SECRET_CONFIG) {
            builder.client_secret(&v);
        }
        builder.build()
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

/// An already resolved credential can be used as source directly.
impl CredentialSource for ClientSecretCredential {
    fn get_value(&self, key: &str) -> Option<String> {
        match key {
            TENANT_ID_CONFIG => Some(self.tenant_id.clone()),
            CLIENT_ID_CONFIG => Some(self.client_id.clone()),
            CLIENT_SECRET_CONFIG => Some(self.client_secret.clone()),
            _ => None,
        }
    }
}

impl ClientSecretCredentialBuilder {
    pub fn tenant_id(&mut self, tenant_id: &str) -> &mut ClientSecretCredentialBuilder {
        self.tenant_id = Some(String::from(tenant_id));
        self
    }

    pub fn client_id(&mut self, client_id: &str) -> &mut ClientSecretCredentialBuilder {
        self.client_id = Some(String::from(client_id));
        self
    }

    pub fn client_secret(&mut self, client_secret: &str) -> &mut ClientSecretCredentialBuilder {
        self.client_secret = Some(String::from(client_secret));
        self
    }

    pub fn build(&mut self) -> Result<ClientSecretCredential, SerdeError> {
        Ok(ClientSecretCredential {
            tenant_id: required(&self.tenant_id, TENANT_ID_CONFIG)?,
            client_id: required(&self.client_id, CLIENT_ID_CONFIG)?,
            client_secret: required(&self.client_secret, CLIENT_SECRET_CONFIG)?,
        })
    }
}

fn required(value: &Option<String>, key: &str) -> Result<String, SerdeError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(SerdeError::configuration_without_cause(&format!(
            "{} is required to create the credential",
            key
        ))),
    }
}
