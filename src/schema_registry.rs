//! Settings for the schema registry client the codec is bound to.

use url::Url;

use crate::credential::ClientSecretCredential;
use crate::error::SerdeError;

pub const DEFAULT_MAX_CACHE_SIZE: usize = 1000;

/// Settings used by the codec to do the calls to the schema registry. Only describes where the
/// registry is, how to authenticate, and how many schema's may be kept in memory. The codec
/// creating the actual client is free to only connect on first use.
#[derive(Debug, Clone, PartialEq)]
pub struct SrSettings {
    endpoint: Url,
    credential: ClientSecretCredential,
    max_cache_size: usize,
}

/// Struct to create an SrSettings, the credential is mandatory.
pub struct SrSettingsBuilder {
    endpoint: Url,
    credential: Option<ClientSecretCredential>,
    max_cache_size: usize,
}

impl SrSettings {
    /// Will create a new SrSettings with the default cache size.
    pub fn new(endpoint: Url, credential: ClientSecretCredential) -> SrSettings {
        SrSettings {
            endpoint,
            credential,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
        }
    }

    /// Will create a new SrSettingsBuilder with default values.
    pub fn new_builder(endpoint: Url) -> SrSettingsBuilder {
        SrSettingsBuilder {
            endpoint,
            credential: None,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
        }
    }

    /// The endpoint without a trailing slash, so paths can be appended directly.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str().trim_end_matches('/')
    }

    pub fn credential(&self) -> &ClientSecretCredential {
        &self.credential
    }

    pub fn max_cache_size(&self) -> usize {
        self.max_cache_size
    }
}

/// Builder for SrSettings
/// ```
/// use azure_schemaregistry_kafka_avro::credential::ClientSecretCredential;
/// use azure_schemaregistry_kafka_avro::schema_registry::SrSettings;
/// use url::Url;
///
/// let credential = ClientSecretCredential::new_builder()
///     .tenant_id("tenant")
///     .client_id("client")
///     .client_secret("secret")
///     .build()
///     .unwrap();
/// let sr_settings = SrSettings::new_builder(Url::parse("https://example.servicebus.windows.net/").unwrap())
///     .set_credential(credential)
///     .set_max_cache_size(50)
///     .build()
///     .unwrap();
/// assert_eq!(sr_settings.endpoint(), "https://example.servicebus.windows.net");
/// ```
impl SrSettingsBuilder {
    pub fn set_credential(&mut self, credential: ClientSecretCredential) -> &mut SrSettingsBuilder {
        self.credential = Some(credential);
        self
    }

    /// Sets the maximum amount of schema's the codec keeps in memory.
    pub fn set_max_cache_size(&mut self, max_cache_size: usize) -> &mut SrSettingsBuilder {
        self.max_cache_size = max_cache_size;
        self
    }

    pub fn build(&mut self) -> Result<SrSettings, SerdeError> {
        let credential = match &self.credential {
            Some(c) => c.clone(),
            None => {
                return Err(SerdeError::configuration_without_cause(
                    "a credential is required to create the schema registry settings",
                ))
            }
        };
        if self.max_cache_size == 0 {
            return Err(SerdeError::configuration_without_cause(
                "max cache size should be at least 1",
            ));
        }
        Ok(SrSettings {
            endpoint: self.endpoint.clone(),
            credential,
            max_cache_size: self.max_cache_size,
        })
    }
}
