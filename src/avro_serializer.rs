//! Serializer for the Kafka producer.
//!
//! Records are turned into bytes by the codec, which prefixes the Avro encoded payload with a
//! reference to the matching schema in the schema registry. Both [`GenericRecord`]s and specific
//! records, structs implementing `serde::Serialize` and `apache_avro::AvroSchema`, can be sent.
//!
//! [`GenericRecord`]: crate::record::GenericRecord
use core::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use log::{debug, info, trace, warn};

use crate::codec::{AvroCodec, CodecFactory, CodecSettings};
use crate::config::{KafkaAvroSerializerConfig, Properties};
use crate::credential::{ClientSecretCredential, CredentialSource};
use crate::error::SerdeError;
use crate::record::AvroRecord;
use crate::schema_registry::SrSettings;
use crate::serialization::Serializer;

/// Serializer implementing the [`Serializer`] contract, the codec is created when configured.
///
/// ```
/// use std::sync::Arc;
/// use azure_schemaregistry_kafka_avro::avro_serializer::KafkaAvroSerializer;
/// use azure_schemaregistry_kafka_avro::codec::{AvroCodec, CodecFactory, CodecSettings};
/// use azure_schemaregistry_kafka_avro::credential::ClientSecretCredential;
/// use azure_schemaregistry_kafka_avro::error::SerdeError;
/// use azure_schemaregistry_kafka_avro::record::GenericRecord;
/// use azure_schemaregistry_kafka_avro::serialization::Serializer;
///
/// struct NoCodec;
///
/// impl CodecFactory for NoCodec {
///     fn serializer_codec(&self, _: CodecSettings) -> Result<Box<dyn AvroCodec>, SerdeError> {
///         Err(SerdeError::configuration_without_cause("no codec"))
///     }
///     fn deserializer_codec(&self, _: CodecSettings) -> Result<Box<dyn AvroCodec>, SerdeError> {
///         Err(SerdeError::configuration_without_cause("no codec"))
///     }
/// }
///
/// let credential = ClientSecretCredential::new_builder()
///     .tenant_id("tenant")
///     .client_id("client")
///     .client_secret("secret")
///     .build()
///     .unwrap();
/// let serializer: KafkaAvroSerializer<GenericRecord> =
///     KafkaAvroSerializer::new(Arc::new(NoCodec), Arc::new(credential));
///
/// // null values are kept null, also without being configured
/// assert_eq!(serializer.serialize("heartbeats", None), Ok(None));
/// ```
pub struct KafkaAvroSerializer<R: ?Sized> {
    codec_factory: Arc<dyn CodecFactory>,
    credential_source: Arc<dyn CredentialSource>,
    codec: Option<Box<dyn AvroCodec>>,
    _record: PhantomData<fn(&R)>,
}

impl<R: ?Sized> fmt::Debug for KafkaAvroSerializer<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KafkaAvroSerializer")
            .field("configured", &self.codec.is_some())
            .finish()
    }
}

impl<R: ?Sized> KafkaAvroSerializer<R> {
    /// The codec factory is used to create the codec when configured, the credential source is
    /// used to get the identity to authenticate against the schema registry.
    pub fn new(
        codec_factory: Arc<dyn CodecFactory>,
        credential_source: Arc<dyn CredentialSource>,
    ) -> KafkaAvroSerializer<R> {
        KafkaAvroSerializer {
            codec_factory,
            credential_source,
            codec: None,
            _record: PhantomData,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.codec.is_some()
    }

    fn codec(&self) -> Result<&dyn AvroCodec, SerdeError> {
        match &self.codec {
            Some(c) => Ok(c.as_ref()),
            None => Err(SerdeError::configuration_without_cause(
                "serializer is used before it was configured",
            )),
        }
    }
}

impl<R: AvroRecord + ?Sized> Serializer<R> for KafkaAvroSerializer<R> {
    /// Errors from the codec factory are returned as is.
    fn configure(&mut self, configs: &Properties, is_key: bool) -> Result<(), SerdeError> {
        let config = KafkaAvroSerializerConfig::from_properties(configs)?;
        let credential = ClientSecretCredential::from_source(self.credential_source.as_ref())?;
        let sr_settings = SrSettings::new_builder(config.serde.schema_registry_url)
            .set_credential(credential)
            .set_max_cache_size(config.serde.max_schema_map_size)
            .build()?;
        info!(
            "Configuring Avro serializer for schema registry {}, schema group {}, auto register schemas {}, is key {}",
            sr_settings.endpoint(),
            config.schema_group,
            config.auto_register_schemas,
            is_key
        );
        let codec = self.codec_factory.serializer_codec(CodecSettings {
            sr_settings,
            schema_group: Some(config.schema_group),
            auto_register_schemas: config.auto_register_schemas,
            avro_specific_reader: false,
        })?;
        if self.codec.replace(codec).is_some() {
            warn!("Avro serializer was already configured, the previous codec is replaced");
        }
        Ok(())
    }

    fn serialize(&self, topic: &str, data: Option<&R>) -> Result<Option<Vec<u8>>, SerdeError> {
        // A null value on a compacted topic marks the key as deleted, so it's kept null instead of
        // encoding an Avro null, and no schema is registered for it.
        let record = match data {
            None => {
                debug!("Null record for topic {} is sent as null", topic);
                return Ok(None);
            }
            Some(r) => r,
        };
        let codec = self.codec()?;
        let generic_record = record.to_generic_record()?;
        let bytes = codec
            .encode(&generic_record)
            .map_err(|e| e.into_serialization(&format!("Could not serialize record for topic {}", topic)))?;
        trace!("Serialized record for topic {} into {} bytes", topic, bytes.len());
        Ok(Some(bytes))
    }

    fn close(&mut self) {}
}
