//! Deserializer for the Kafka consumer.
//!
//! Bytes are turned into records by the codec, using the schema referenced in the bytes. With
//! `specific.avro.reader` set to true the decoded value is read into `T`, otherwise the
//! [`GenericRecord`] from the codec is returned.
//!
//! [`GenericRecord`]: crate::record::GenericRecord
use core::fmt;
use std::io::Cursor;
use std::marker::PhantomData;
use std::sync::Arc;

use apache_avro::from_value;
use log::{info, trace, warn};
use serde::de::DeserializeOwned;

use crate::codec::{AvroCodec, CodecFactory, CodecSettings};
use crate::config::{KafkaAvroDeserializerConfig, Properties};
use crate::credential::{ClientSecretCredential, CredentialSource};
use crate::error::SerdeError;
use crate::record::{DecodedRecord, GenericRecord};
use crate::schema_registry::SrSettings;
use crate::serialization::Deserializer;

/// Deserializer implementing the [`Deserializer`] contract, the codec is created when configured.
pub struct KafkaAvroDeserializer<T> {
    codec_factory: Arc<dyn CodecFactory>,
    credential_source: Arc<dyn CredentialSource>,
    codec: Option<Box<dyn AvroCodec>>,
    avro_specific_reader: bool,
    _record: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for KafkaAvroDeserializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KafkaAvroDeserializer")
            .field("configured", &self.codec.is_some())
            .field("avro_specific_reader", &self.avro_specific_reader)
            .finish()
    }
}

impl<T> KafkaAvroDeserializer<T> {
    /// The codec factory is used to create the codec when configured, the credential source is
    /// used to get the identity to authenticate against the schema registry.
    pub fn new(
        codec_factory: Arc<dyn CodecFactory>,
        credential_source: Arc<dyn CredentialSource>,
    ) -> KafkaAvroDeserializer<T> {
        KafkaAvroDeserializer {
            codec_factory,
            credential_source,
            codec: None,
            avro_specific_reader: false,
            _record: PhantomData,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.codec.is_some()
    }

    pub fn is_specific_reader(&self) -> bool {
        self.avro_specific_reader
    }

    fn codec(&self) -> Result<&dyn AvroCodec, SerdeError> {
        match &self.codec {
            Some(c) => Ok(c.as_ref()),
            None => Err(SerdeError::configuration_without_cause(
                "deserializer is used before it was configured",
            )),
        }
    }
}

impl<T: DeserializeOwned> KafkaAvroDeserializer<T> {
    fn materialize(&self, record: GenericRecord) -> Result<DecodedRecord<T>, SerdeError> {
        if !self.avro_specific_reader {
            return Ok(DecodedRecord::Generic(record));
        }
        match from_value::<T>(record.value()) {
            Ok(t) => Ok(DecodedRecord::Specific(t)),
            Err(e) => Err(SerdeError::deserialization_with_cause(
                e,
                &format!(
                    "Could not read {} as {}",
                    record.full_name().as_deref().unwrap_or("value"),
                    std::any::type_name::<T>()
                ),
            )),
        }
    }
}

impl<T: DeserializeOwned> Deserializer<DecodedRecord<T>> for KafkaAvroDeserializer<T> {
    /// Errors from the codec factory are returned as is.
    fn configure(&mut self, configs: &Properties, is_key: bool) -> Result<(), SerdeError> {
        let config = KafkaAvroDeserializerConfig::from_properties(configs)?;
        let credential = ClientSecretCredential::from_source(self.credential_source.as_ref())?;
        let sr_settings = SrSettings::new_builder(config.serde.schema_registry_url)
            .set_credential(credential)
            .set_max_cache_size(config.serde.max_schema_map_size)
            .build()?;
        info!(
            "Configuring Avro deserializer for schema registry {}, specific reader {}, is key {}",
            sr_settings.endpoint(),
            config.avro_specific_reader,
            is_key
        );
        let codec = self.codec_factory.deserializer_codec(CodecSettings {
            sr_settings,
            schema_group: None,
            auto_register_schemas: false,
            avro_specific_reader: config.avro_specific_reader,
        })?;
        if self.codec.replace(codec).is_some() {
            warn!("Avro deserializer was already configured, the previous codec is replaced");
        }
        self.avro_specific_reader = config.avro_specific_reader;
        Ok(())
    }

    /// There is no special handling for `None`, it's read as an empty payload, and the codec
    /// decides what that means.
    fn deserialize(&self, topic: &str, data: Option<&[u8]>) -> Result<DecodedRecord<T>, SerdeError> {
        let codec = self.codec()?;
        let mut reader = Cursor::new(data.unwrap_or_default());
        let record = codec.decode(&mut reader)?;
        trace!(
            "Deserialized {} bytes from topic {}",
            reader.position(),
            topic
        );
        self.materialize(record)
    }

    fn close(&mut self) {}
}
