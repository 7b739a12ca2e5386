//! The seam between the adapters and the schema registry backed Avro codec.
//!
//! The adapters don't know anything about the wire format, fetching or registering schema's, or
//! how to get a token with the credential. All of that is done by an [`AvroCodec`], which is
//! created by a [`CodecFactory`] when an adapter is configured.
use std::io::Read;
use std::sync::Arc;

use crate::error::SerdeError;
use crate::record::GenericRecord;
use crate::schema_registry::SrSettings;

/// Everything the factory needs to create a codec, as read from the properties.
#[derive(Clone, Debug, PartialEq)]
pub struct CodecSettings {
    pub sr_settings: SrSettings,
    /// Only set for the serializer, schema's are looked up, and registered, in this group.
    pub schema_group: Option<String>,
    pub auto_register_schemas: bool,
    pub avro_specific_reader: bool,
}

/// Encodes records to bytes, including whatever is needed to find the schema back, and decodes
/// them again. Implementations are shared between the threads of the Kafka client, so any caching
/// needs to be safe to use concurrently.
pub trait AvroCodec: Send + Sync {
    fn encode(&self, record: &GenericRecord) -> Result<Vec<u8>, SerdeError>;
    fn decode(&self, reader: &mut dyn Read) -> Result<GenericRecord, SerdeError>;
}

impl<C: AvroCodec + ?Sized> AvroCodec for Arc<C> {
    fn encode(&self, record: &GenericRecord) -> Result<Vec<u8>, SerdeError> {
        (**self).encode(record)
    }
    fn decode(&self, reader: &mut dyn Read) -> Result<GenericRecord, SerdeError> {
        (**self).decode(reader)
    }
}

/// Creates the codec for an adapter. Creating the codec should not require a call to the schema
/// registry.
pub trait CodecFactory: Send + Sync {
    fn serializer_codec(&self, settings: CodecSettings) -> Result<Box<dyn AvroCodec>, SerdeError>;
    fn deserializer_codec(&self, settings: CodecSettings)
        -> Result<Box<dyn AvroCodec>, SerdeError>;
}
