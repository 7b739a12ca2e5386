//! Kafka serializer and deserializer adapters for Avro records, using a schema registry backed
//! codec.
//!
//! The adapters follow the pluggable [serializer](serialization::Serializer) and
//! [deserializer](serialization::Deserializer) contract of the Kafka client. They are configured
//! once with the properties of the producer or consumer:
//!
//! | property | used by | default |
//! |---|---|---|
//! | `schema.registry.url` | both | required |
//! | `max.schema.map.size` | both | 1000 |
//! | `schema.group` | serializer | required |
//! | `auto.register.schemas` | serializer | false |
//! | `specific.avro.reader` | deserializer | false |
//!
//! The identity used to authenticate against the schema registry, `eh.tenant.id`,
//! `eh.client.id` and `eh.client.secret`, is not read from the properties but from the
//! [`CredentialSource`](credential::CredentialSource) the adapter was created with.
//!
//! Fetching, caching and registering schema's, the Avro encoding, and prefixing the payload with
//! the schema id are all done by the [`AvroCodec`](codec::AvroCodec), which is created by the
//! [`CodecFactory`](codec::CodecFactory) during configuration.
//!
//! A null record is serialized as null, so the tombstone meaning on compacted topics is kept.
//!
//! Resulting errors are [`SerdeError`](error::SerdeError), besides the error they also tell at
//! which stage it failed, and whether it's retriable. The adapters don't retry anything.

pub mod avro_deserializer;
pub mod avro_serializer;
pub mod codec;
pub mod config;
pub mod credential;
pub mod error;
pub mod record;
pub mod schema_registry;
pub mod serialization;
