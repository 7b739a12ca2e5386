//! The pluggable serializer and deserializer contract of the Kafka client. Both are configured
//! once with the properties of the producer or consumer, after which they are used for every
//! record, and closed when the client closes.
use crate::config::Properties;
use crate::error::SerdeError;

pub trait Serializer<T: ?Sized> {
    /// `is_key` tells whether the serializer is used for the key or the value of the records.
    fn configure(&mut self, configs: &Properties, is_key: bool) -> Result<(), SerdeError>;

    /// A `None` result means the record is sent without a value or key.
    fn serialize(&self, topic: &str, data: Option<&T>) -> Result<Option<Vec<u8>>, SerdeError>;

    fn close(&mut self) {}
}

pub trait Deserializer<T> {
    /// `is_key` tells whether the deserializer is used for the key or the value of the records.
    fn configure(&mut self, configs: &Properties, is_key: bool) -> Result<(), SerdeError>;

    fn deserialize(&self, topic: &str, data: Option<&[u8]>) -> Result<T, SerdeError>;

    fn close(&mut self) {}
}
