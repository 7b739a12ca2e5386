//! Records as they go in and come out of the adapters.
//!
//! On the write side anything implementing [`AvroRecord`] can be serialized. That is a
//! [`GenericRecord`], which carries its own schema, or any struct that implements both
//! `serde::Serialize` and `apache_avro::AvroSchema`. On the read side it depends on the
//! `specific.avro.reader` setting whether a [`DecodedRecord::Generic`] or a
//! [`DecodedRecord::Specific`] comes out.
use std::borrow::Cow;
use std::sync::Arc;

use apache_avro::schema::{Name, RecordSchema, Schema};
use apache_avro::types::{Record, Value};
use apache_avro::{to_value, AvroSchema};
use serde::Serialize;

use crate::error::{ErrorKind, SerdeError};

/// A value together with the schema it was written with, or should be written with.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericRecord {
    schema: Arc<Schema>,
    value: Value,
}

impl GenericRecord {
    /// The value is not checked against the schema here, the codec will fail to encode it when
    /// they don't match.
    pub fn new(schema: Arc<Schema>, value: Value) -> GenericRecord {
        GenericRecord { schema, value }
    }

    /// Creates a record by putting the values on the fields of a record schema.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use apache_avro::Schema;
    /// use apache_avro::types::Value;
    /// use azure_schemaregistry_kafka_avro::record::GenericRecord;
    ///
    /// let schema = Schema::parse_str(r#"{"type":"record","name":"Heartbeat","namespace":"nl.openweb.data","fields":[{"name":"beat","type":"long"}]}"#).unwrap();
    /// let record = GenericRecord::from_values(Arc::new(schema), vec![("beat", Value::Long(3))]).unwrap();
    /// assert_eq!(record.value(), &Value::Record(vec![("beat".to_string(), Value::Long(3))]));
    /// assert_eq!(record.full_name(), Some(String::from("nl.openweb.data.Heartbeat")));
    /// ```
    pub fn from_values(
        schema: Arc<Schema>,
        values: Vec<(&str, Value)>,
    ) -> Result<GenericRecord, SerdeError> {
        let mut record = match Record::new(&schema) {
            Some(v) => v,
            None => {
                return Err(SerdeError::new(
                    ErrorKind::Serialization,
                    "Could not create record from schema",
                    None,
                    false,
                ));
            }
        };
        for value in values {
            record.put(value.0, value.1)
        }
        let value = Value::from(record);
        Ok(GenericRecord { schema, value })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The name of the schema, only present for records.
    pub fn name(&self) -> Option<Name> {
        get_name(&self.schema)
    }

    /// Fully qualified name of the schema, like `nl.openweb.data.Heartbeat`.
    pub fn full_name(&self) -> Option<String> {
        self.name().map(|n| match n.namespace {
            None => n.name,
            Some(ns) => format!("{}.{}", ns, n.name),
        })
    }

    pub fn into_parts(self) -> (Arc<Schema>, Value) {
        (self.schema, self.value)
    }
}

/// Anything that can be handed to the serializer.
pub trait AvroRecord {
    fn to_generic_record(&self) -> Result<Cow<'_, GenericRecord>, SerdeError>;
}

impl AvroRecord for GenericRecord {
    fn to_generic_record(&self) -> Result<Cow<'_, GenericRecord>, SerdeError> {
        Ok(Cow::Borrowed(self))
    }
}

/// Structs with a schema, typically with `#[derive(AvroSchema, Serialize)]`, are the specific
/// records.
impl<T> AvroRecord for T
where
    T: AvroSchema + Serialize,
{
    fn to_generic_record(&self) -> Result<Cow<'_, GenericRecord>, SerdeError> {
        item_to_generic_record(T::get_schema(), self).map(Cow::Owned)
    }
}

/// The result of the deserializer, which variant depends on the `specific.avro.reader` setting.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodedRecord<T> {
    Generic(GenericRecord),
    Specific(T),
}

impl<T> DecodedRecord<T> {
    pub fn generic(self) -> Option<GenericRecord> {
        match self {
            DecodedRecord::Generic(r) => Some(r),
            DecodedRecord::Specific(_) => None,
        }
    }

    pub fn specific(self) -> Option<T> {
        match self {
            DecodedRecord::Generic(_) => None,
            DecodedRecord::Specific(t) => Some(t),
        }
    }
}

/// Using the schema with an item implementing serialize the item will be resolved according to
/// the avro specification.
pub(crate) fn item_to_generic_record(
    schema: Schema,
    item: impl Serialize,
) -> Result<GenericRecord, SerdeError> {
    let value = to_value(item).map_err(|e| {
        SerdeError::new(
            ErrorKind::Serialization,
            "Could not transform to apache_avro value",
            Some(format!("{}", e)),
            false,
        )
    })?;
    match value.resolve(&schema) {
        Ok(v) => Ok(GenericRecord::new(Arc::new(schema), v)),
        Err(e) => Err(SerdeError::new(
            ErrorKind::Serialization,
            "Failed to resolve",
            Some(format!("{}", e)),
            false,
        )),
    }
}

pub(crate) fn get_name(schema: &Schema) -> Option<Name> {
    match schema {
        Schema::Record(RecordSchema { name: n, .. }) => Some(n.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    const HEARTBEAT: &str = r#"{"type":"record","name":"Heartbeat","namespace":"nl.openweb.data","fields":[{"name":"beat","type":"long"}]}"#;

    #[derive(Serialize)]
    struct Heartbeat {
        beat: i64,
    }

    #[derive(Serialize)]
    struct Other {
        name: String,
    }

    #[test]
    fn from_values_no_record() {
        let result = GenericRecord::from_values(Arc::new(Schema::Boolean), vec![("beat", Value::Long(3))]);
        assert_eq!(
            result,
            Err(SerdeError::new(
                ErrorKind::Serialization,
                "Could not create record from schema",
                None,
                false,
            ))
        )
    }

    #[test]
    fn primitive_has_no_name() {
        let record = GenericRecord::new(Arc::new(Schema::String), Value::String("key".into()));
        assert_eq!(record.name(), None);
        assert_eq!(record.full_name(), None);
    }

    #[test]
    fn item_resolves_to_record() {
        let record =
            item_to_generic_record(Schema::parse_str(HEARTBEAT).unwrap(), Heartbeat { beat: 3 })
                .unwrap();
        assert_eq!(
            record.value(),
            &Value::Record(vec![("beat".to_string(), Value::Long(3))])
        );
        let name = record.name().unwrap();
        assert_eq!(name.name.as_str(), "Heartbeat");
        assert_eq!(name.namespace.unwrap().as_str(), "nl.openweb.data");
    }

    #[test]
    fn item_does_not_resolve() {
        let err = item_to_generic_record(
            Schema::parse_str(HEARTBEAT).unwrap(),
            Other {
                name: String::from("beat"),
            },
        )
        .unwrap_err();
        assert_eq!(err.error, "Failed to resolve");
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[test]
    fn generic_record_is_borrowed() {
        let record = GenericRecord::new(Arc::new(Schema::Long), Value::Long(5));
        match record.to_generic_record().unwrap() {
            Cow::Borrowed(r) => assert_eq!(r, &record),
            Cow::Owned(_) => panic!("generic record should not be copied"),
        }
    }

    #[test]
    fn decoded_record_variants() {
        let generic: DecodedRecord<i64> =
            DecodedRecord::Generic(GenericRecord::new(Arc::new(Schema::Long), Value::Long(5)));
        assert!(generic.clone().specific().is_none());
        assert_eq!(generic.generic().unwrap().value(), &Value::Long(5));

        let specific: DecodedRecord<i64> = DecodedRecord::Specific(5);
        assert_eq!(specific.specific(), Some(5));
    }
}
