use std::collections::HashMap;
use std::io::Read;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use apache_avro::types::Value;
use apache_avro::{from_avro_datum, to_avro_datum, AvroSchema, Schema};
use azure_schemaregistry_kafka_avro::codec::{AvroCodec, CodecFactory, CodecSettings};
use azure_schemaregistry_kafka_avro::credential::{
    ClientSecretCredential, CLIENT_ID_CONFIG, CLIENT_SECRET_CONFIG, TENANT_ID_CONFIG,
};
use azure_schemaregistry_kafka_avro::config::Properties;
use azure_schemaregistry_kafka_avro::error::SerdeError;
use azure_schemaregistry_kafka_avro::record::GenericRecord;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const RECORD_FORMAT_INDICATOR: u32 = 0;
pub const SCHEMA_ID_SIZE: usize = 32;

pub fn heartbeat_schema() -> &'static str {
    r#"{"type":"record","name":"Heartbeat","namespace":"nl.openweb.data","fields":[{"name":"beat","type":"long"}]}"#
}

pub fn name_schema() -> &'static str {
    r#"{"type":"record","name":"Name","namespace":"nl.openweb.data","fields":[{"name":"name","type":"string"}]}"#
}

#[derive(Debug, PartialEq, Clone, Deserialize, Serialize, AvroSchema)]
#[avro(namespace = "nl.openweb.data")]
pub struct Heartbeat {
    pub beat: i64,
}

#[derive(Debug, PartialEq, Clone, Deserialize, Serialize, AvroSchema)]
#[avro(namespace = "nl.openweb.data")]
pub struct Name {
    pub name: String,
}

pub fn heartbeat_record(beat: i64) -> GenericRecord {
    GenericRecord::from_values(
        Arc::new(Schema::parse_str(heartbeat_schema()).unwrap()),
        vec![("beat", Value::Long(beat))],
    )
    .unwrap()
}

pub fn name_record(name: &str) -> GenericRecord {
    GenericRecord::from_values(
        Arc::new(Schema::parse_str(name_schema()).unwrap()),
        vec![("name", Value::String(String::from(name)))],
    )
    .unwrap()
}

pub fn credential() -> ClientSecretCredential {
    ClientSecretCredential::new_builder()
        .tenant_id("00000000-0000-0000-0000-000000000001")
        .client_id("test-client")
        .client_secret("test-secret")
        .build()
        .unwrap()
}

pub fn credential_map() -> HashMap<String, String> {
    let mut source = HashMap::new();
    source.insert(String::from(TENANT_ID_CONFIG), String::from("tenant"));
    source.insert(String::from(CLIENT_ID_CONFIG), String::from("client"));
    source.insert(String::from(CLIENT_SECRET_CONFIG), String::from("secret"));
    source
}

pub fn serializer_properties(group: &str, auto_register: bool) -> Properties {
    let mut props = Properties::new();
    props.insert(
        String::from("schema.registry.url"),
        json!("https://test.servicebus.windows.net"),
    );
    props.insert(String::from("schema.group"), json!(group));
    props.insert(
        String::from("auto.register.schemas"),
        json!(auto_register.to_string()),
    );
    props
}

pub fn deserializer_properties(specific: bool) -> Properties {
    let mut props = Properties::new();
    props.insert(
        String::from("schema.registry.url"),
        json!("https://test.servicebus.windows.net"),
    );
    props.insert(String::from("specific.avro.reader"), json!(specific));
    props
}

/// In memory schema registry, schema's are stored per group, and get a 32 character id.
#[derive(Debug, Default)]
pub struct MockRegistry {
    schemas: DashMap<String, Arc<Schema>>,
    ids: DashMap<(String, String), String>,
    next_id: AtomicU64,
    calls: AtomicUsize,
}

impl MockRegistry {
    pub fn new() -> Arc<MockRegistry> {
        Arc::new(MockRegistry::default())
    }

    /// Registers the schema in the group, returning the existing id when it's already present.
    pub fn register(&self, group: &str, schema: &Schema) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = (String::from(group), schema.canonical_form());
        self.ids
            .entry(key)
            .or_insert_with(|| {
                let id = format!("{:032x}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
                self.schemas.insert(id.clone(), Arc::new(schema.clone()));
                id
            })
            .clone()
    }

    pub fn get_id(&self, group: &str, schema: &Schema) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.ids
            .get(&(String::from(group), schema.canonical_form()))
            .map(|id| id.value().clone())
    }

    pub fn get_schema(&self, id: &str) -> Option<Arc<Schema>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.schemas.get(id).map(|s| s.value().clone())
    }

    /// Amount of times the registry was called, registering included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

/// Codec using the mock registry. The payload starts with a four byte record format indicator,
/// followed by the id of the schema, and then the Avro encoded value.
#[derive(Debug)]
pub struct MockCodec {
    registry: Arc<MockRegistry>,
    settings: CodecSettings,
    ids: DashMap<String, String>,
    schemas: DashMap<String, Arc<Schema>>,
}

impl MockCodec {
    pub fn new(registry: Arc<MockRegistry>, settings: CodecSettings) -> MockCodec {
        MockCodec {
            registry,
            settings,
            ids: DashMap::new(),
            schemas: DashMap::new(),
        }
    }

    pub fn cached_schemas(&self) -> usize {
        self.schemas.len() + self.ids.len()
    }

    fn get_id(&self, schema: &Schema) -> Result<String, SerdeError> {
        let canonical = schema.canonical_form();
        if let Some(id) = self.ids.get(&canonical) {
            return Ok(id.value().clone());
        }
        let group = match &self.settings.schema_group {
            Some(g) => g.as_str(),
            None => {
                return Err(SerdeError::codec_non_retryable_without_cause(
                    "schema group is required to serialize",
                ))
            }
        };
        let id = if self.settings.auto_register_schemas {
            self.registry.register(group, schema)
        } else {
            match self.registry.get_id(group, schema) {
                Some(id) => id,
                None => {
                    return Err(SerdeError::codec_non_retryable_without_cause(&format!(
                        "schema {} is not registered in group {}",
                        canonical, group
                    )))
                }
            }
        };
        self.make_room(self.ids.len());
        self.ids.insert(canonical, id.clone());
        Ok(id)
    }

    fn get_schema(&self, id: &str) -> Result<Arc<Schema>, SerdeError> {
        if let Some(schema) = self.schemas.get(id) {
            return Ok(schema.value().clone());
        }
        match self.registry.get_schema(id) {
            Some(schema) => {
                self.make_room(self.schemas.len());
                self.schemas.insert(String::from(id), schema.clone());
                Ok(schema)
            }
            None => Err(SerdeError::codec_non_retryable_without_cause(&format!(
                "schema with id {} not found",
                id
            ))),
        }
    }

    fn make_room(&self, size: usize) {
        if size >= self.settings.sr_settings.max_cache_size() {
            self.ids.clear();
            self.schemas.clear();
        }
    }
}

impl AvroCodec for MockCodec {
    fn encode(&self, record: &GenericRecord) -> Result<Vec<u8>, SerdeError> {
        let id = self.get_id(record.schema())?;
        let datum = to_avro_datum(record.schema(), record.value().clone()).map_err(|e| {
            SerdeError::codec_non_retryable_with_cause(e, "Could not get Avro bytes")
        })?;
        let mut payload = Vec::with_capacity(4 + SCHEMA_ID_SIZE + datum.len());
        payload
            .write_u32::<BigEndian>(RECORD_FORMAT_INDICATOR)
            .map_err(|e| SerdeError::codec_non_retryable_with_cause(e, "Could not write header"))?;
        payload.extend_from_slice(id.as_bytes());
        payload.extend_from_slice(&datum);
        Ok(payload)
    }

    fn decode(&self, mut reader: &mut dyn Read) -> Result<GenericRecord, SerdeError> {
        let indicator = reader.read_u32::<BigEndian>().map_err(|e| {
            SerdeError::codec_non_retryable_with_cause(e, "Could not read record format indicator")
        })?;
        if indicator != RECORD_FORMAT_INDICATOR {
            return Err(SerdeError::codec_non_retryable_without_cause(&format!(
                "Unknown record format indicator {}",
                indicator
            )));
        }
        let mut id = [0u8; SCHEMA_ID_SIZE];
        reader.read_exact(&mut id).map_err(|e| {
            SerdeError::codec_non_retryable_with_cause(e, "Could not read schema id")
        })?;
        let id = String::from_utf8_lossy(&id).into_owned();
        let schema = self.get_schema(&id)?;
        match from_avro_datum(&schema, &mut reader, None) {
            Ok(v) => Ok(GenericRecord::new(schema, v)),
            Err(e) => Err(SerdeError::codec_non_retryable_with_cause(
                e,
                "Could not transform bytes using schema",
            )),
        }
    }
}

/// Creates mock codecs sharing the same registry, and keeps the settings they were created with.
#[derive(Debug)]
pub struct MockCodecFactory {
    registry: Arc<MockRegistry>,
    settings: Mutex<Vec<CodecSettings>>,
}

impl MockCodecFactory {
    pub fn new(registry: Arc<MockRegistry>) -> Arc<MockCodecFactory> {
        Arc::new(MockCodecFactory {
            registry,
            settings: Mutex::new(vec![]),
        })
    }

    pub fn created(&self) -> Vec<CodecSettings> {
        self.settings.lock().unwrap().clone()
    }
}

impl CodecFactory for MockCodecFactory {
    fn serializer_codec(&self, settings: CodecSettings) -> Result<Box<dyn AvroCodec>, SerdeError> {
        self.settings.lock().unwrap().push(settings.clone());
        Ok(Box::new(MockCodec::new(self.registry.clone(), settings)))
    }

    fn deserializer_codec(
        &self,
        settings: CodecSettings,
    ) -> Result<Box<dyn AvroCodec>, SerdeError> {
        self.settings.lock().unwrap().push(settings.clone());
        Ok(Box::new(MockCodec::new(self.registry.clone(), settings)))
    }
}
