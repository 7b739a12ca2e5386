//! Property keys, defaults and the typed configs the adapters read from the properties handed over
//! by the Kafka client.
use std::collections::HashMap;

use serde_json::Value;
use url::Url;

use crate::error::SerdeError;

/// Properties as they are passed to `configure`, the values are loosely typed, so both
/// `"true"` and `true` can be used for a boolean, and both `"500"` and `500` for a number.
pub type Properties = HashMap<String, Value>;

pub const SCHEMA_REGISTRY_URL_CONFIG: &str = "schema.registry.url";
pub const MAX_SCHEMA_MAP_SIZE_CONFIG: &str = "max.schema.map.size";
pub const MAX_SCHEMA_MAP_SIZE_CONFIG_DEFAULT: usize = 1000;
pub const SCHEMA_GROUP_CONFIG: &str = "schema.group";
pub const AUTO_REGISTER_SCHEMAS_CONFIG: &str = "auto.register.schemas";
pub const AUTO_REGISTER_SCHEMAS_CONFIG_DEFAULT: bool = false;
pub const AVRO_SPECIFIC_READER_CONFIG: &str = "specific.avro.reader";
pub const AVRO_SPECIFIC_READER_CONFIG_DEFAULT: bool = false;

/// Config shared by the serializer and the deserializer.
#[derive(Clone, Debug, PartialEq)]
pub struct SerdeConfig {
    pub schema_registry_url: Url,
    pub max_schema_map_size: usize,
}

impl SerdeConfig {
    pub fn from_properties(props: &Properties) -> Result<SerdeConfig, SerdeError> {
        let raw_url = match get_string(props, SCHEMA_REGISTRY_URL_CONFIG)? {
            Some(v) => v,
            None => {
                return Err(SerdeError::configuration_without_cause(&format!(
                    "{} is required",
                    SCHEMA_REGISTRY_URL_CONFIG
                )))
            }
        };
        let schema_registry_url = parse_endpoint(&raw_url)?;
        let max_schema_map_size = get_usize(
            props,
            MAX_SCHEMA_MAP_SIZE_CONFIG,
            MAX_SCHEMA_MAP_SIZE_CONFIG_DEFAULT,
        )?;
        if max_schema_map_size == 0 {
            return Err(SerdeError::configuration_without_cause(&format!(
                "{} should be at least 1",
                MAX_SCHEMA_MAP_SIZE_CONFIG
            )));
        }
        Ok(SerdeConfig {
            schema_registry_url,
            max_schema_map_size,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KafkaAvroSerializerConfig {
    pub serde: SerdeConfig,
    pub schema_group: String,
    pub auto_register_schemas: bool,
}

impl KafkaAvroSerializerConfig {
    pub fn from_properties(props: &Properties) -> Result<KafkaAvroSerializerConfig, SerdeError> {
        let serde = SerdeConfig::from_properties(props)?;
        let schema_group = match get_string(props, SCHEMA_GROUP_CONFIG)? {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                return Err(SerdeError::configuration_without_cause(&format!(
                    "{} is required for the serializer",
                    SCHEMA_GROUP_CONFIG
                )))
            }
        };
        Ok(KafkaAvroSerializerConfig {
            serde,
            schema_group,
            auto_register_schemas: get_bool(
                props,
                AUTO_REGISTER_SCHEMAS_CONFIG,
                AUTO_REGISTER_SCHEMAS_CONFIG_DEFAULT,
            ),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KafkaAvroDeserializerConfig {
    pub serde: SerdeConfig,
    pub avro_specific_reader: bool,
}

impl KafkaAvroDeserializerConfig {
    pub fn from_properties(props: &Properties) -> Result<KafkaAvroDeserializerConfig, SerdeError> {
        Ok(KafkaAvroDeserializerConfig {
            serde: SerdeConfig::from_properties(props)?,
            avro_specific_reader: get_bool(
                props,
                AVRO_SPECIFIC_READER_CONFIG,
                AVRO_SPECIFIC_READER_CONFIG_DEFAULT,
            ),
        })
    }
}

/// Same as the jvm client doing `Boolean.valueOf("" + value)`, so only a `true` or a string
/// that equals "true" ignoring case counts, anything else that's present is false.
pub(crate) fn get_bool(props: &Properties, key: &str, default: bool) -> bool {
    match props.get(key) {
        None => default,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        Some(_) => false,
    }
}

fn get_string(props: &Properties, key: &str) -> Result<Option<String>, SerdeError> {
    match props.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(v) => Err(SerdeError::configuration_without_cause(&format!(
            "{} should be a string, but was {}",
            key, v
        ))),
    }
}

fn get_usize(props: &Properties, key: &str, default: usize) -> Result<usize, SerdeError> {
    match props.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(v) => Ok(v as usize),
            None => Err(SerdeError::configuration_without_cause(&format!(
                "{} should be a positive integer, but was {}",
                key, n
            ))),
        },
        Some(Value::String(s)) => s.trim().parse::<usize>().map_err(|e| {
            SerdeError::configuration_with_cause(
                e,
                &format!("{} should be a positive integer, but was {:?}", key, s),
            )
        }),
        Some(v) => Err(SerdeError::configuration_without_cause(&format!(
            "{} should be a positive integer, but was {}",
            key, v
        ))),
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, SerdeError> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        SerdeError::configuration_with_cause(
            e,
            &format!("{} {:?} is not a valid url", SCHEMA_REGISTRY_URL_CONFIG, raw),
        )
    })?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(SerdeError::configuration_without_cause(&format!(
            "{} {:?} should be a http or https url",
            SCHEMA_REGISTRY_URL_CONFIG, raw
        ))),
    }
}
