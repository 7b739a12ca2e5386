use std::sync::Arc;

use azure_schemaregistry_kafka_avro::avro_deserializer::KafkaAvroDeserializer;
use azure_schemaregistry_kafka_avro::avro_serializer::KafkaAvroSerializer;
use azure_schemaregistry_kafka_avro::codec::CodecFactory;
use azure_schemaregistry_kafka_avro::record::DecodedRecord;
use azure_schemaregistry_kafka_avro::serialization::{Deserializer, Serializer};
use rand::Rng;
use test_utils::{
    credential, deserializer_properties, serializer_properties, Heartbeat, MockCodecFactory,
    MockRegistry,
};

use crate::kafka::kafka_consumer::{consume_avro, get_consumer, DeserializedAvroRecord};
use crate::kafka::kafka_producer::get_producer;

fn get_brokers() -> &'static str {
    "127.0.0.1:9092"
}

fn get_serializer(factory: Arc<dyn CodecFactory>, is_key: bool) -> KafkaAvroSerializer<Heartbeat> {
    let mut serializer = KafkaAvroSerializer::new(factory, Arc::new(credential()));
    serializer
        .configure(&serializer_properties("heartbeats", true), is_key)
        .unwrap();
    serializer
}

fn test_beat_value(
    key_value: i64,
    value_value: Option<i64>,
) -> Box<dyn Fn(DeserializedAvroRecord)> {
    Box::new(move |rec: DeserializedAvroRecord| {
        println!("testing record {:#?}", rec);
        assert_eq!(
            rec.key,
            DecodedRecord::Specific(Heartbeat { beat: key_value }),
            "compare key values"
        );
        assert_eq!(
            rec.value,
            value_value.map(|beat| DecodedRecord::Specific(Heartbeat { beat })),
            "compare value values"
        );
    })
}

fn do_avro_test(topic_prefix: &str, value_present: bool) {
    let mut rng = rand::rng();
    let key_value = rng.random::<i64>();
    let topic = format!("{}_{}", topic_prefix, key_value.unsigned_abs());
    let topic = topic.as_str();
    let value_value = if value_present {
        Some(rng.random::<i64>())
    } else {
        None
    };
    let factory: Arc<dyn CodecFactory> = MockCodecFactory::new(MockRegistry::new());
    let mut producer = get_producer(
        get_brokers(),
        get_serializer(factory.clone(), true),
        get_serializer(factory.clone(), false),
    );
    producer.send_avro(
        topic,
        Heartbeat { beat: key_value },
        value_value.map(|beat| Heartbeat { beat }),
    );
    producer.close();

    let mut deserializer = KafkaAvroDeserializer::new(factory, Arc::new(credential()));
    deserializer
        .configure(&deserializer_properties(true), false)
        .unwrap();
    let consumer = get_consumer(get_brokers(), "test", &[topic]);
    consume_avro(
        &consumer,
        &deserializer,
        test_beat_value(key_value, value_value),
    );
    deserializer.close();
}

#[test]
fn test_heartbeat_round_trip() {
    do_avro_test("azure_heartbeat", true)
}

#[test]
fn test_heartbeat_tombstone() {
    do_avro_test("azure_heartbeat_tombstone", false)
}
