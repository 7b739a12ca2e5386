use std::time::Duration;

use azure_schemaregistry_kafka_avro::avro_deserializer::KafkaAvroDeserializer;
use azure_schemaregistry_kafka_avro::record::DecodedRecord;
use azure_schemaregistry_kafka_avro::serialization::Deserializer;
use rdkafka::config::{ClientConfig, RDKafkaLogLevel};
use rdkafka::consumer::base_consumer::BaseConsumer;
use rdkafka::consumer::{Consumer, DefaultConsumerContext};
use rdkafka::Message;
use test_utils::Heartbeat;

type TestConsumer = BaseConsumer<DefaultConsumerContext>;

#[derive(Debug)]
pub struct DeserializedAvroRecord {
    pub key: DecodedRecord<Heartbeat>,
    pub value: Option<DecodedRecord<Heartbeat>>,
    pub topic: String,
    pub offset: i64,
}

pub fn get_consumer(brokers: &str, group_id: &str, topics: &[&str]) -> TestConsumer {
    let consumer: TestConsumer = ClientConfig::new()
        .set("group.id", group_id)
        .set("bootstrap.servers", brokers)
        .set("enable.partition.eof", "false")
        .set("session.timeout.ms", "6000")
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", "earliest")
        .set_log_level(RDKafkaLogLevel::Warning)
        .create_with_context(DefaultConsumerContext)
        .expect("Consumer creation failed");
    consumer
        .subscribe(topics)
        .expect("Can't subscribe to specified topics");
    consumer
}

/// Consumes one record, a missing payload is kept as tombstone and not given to the deserializer.
pub fn consume_avro(
    consumer: &TestConsumer,
    deserializer: &KafkaAvroDeserializer<Heartbeat>,
    test: Box<dyn Fn(DeserializedAvroRecord)>,
) {
    match consumer.poll(Duration::from_secs(30)) {
        Some(Ok(m)) => {
            let key = match deserializer.deserialize(m.topic(), m.key()) {
                Ok(v) => v,
                Err(e) => panic!("Error getting key: {}", e),
            };
            let value = m.payload().map(|p| match deserializer.deserialize(m.topic(), Some(p)) {
                Ok(v) => v,
                Err(e) => panic!("Error getting value: {}", e),
            });
            test(DeserializedAvroRecord {
                key,
                value,
                topic: String::from(m.topic()),
                offset: m.offset(),
            })
        }
        Some(Err(e)) => panic!("Got error consuming message: {}", e),
        None => panic!("No record received in avro consumer, while that was expected"),
    }
}
