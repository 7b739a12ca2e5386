use std::time::Duration;

use azure_schemaregistry_kafka_avro::avro_serializer::KafkaAvroSerializer;
use azure_schemaregistry_kafka_avro::serialization::Serializer;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{BaseProducer, BaseRecord, Producer};
use test_utils::Heartbeat;

pub struct RecordProducer {
    producer: BaseProducer,
    key_serializer: KafkaAvroSerializer<Heartbeat>,
    value_serializer: KafkaAvroSerializer<Heartbeat>,
}

impl RecordProducer {
    pub fn send_avro(&mut self, topic: &str, key: Heartbeat, value: Option<Heartbeat>) {
        let key = match self.key_serializer.serialize(topic, Some(&key)) {
            Ok(Some(v)) => v,
            Ok(None) => panic!("Key was serialized as null"),
            Err(e) => panic!("Error getting key: {}", e),
        };
        let payload = match self.value_serializer.serialize(topic, value.as_ref()) {
            Ok(v) => v,
            Err(e) => panic!("Error getting payload: {}", e),
        };
        let mut record = BaseRecord::<Vec<u8>, Vec<u8>>::to(topic).key(&key);
        if let Some(p) = &payload {
            record = record.payload(p);
        }
        if let Err((e, _)) = self.producer.send(record) {
            panic!("Error sending record: {}", e)
        }
        self.producer.flush(Duration::from_secs(30)).unwrap();
    }

    pub fn close(&mut self) {
        self.key_serializer.close();
        self.value_serializer.close();
    }
}

pub fn get_producer(
    brokers: &str,
    key_serializer: KafkaAvroSerializer<Heartbeat>,
    value_serializer: KafkaAvroSerializer<Heartbeat>,
) -> RecordProducer {
    let producer: BaseProducer = ClientConfig::new()
        .set("bootstrap.servers", brokers)
        .set("message.timeout.ms", "60000")
        .set("queue.buffering.max.messages", "10")
        .create()
        .expect("Producer creation error");
    RecordProducer {
        producer,
        key_serializer,
        value_serializer,
    }
}
