use crate::config::AppConfig;
use crate::db::DbPool;
use crate::processor::message_processor;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use std::time::Duration;
use tracing::{error, info, warn};

/// Starts the Kafka consumer with SASL/SCRAM authentication and a circuit breaker mechanism.
///
/// Messages are handled one after another so that each ship's telemetry is
/// applied in partition order.
pub async fn start_kafka_consumer(config: &AppConfig, pool: DbPool) -> anyhow::Result<()> {
    info!("Initializing Kafka consumer for topic: {}", config.kafka_topic);

    let mut client_config = ClientConfig::new();
    client_config
        .set("bootstrap.servers", &config.kafka_bootstrap_servers)
        .set("group.id", &config.kafka_group_id)
        .set("auto.offset.reset", &config.kafka_auto_offset_reset)
        // SASL Configuration
        .set("security.protocol", &config.kafka_security_protocol)
        .set("sasl.mechanism", &config.kafka_sasl_mechanism)
        .set("sasl.username", &config.kafka_username)
        .set("sasl.password", &config.kafka_password);

    let consumer: StreamConsumer = client_config.create()?;

    consumer.subscribe(&[&config.kafka_topic])?;
    info!(
        "Subscribed to topic: {} ({:?} payloads)",
        config.kafka_topic, config.kafka_payload_format
    );

    let mut breaker = CircuitBreaker::new(config.kafka_max_retries);
    let cooldown_duration = Duration::from_secs(config.kafka_circuit_breaker_cooldown);

    loop {
        if breaker.is_open() {
            warn!(
                "Circuit breaker tripped ({} consecutive failures)! Sleeping for {} seconds...",
                breaker.failures(),
                config.kafka_circuit_breaker_cooldown
            );
            tokio::time::sleep(cooldown_duration).await;
            breaker.reset();
            info!("Circuit breaker reset. Resuming consumption.");
        }

        match consumer.recv().await {
            Ok(m) => {
                breaker.reset();

                let Some(payload) = m.payload() else {
                    warn!("Received empty payload from Kafka");
                    continue;
                };

                if let Err(e) =
                    message_processor::process_message(&pool, config.kafka_payload_format, payload)
                        .await
                {
                    error!(
                        "Error processing message at {}[{}]@{}: {}",
                        m.topic(),
                        m.partition(),
                        m.offset(),
                        e
                    );
                }
            }
            Err(e) => {
                breaker.record_failure();
                error!(
                    "Kafka error: {}. Incrementing failure count ({} / {})",
                    e,
                    breaker.failures(),
                    config.kafka_max_retries
                );

                // Small delay to prevent tight loop in case of minor network glitches
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }
}

/// Counts consecutive receive failures; opens once `max_failures` is reached.
#[derive(Debug)]
struct CircuitBreaker {
    failures: u32,
    max_failures: u32,
}

impl CircuitBreaker {
    fn new(max_failures: u32) -> Self {
        Self {
            failures: 0,
            max_failures,
        }
    }

    fn record_failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    fn reset(&mut self) {
        self.failures = 0;
    }

    fn failures(&self) -> u32 {
        self.failures
    }

    fn is_open(&self) -> bool {
        self.failures >= self.max_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaker_opens_after_max_failures() {
        let mut breaker = CircuitBreaker::new(3);
        breaker.record_failure();
        breaker.record_failure();
        assert!(!breaker.is_open());

        breaker.record_failure();
        assert!(breaker.is_open());
    }

    #[test]
    fn success_closes_the_breaker() {
        let mut breaker = CircuitBreaker::new(1);
        breaker.record_failure();
        assert!(breaker.is_open());

        breaker.reset();
        assert!(!breaker.is_open());
        assert_eq!(breaker.failures(), 0);
    }
}
