use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use conveyor_core::domain::{Disposition, Envelope, ProcessingResult};
use conveyor_core::memory::{InMemoryArchive, InMemoryTransport};
use conveyor_core::pipeline::Pipeline;
use conveyor_core::ports::Processor;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ShipmentRequest {
    order_id: u64,
    destination: String,
}

/// Fails a configured number of times before succeeding, like a downstream
/// carrier that is briefly unavailable.
struct ShipmentProcessor {
    remaining_failures: AtomicU32,
}

impl ShipmentProcessor {
    fn new(failures: u32) -> Self {
        Self {
            remaining_failures: AtomicU32::new(failures),
        }
    }
}

#[async_trait]
impl Processor for ShipmentProcessor {
    async fn process(&self, payload: &str) -> ProcessingResult {
        let request: ShipmentRequest = match serde_json::from_str(payload) {
            Ok(request) => request,
            Err(e) => return ProcessingResult::failure(format!("json decode: {e}")),
        };

        let left = self.remaining_failures.load(Ordering::Relaxed);
        if left > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return ProcessingResult::failure(format!("carrier unavailable (left={left})"));
        }

        ProcessingResult::success(format!(
            "order {} shipped to {}",
            request.order_id, request.destination
        ))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "conveyor_core=debug".into()),
        )
        .with_target(false)
        .init();

    // (A) Pipeline over in-memory backends. Zero visibility timeout means a
    // failed message is deliverable again immediately, so the demo never
    // waits between attempts.
    let transport = Arc::new(InMemoryTransport::new("shipments", Duration::ZERO));
    let archive = Arc::new(InMemoryArchive::new());
    let pipeline = Pipeline::new(transport, archive.clone());

    // (B) A request whose carrier fails twice before accepting it. Budget of
    // three retries is plenty; the third attempt goes through.
    let request = ShipmentRequest {
        order_id: 4711,
        destination: "Oslo".to_string(),
    };
    pipeline.enqueue(&Envelope::wrap(&request, 3, "shipment")?).await?;

    let processor = ShipmentProcessor::new(2);
    while let Some(result) = pipeline.process_first(&processor).await? {
        println!(
            "attempt: disposition={:?} error={:?}",
            result.disposition, result.error
        );
        if result.succeeded() {
            println!("response: {}", result.response);
            break;
        }
    }

    // (C) A request whose carrier never accepts. With a budget of one retry
    // the second delivery already exceeds it and the pipeline pulls the
    // message aside as poison without consulting the processor again.
    let doomed = ShipmentRequest {
        order_id: 4712,
        destination: "Atlantis".to_string(),
    };
    pipeline.enqueue(&Envelope::wrap(&doomed, 1, "shipment")?).await?;

    let never = ShipmentProcessor::new(u32::MAX);
    while let Some(result) = pipeline.process_first(&never).await? {
        println!(
            "attempt: disposition={:?} error={:?}",
            result.disposition, result.error
        );
        if result.disposition == Disposition::Poison {
            break;
        }
    }

    // (D) Every terminal outcome landed in the archive and the queue is
    // drained.
    println!("archive:");
    for entry in archive.entries().await {
        println!(
            "  [{} / {}] {}: {}",
            entry.partition_key, entry.row_key, entry.status, entry.message
        );
    }
    println!("queue depth: {}", pipeline.queue_depth().await?);

    Ok(())
}
