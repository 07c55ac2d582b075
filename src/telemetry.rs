use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// Initialize tracing for hosts that embed the engine without their own
/// subscriber. JSON output keeps the structured fields machine-readable;
/// `RUST_LOG` still wins over the configured level.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.clone()));

    if config.json_output {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .with(filter)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(filter)
            .try_init()?;
    }

    tracing::info!("draftgate telemetry initialized");
    Ok(())
}

/// Create a span with the common moderation attributes.
pub fn create_moderation_span(
    operation: &str,
    entity_type: &str,
    entity_id: u64,
    workflow: Option<&str>,
) -> tracing::Span {
    tracing::info_span!(
        "moderation",
        operation = operation,
        entity.entity_type = entity_type,
        entity.id = entity_id,
        workflow.id = workflow,
    )
}
