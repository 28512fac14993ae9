use chrono::{DateTime, Utc};
use connector_core::{FieldSpec, RecordResult, RecordSink};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{ConnectorError, ConnectorResult};
use crate::rpc::{SyncBatchParams, SyncPlan};
use crate::telemetry::Telemetry;

/// Executes one `sync_batch` call: resolves the key column from the sync
/// plan, remaps each record, and forwards them to the sink one at a time
/// in input order.
pub struct BatchSync {
    sink: Arc<dyn RecordSink>
}

/// Summary of one batch, logged on completion.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub delivered: u32,
    pub failed: u32
}

impl BatchReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            completed_at: None,
            delivered: 0,
            failed: 0
        }
    }

    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchSync {
    pub fn new(sink: Arc<dyn RecordSink>) -> Self {
        Self { sink }
    }

    pub async fn sync_batch(&self, params: &SyncBatchParams) -> ConnectorResult<Vec<RecordResult>> {
        let plan = &params.sync_plan;
        let key_column = key_column(plan)?;
        let columns = plan_columns(plan);

        debug!(
            operation = %plan.operation,
            object = %plan.object.object_api_name,
            key_column = %key_column,
            columns = columns.len(),
            records = params.records.len(),
            "Starting batch sync"
        );

        let mut report = BatchReport::new();
        let mut results = Vec::with_capacity(params.records.len());

        for (index, record) in params.records.iter().enumerate() {
            let identifier = identifier_for(record, key_column, index)?;
            let payload = remap_record(record, key_column);

            let success = match self.sink.deliver(&payload).await {
                Ok(()) => {
                    report.delivered += 1;
                    true
                }
                Err(e) => {
                    warn!(error = %e, identifier = %identifier, "Webhook delivery failed");
                    report.failed += 1;
                    false
                }
            };
            Telemetry::record_delivery(success);

            results.push(RecordResult {
                identifier,
                success
            });
        }

        report.complete();
        info!(
            delivered = report.delivered,
            failed = report.failed,
            "Batch sync completed"
        );

        Ok(results)
    }
}

/// The column flagged `active_identifier` keys per-record results. The
/// schema must flag one; with several flagged, the first in column-name
/// order wins.
fn key_column(plan: &SyncPlan) -> ConnectorResult<&str> {
    plan.schema
        .iter()
        .find(|(_, column)| column.active_identifier)
        .map(|(name, _)| name.as_str())
        .ok_or(ConnectorError::MissingActiveIdentifier)
}

fn plan_columns(plan: &SyncPlan) -> Vec<FieldSpec> {
    plan.schema
        .iter()
        .map(|(name, column)| FieldSpec::new(name, &column.field.field_type))
        .collect()
}

/// A result row without an identifier would be meaningless to the caller,
/// so a record lacking the key column fails the whole call.
fn identifier_for(record: &Value, key_column: &str, index: usize) -> ConnectorResult<String> {
    let value = record
        .get(key_column)
        .ok_or_else(|| ConnectorError::RecordMissingKey {
            index,
            column: key_column.to_string()
        })?;

    Ok(match value {
        Value::String(s) => s.clone(),
        other => other.to_string()
    })
}

/// The webhook payload shape for the `campaign-event` object: the email
/// column plus the key column's value under `census_unique_identifier`.
fn remap_record(record: &Value, key_column: &str) -> Value {
    json!({
        "email": record.get("email").cloned().unwrap_or(Value::Null),
        "data": {
            "census_unique_identifier": record.get(key_column).cloned().unwrap_or(Value::Null)
        }
    })
}
