//! Probe that compares each target's expected value with a live field.

use crate::domain::errors::ProbeError;
use crate::domain::targets::TargetList;
use crate::ports::outbound::{CompletionProbe, FieldReader};
use async_trait::async_trait;
use tracing::trace;

/// Completes when every target field matches (`flag == true`) or when every
/// target field differs (`flag == false`) from its expected value.
///
/// An empty target list completes immediately.
#[derive(Debug, Clone)]
pub struct FieldMatchProbe<R> {
    reader: R,
}

impl<R: FieldReader> FieldMatchProbe<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }
}

#[async_trait]
impl<R: FieldReader> CompletionProbe for FieldMatchProbe<R> {
    async fn probe(&self, targets: &TargetList, flag: bool) -> Result<bool, ProbeError> {
        for target in targets {
            let current = self.reader.read_field(&target.name).await?;
            if (current == target.value) != flag {
                trace!(
                    field = %target.name,
                    expected = %target.value,
                    current = %current,
                    "Field not settled"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}
