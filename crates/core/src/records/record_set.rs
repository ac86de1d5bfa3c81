//! The authoritative record list and the mutations that change it.
//!
//! Position in the list is creation order. It is the FIFO tie-break for executions that
//! share a `deal_time`, so updates replace a record in place and never move it.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::records_model::{
    CashDividendEvent, HandlingFeeDiscount, Record, RecordKind, TradeExecution,
};
use super::records_validation::validate_record;
use crate::errors::{Error, Result};

/// A single change to the record list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum RecordMutation {
    Create { record: Record },
    Update { record: Record },
    Delete { kind: RecordKind, id: String },
    /// Applied atomically: either every mutation succeeds or nothing changes.
    Bulk { mutations: Vec<RecordMutation> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record set from records in creation order, rejecting duplicate `(kind, id)`.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert((record.kind(), record.id().to_string())) {
                return Err(Error::duplicate_record(record.kind(), record.id()));
            }
        }
        Ok(RecordSet { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, kind: RecordKind, id: &str) -> Option<&Record> {
        self.position(kind, id).map(|idx| &self.records[idx])
    }

    /// Trade executions in creation order.
    pub fn trades(&self) -> impl Iterator<Item = &TradeExecution> + '_ {
        self.records.iter().filter_map(Record::as_trade)
    }

    pub fn dividends(&self) -> impl Iterator<Item = &CashDividendEvent> + '_ {
        self.records.iter().filter_map(Record::as_dividend)
    }

    pub fn discounts(&self) -> impl Iterator<Item = &HandlingFeeDiscount> + '_ {
        self.records.iter().filter_map(Record::as_discount)
    }

    /// Applies a mutation. On error the set is left unchanged.
    pub fn apply(&mut self, mutation: RecordMutation) -> Result<()> {
        match mutation {
            RecordMutation::Bulk { mutations } => {
                let mut staged = self.clone();
                for m in mutations {
                    staged.apply(m)?;
                }
                *self = staged;
                Ok(())
            }
            single => self.apply_single(single),
        }
    }

    fn apply_single(&mut self, mutation: RecordMutation) -> Result<()> {
        match mutation {
            RecordMutation::Create { record } => {
                validate_record(&record)?;
                if self.position(record.kind(), record.id()).is_some() {
                    return Err(Error::duplicate_record(record.kind(), record.id()));
                }
                debug!("Creating {} record {}", record.kind(), record.id());
                self.records.push(record);
            }
            RecordMutation::Update { record } => {
                validate_record(&record)?;
                let idx = self
                    .position(record.kind(), record.id())
                    .ok_or_else(|| Error::record_not_found(record.kind(), record.id()))?;
                debug!("Updating {} record {}", record.kind(), record.id());
                self.records[idx] = record;
            }
            RecordMutation::Delete { kind, id } => {
                let idx = self
                    .position(kind, &id)
                    .ok_or_else(|| Error::record_not_found(kind, &id))?;
                debug!("Deleting {} record {}", kind, id);
                self.records.remove(idx);
            }
            RecordMutation::Bulk { .. } => return self.apply(mutation),
        }
        Ok(())
    }

    fn position(&self, kind: RecordKind, id: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.kind() == kind && r.id() == id)
    }
}
