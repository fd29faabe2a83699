//! Record lifecycle over a [`WorldState`].
//!
//! Per key: absent → present (create) → present (update) → absent (delete).
//! Every operation re-reads the world state before acting; nothing is cached
//! between calls.

use alloc::string::String;
use alloc::vec::Vec;

use crate::codec;
use crate::errors::ContractError;
use crate::listing::{self, Listing};
use crate::projection;
use crate::schema::{derive_key, Field, FieldValue, Partition, Record, HEALTH_RECORD_DOC_TYPE};
use crate::world_state::WorldState;

/// Hospital and insurance records of one patient.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CombinedRecord {
    pub hospital: Option<Record>,
    pub insurance: Option<Record>,
}

/// Outcome of a write: the stored record and any fields the partition refused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Written {
    pub partition: Partition,
    pub key: String,
    pub record: Record,
    pub dropped: Vec<Field>,
}

/// Read-only access to the records of a [`WorldState`].
pub struct RecordView<'a, S: WorldState + ?Sized> {
    state: &'a S,
}

impl<'a, S: WorldState + ?Sized> RecordView<'a, S> {
    pub fn new(state: &'a S) -> Self {
        Self { state }
    }

    /// True iff a non-empty value is stored under `key`.
    pub fn exists_key(&self, key: &str) -> bool {
        self.state
            .get_state(key)
            .map(|value| !value.is_empty())
            .unwrap_or(false)
    }

    pub fn exists(&self, partition: Partition, id: &str) -> Result<bool, ContractError> {
        let key = derive_key(partition, id)?;
        Ok(self.exists_key(&key))
    }

    pub fn read(&self, partition: Partition, id: &str) -> Result<Record, ContractError> {
        let key = derive_key(partition, id)?;
        match self.state.get_state(&key) {
            Some(bytes) if !bytes.is_empty() => codec::decode(&bytes),
            _ => Err(ContractError::NotFound),
        }
    }

    /// Reads both stakeholder partitions of `id`.
    pub fn read_combined(&self, id: &str) -> Result<CombinedRecord, ContractError> {
        let combined = CombinedRecord {
            hospital: self.read_optional(Partition::Hospital, id)?,
            insurance: self.read_optional(Partition::Insurance, id)?,
        };
        if combined.hospital.is_none() && combined.insurance.is_none() {
            return Err(ContractError::NoRecordsFound);
        }
        Ok(combined)
    }

    pub fn list_all(&self) -> Listing<'a> {
        listing::list_all(self.state)
    }

    fn read_optional(&self, partition: Partition, id: &str) -> Result<Option<Record>, ContractError> {
        match self.read(partition, id) {
            Ok(record) => Ok(Some(record)),
            Err(ContractError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Read-write access to the records of a [`WorldState`].
pub struct RecordStore<'a, S: WorldState + ?Sized> {
    state: &'a mut S,
}

impl<'a, S: WorldState + ?Sized> RecordStore<'a, S> {
    pub fn new(state: &'a mut S) -> Self {
        Self { state }
    }

    pub fn view(&self) -> RecordView<'_, S> {
        RecordView::new(&*self.state)
    }

    pub fn exists(&self, partition: Partition, id: &str) -> Result<bool, ContractError> {
        self.view().exists(partition, id)
    }

    pub fn create(
        &mut self,
        partition: Partition,
        id: &str,
        fields: Record,
    ) -> Result<Written, ContractError> {
        let key = derive_key(partition, id)?;
        if self.view().exists_key(&key) {
            return Err(ContractError::AlreadyExists);
        }

        let (mut record, dropped) = projection::restrict(fields, partition);
        // not an input on create
        record.remove(Field::Timestamp);
        Self::stamp_identity(&mut record, partition, id);

        self.state.put_state(&key, &codec::encode(&record));
        Ok(Written {
            partition,
            key,
            record,
            dropped,
        })
    }

    pub fn read(&self, partition: Partition, id: &str) -> Result<Record, ContractError> {
        self.view().read(partition, id)
    }

    /// Replaces every mutable field of the stored record with `fields`.
    ///
    /// Fields absent from `fields` are not carried over from the stored value.
    pub fn update(
        &mut self,
        partition: Partition,
        id: &str,
        fields: Record,
    ) -> Result<Written, ContractError> {
        let key = derive_key(partition, id)?;
        if !self.view().exists_key(&key) {
            return Err(ContractError::NotFound);
        }

        let (mut record, dropped) = projection::restrict(fields, partition);
        Self::stamp_identity(&mut record, partition, id);
        record.insert(
            Field::Timestamp,
            FieldValue::Timestamp(self.state.tx_timestamp()),
        );

        self.state.put_state(&key, &codec::encode(&record));
        Ok(Written {
            partition,
            key,
            record,
            dropped,
        })
    }

    pub fn delete(&mut self, partition: Partition, id: &str) -> Result<(), ContractError> {
        let key = derive_key(partition, id)?;
        if !self.view().exists_key(&key) {
            return Err(ContractError::NotFound);
        }
        self.state.delete_state(&key);
        Ok(())
    }

    pub fn read_combined(&self, id: &str) -> Result<CombinedRecord, ContractError> {
        self.view().read_combined(id)
    }

    pub fn list_all(&self) -> Listing<'_> {
        self.view().list_all()
    }

    fn stamp_identity(record: &mut Record, partition: Partition, id: &str) {
        record.insert(Field::Id, FieldValue::text(id));
        match partition {
            Partition::Unified => {
                record.insert(Field::DocType, FieldValue::text(HEALTH_RECORD_DOC_TYPE));
            }
            Partition::Hospital | Partition::Insurance => {}
        }
    }
}
