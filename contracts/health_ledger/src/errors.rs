use core::fmt;
use soroban_sdk::{contracterror, contracttype};

/// Error categories used to classify contract failures.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Invalid arguments or lifecycle misuse
    Validation = 1,
    /// Role or caller does not permit the operation
    Authorization = 2,
    /// The addressed record is absent
    NotFound = 3,
    /// The addressed record is already present
    StateConflict = 4,
    /// Stored bytes could not be interpreted
    Storage = 5,
}

/// Contract errors.
///
/// Discriminants are part of the invocation result and must stay stable.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    AlreadyExists = 2,
    NotFound = 3,
    NoRecordsFound = 4,
    AccessDenied = 5,
    MalformedRecord = 6,
    InvalidArgument = 7,
}

impl ContractError {
    /// Returns the error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::AlreadyInitialized | ContractError::InvalidArgument => {
                ErrorCategory::Validation
            }
            ContractError::AccessDenied => ErrorCategory::Authorization,
            ContractError::NotFound | ContractError::NoRecordsFound => ErrorCategory::NotFound,
            ContractError::AlreadyExists => ErrorCategory::StateConflict,
            ContractError::MalformedRecord => ErrorCategory::Storage,
        }
    }

    /// Returns a human-readable message for this error.
    pub fn message(&self) -> &'static str {
        match self {
            ContractError::AlreadyInitialized => "Ledger has already been seeded",
            ContractError::AlreadyExists => "A record already exists under this key",
            ContractError::NotFound => "No record exists under this key",
            ContractError::NoRecordsFound => "No hospital or insurance record for this patient",
            ContractError::AccessDenied => "Viewer is not allowed to read this record",
            ContractError::MalformedRecord => "Stored value is not a well-formed record",
            ContractError::InvalidArgument => "Missing or malformed argument",
        }
    }
}

impl fmt::Display for ContractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
