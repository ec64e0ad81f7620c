use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Customer '{customer_id}' not found")]
    CustomerNotFound { customer_id: String },

    #[error("Transaction '{transaction_id}' not found")]
    TransactionNotFound { transaction_id: String },

    #[error("Customer '{customer_id}' already has an open EDD investigation")]
    InvestigationAlreadyOpen { customer_id: String },

    #[error("Investigation '{investigation_id}' not found")]
    InvestigationNotFound { investigation_id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ComplianceResult<T> = Result<T, ComplianceError>;
