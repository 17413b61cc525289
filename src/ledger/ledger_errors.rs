use solana_rpc_client_api::{
    client_error::{Error as ClientError, ErrorKind},
    request::{RpcError, RpcResponseErrorData},
};
use thiserror::Error;

/// Errors reported by a [`LedgerClient`](super::LedgerClient)
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// Transport-level errors (network, connection, decoding)
    #[error("Transport error: {message} (endpoint: {endpoint})")]
    Transport { endpoint: String, message: String },

    /// RPC response errors (from the RPC server), including preflight failures
    #[error("RPC response error: {message} (endpoint: {endpoint}, code: {code:?})")]
    RpcResponse {
        endpoint: String,
        message: String,
        code: Option<i64>,
        /// Program logs from a failed preflight simulation
        logs: Vec<String>,
    },

    /// The transaction landed but failed during execution
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// The blockhash expired before the requested commitment was observed
    #[error("Blockhash {blockhash} expired before confirmation")]
    BlockhashExpired { blockhash: String },
}

impl LedgerError {
    /// Program logs attached to the error, if any
    pub fn logs(&self) -> &[String] {
        match self {
            LedgerError::RpcResponse { logs, .. } => logs,
            _ => &[],
        }
    }

    /// Get the endpoint associated with this error, if any
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            LedgerError::Transport { endpoint, .. } => Some(endpoint),
            LedgerError::RpcResponse { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    /// Create from ClientError with context
    pub fn from_client_error(err: ClientError, endpoint: &str) -> Self {
        match err.kind() {
            ErrorKind::RpcError(RpcError::RpcResponseError {
                code,
                message,
                data,
                ..
            }) => {
                let logs = match data {
                    RpcResponseErrorData::SendTransactionPreflightFailure(simulation) => {
                        simulation.logs.clone().unwrap_or_default()
                    }
                    _ => Vec::new(),
                };
                LedgerError::RpcResponse {
                    endpoint: endpoint.to_string(),
                    message: message.clone(),
                    code: Some(*code),
                    logs,
                }
            }
            ErrorKind::TransactionError(tx_err) => LedgerError::TransactionFailed(tx_err.to_string()),
            _ => LedgerError::Transport {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            },
        }
    }
}
