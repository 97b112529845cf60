use std::io;
use std::time::Duration;

use thiserror::Error;

/// Falha de uma única sonda. Nenhuma interrompe a execução.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to open raw ICMP socket: {0}")]
    Open(#[source] io::Error),

    #[error("failed to open raw ICMP socket: {0} (raw sockets require root)")]
    PermissionDenied(#[source] io::Error),

    #[error("failed to send echo request: {0}")]
    Write(#[source] io::Error),

    #[error("short write: sent {sent} of {len} bytes")]
    ShortWrite { sent: usize, len: usize },

    #[error("failed to read reply: {0}")]
    Read(#[source] io::Error),

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl ProbeError {
    /// Classifica o erro de criação do socket (EPERM/EACCES = sem privilégio).
    pub fn open(err: io::Error) -> Self {
        match err.raw_os_error() {
            Some(libc::EPERM) | Some(libc::EACCES) => ProbeError::PermissionDenied(err),
            _ => ProbeError::Open(err),
        }
    }
}
