use std::time::Duration;

/// Quantidade de Echo Requests por execução.
pub const DEFAULT_COUNT: u16 = 5;
/// Intervalo entre sondas.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);
/// Tempo limite de espera pela resposta.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Parâmetros de uma execução.
#[derive(Debug, Clone)]
pub struct PingConfig {
    pub count: u16,
    pub interval: Duration,
    pub timeout: Duration,
    pub identifier: u16,
}

impl Default for PingConfig {
    fn default() -> Self {
        PingConfig {
            count: DEFAULT_COUNT,
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            // Identificador: PID do processo, como no ping do sistema
            identifier: std::process::id() as u16,
        }
    }
}
