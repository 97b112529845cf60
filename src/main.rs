// Tratamento de erros ergonômico
use anyhow::{Context, Result};

use log::debug;
use std::io;

// Módulos locais
mod args;
mod config;
mod error;
mod icmp;
mod pinger;
mod resolve;
mod transport;

use config::PingConfig;
use pinger::Pinger;
use transport::RawSocketTransport;

/// Programa principal: resolve o destino e envia 5 Echo Requests, um por vez.
/// Requer privilégios de root (Raw Sockets).
fn main() -> Result<()> {
    // Diagnóstico via RUST_LOG
    pretty_env_logger::init();

    let Some(args) = args::parse() else {
        println!("{}", args::USAGE);
        return Ok(());
    };

    // Falha de resolução é reportada, mas o processo sai com 0
    let dst = match resolve::resolve(&args.host) {
        Ok(dst) => dst,
        Err(e) => {
            println!("Fail to resolve {}, {:#}", args.host, e);
            return Ok(());
        }
    };

    let config = PingConfig::default();
    debug!("{:?}", config);

    let transport = RawSocketTransport::new(config.timeout);
    let count = config.count;
    let mut pinger = Pinger::new(transport, config);

    let stdout = io::stdout();
    let received = pinger
        .run(&args.host, dst, &mut stdout.lock())
        .context("failed to write to stdout")?;
    debug!("{}/{} replies from {}", received, count, dst);

    Ok(())
}
