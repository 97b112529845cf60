use anyhow::{Context, Result};
use log::debug;
use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};

/// Resolve um nome ou literal IPv4 para o primeiro endereço IPv4.
pub fn resolve(host: &str) -> Result<Ipv4Addr> {
    if let Ok(ip) = host.parse::<Ipv4Addr>() {
        return Ok(ip);
    }

    // Porta 0 só para satisfazer ToSocketAddrs
    let addrs = (host, 0)
        .to_socket_addrs()
        .with_context(|| format!("lookup {}", host))?;

    let addr = addrs
        .filter_map(|sa| match sa.ip() {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .next()
        .with_context(|| format!("no IPv4 address for {}", host))?;

    debug!("resolved {} to {}", host, addr);
    Ok(addr)
}
