// Criação e configuração de sockets de baixo nível
use socket2::{Domain, Protocol, Socket, Type};

use log::{debug, trace};
use std::io::{self, Read};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use crate::error::ProbeError;
use crate::icmp::{self, EchoPacket, IcmpHeader};

// Buffer de recepção (MTU típica)
const RECV_BUF_LEN: usize = 1500;

/// Resultado de uma sonda bem-sucedida.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Tamanho da mensagem ICMP recebida, sem o cabeçalho IP.
    pub bytes: usize,
    pub from: Ipv4Addr,
    pub sequence: u16,
    pub elapsed: Duration,
}

/// Um ciclo completo de pedido/resposta para um único pacote.
pub trait Transport {
    fn probe(&mut self, dst: Ipv4Addr, packet: &EchoPacket) -> Result<Reply, ProbeError>;
}

// Type::RAW só existe com a feature "all" do socket2
fn raw_type() -> Type {
    Type::from(libc::SOCK_RAW)
}

/// Envia cada Echo Request por um socket RAW próprio, fechado ao fim da sonda.
pub struct RawSocketTransport {
    timeout: Duration,
}

impl RawSocketTransport {
    pub fn new(timeout: Duration) -> Self {
        RawSocketTransport { timeout }
    }

    fn open(dst: Ipv4Addr) -> Result<Socket, ProbeError> {
        // AF_INET + SOCK_RAW + IPPROTO_ICMP; exige root (ou CAP_NET_RAW)
        let sock = Socket::new(Domain::IPV4, raw_type(), Some(Protocol::ICMPV4))
            .map_err(ProbeError::open)?;

        // Porta 0 é ignorada para ICMP; connect só fixa o destino e filtra a origem
        let dst_sa = SocketAddr::new(IpAddr::V4(dst), 0);
        sock.connect(&dst_sa.into()).map_err(ProbeError::Open)?;
        Ok(sock)
    }
}

impl Transport for RawSocketTransport {
    fn probe(&mut self, dst: Ipv4Addr, packet: &EchoPacket) -> Result<Reply, ProbeError> {
        let mut sock = Self::open(dst)?;
        debug!("opened raw ICMP socket to {}", dst);

        let pkt = packet.to_bytes();
        let sent = sock.send(&pkt).map_err(ProbeError::Write)?;
        if sent != pkt.len() {
            return Err(ProbeError::ShortWrite {
                sent,
                len: pkt.len(),
            });
        }

        // Instante do envio, para o RTT
        let t0 = Instant::now();
        let deadline = t0 + self.timeout;
        let mut buf = [0u8; RECV_BUF_LEN];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(ProbeError::Timeout(self.timeout));
            }
            // Um timeout de zero no SO significa "sem timeout"
            sock.set_read_timeout(Some(remaining.max(Duration::from_millis(1))))
                .map_err(ProbeError::Read)?;

            let n = match sock.read(&mut buf) {
                Ok(n) => n,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock
                            | io::ErrorKind::TimedOut
                            | io::ErrorKind::Interrupted
                    ) =>
                {
                    continue;
                }
                Err(e) => return Err(ProbeError::Read(e)),
            };
            let elapsed = t0.elapsed();

            let msg = icmp::icmp_payload(&buf[..n]);
            match IcmpHeader::parse(msg) {
                Some(hdr) if hdr.answers(packet) => {
                    return Ok(Reply {
                        bytes: msg.len(),
                        from: dst,
                        sequence: packet.sequence,
                        elapsed,
                    });
                }
                // No loopback o próprio Echo Request também chega aqui
                Some(hdr) => trace!(
                    "skipping icmp type={} id={} seq={}",
                    hdr.icmp_type, hdr.identifier, hdr.sequence
                ),
                None => trace!("skipping {} byte datagram", n),
            }
        }
        // `sock` é fechado no drop, em qualquer caminho de saída
    }
}
