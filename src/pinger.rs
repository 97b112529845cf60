use log::debug;
use std::io::{self, Write};
use std::net::Ipv4Addr;
use std::thread;

use crate::config::PingConfig;
use crate::icmp::EchoPacket;
use crate::transport::Transport;

/// Executa a sequência de sondas contra um destino já resolvido.
pub struct Pinger<T> {
    transport: T,
    config: PingConfig,
}

impl<T: Transport> Pinger<T> {
    pub fn new(transport: T, config: PingConfig) -> Self {
        Pinger { transport, config }
    }

    /// Envia `config.count` pedidos, um de cada vez, e escreve uma linha por
    /// sonda em `out`. Devolve quantas respostas chegaram.
    ///
    /// Uma sonda que falha consome o seu número de sequência e o intervalo
    /// como qualquer outra.
    pub fn run<W: Write>(&mut self, host: &str, dst: Ipv4Addr, out: &mut W) -> io::Result<u16> {
        writeln!(out, "Ping {} ({}):", dst, host)?;
        writeln!(out)?;

        let count = self.config.count;
        let mut received = 0u16;

        for seq in 1..=count {
            let packet = EchoPacket::new(self.config.identifier, seq);

            match self.transport.probe(dst, &packet) {
                Ok(reply) => {
                    received += 1;
                    writeln!(
                        out,
                        "{} bytes from {}: seq={} time={}ms",
                        reply.bytes,
                        reply.from,
                        reply.sequence,
                        reply.elapsed.as_millis()
                    )?;
                }
                Err(e) => {
                    debug!("probe seq={} failed: {:?}", seq, e);
                    writeln!(out, "Error: {}", e)?;
                }
            }

            // Não dorme depois do último
            if seq < count {
                thread::sleep(self.config.interval);
            }
        }

        Ok(received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::transport::Reply;
    use std::collections::VecDeque;
    use std::time::Duration;

    enum Outcome {
        Reply(Duration),
        Timeout,
        Denied,
    }

    /// Transporte roteirizado: devolve os resultados na ordem dada e
    /// guarda os pacotes recebidos.
    struct Scripted {
        outcomes: VecDeque<Outcome>,
        seen: Vec<EchoPacket>,
    }

    impl Scripted {
        fn new(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
            Scripted {
                outcomes: outcomes.into_iter().collect(),
                seen: Vec::new(),
            }
        }
    }

    impl Transport for Scripted {
        fn probe(&mut self, dst: Ipv4Addr, packet: &EchoPacket) -> Result<Reply, ProbeError> {
            self.seen.push(*packet);
            match self.outcomes.pop_front().expect("unexpected probe") {
                Outcome::Reply(elapsed) => Ok(Reply {
                    bytes: 8,
                    from: dst,
                    sequence: packet.sequence,
                    elapsed,
                }),
                Outcome::Timeout => Err(ProbeError::Timeout(Duration::from_secs(2))),
                Outcome::Denied => Err(ProbeError::open(io::Error::from_raw_os_error(
                    libc::EPERM,
                ))),
            }
        }
    }

    fn config(count: u16) -> PingConfig {
        PingConfig {
            count,
            interval: Duration::ZERO,
            timeout: Duration::from_secs(2),
            identifier: 0x1234,
        }
    }

    fn run(outcomes: Vec<Outcome>, count: u16) -> (Vec<EchoPacket>, String, u16) {
        let mut pinger = Pinger::new(Scripted::new(outcomes), config(count));
        let mut out = Vec::new();
        let received = pinger
            .run("localhost", Ipv4Addr::LOCALHOST, &mut out)
            .unwrap();
        (
            pinger.transport.seen,
            String::from_utf8(out).unwrap(),
            received,
        )
    }

    #[test]
    fn sequence_numbers_run_one_to_five() {
        let outcomes = (0..5).map(|_| Outcome::Reply(Duration::from_millis(1))).collect();
        let (seen, _, received) = run(outcomes, 5);

        let seqs: Vec<u16> = seen.iter().map(|p| p.sequence).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4, 5]);
        assert!(seen.iter().all(|p| p.identifier == 0x1234));
        assert_eq!(received, 5);
    }

    #[test]
    fn reports_successful_probes() {
        let outcomes = vec![
            Outcome::Reply(Duration::from_micros(1_700)),
            Outcome::Reply(Duration::from_millis(12)),
        ];
        let (_, out, _) = run(outcomes, 2);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Ping 127.0.0.1 (localhost):",
                "",
                "8 bytes from 127.0.0.1: seq=1 time=1ms",
                "8 bytes from 127.0.0.1: seq=2 time=12ms",
            ]
        );
    }

    #[test]
    fn timeouts_do_not_stop_the_run() {
        let outcomes = (0..5).map(|_| Outcome::Timeout).collect();
        let (seen, out, received) = run(outcomes, 5);

        assert_eq!(seen.len(), 5);
        assert_eq!(received, 0);
        let errors: Vec<&str> = out.lines().filter(|l| l.starts_with("Error: ")).collect();
        assert_eq!(errors.len(), 5);
        assert!(errors.iter().all(|l| l.contains("timed out")));
    }

    #[test]
    fn failed_probe_still_consumes_its_sequence_number() {
        let outcomes = vec![
            Outcome::Reply(Duration::from_millis(3)),
            Outcome::Denied,
            Outcome::Timeout,
            Outcome::Reply(Duration::from_millis(4)),
        ];
        let (seen, out, received) = run(outcomes, 4);

        let seqs: Vec<u16> = seen.iter().map(|p| p.sequence).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4]);
        assert_eq!(received, 2);

        let lines: Vec<&str> = out.lines().skip(2).collect();
        assert_eq!(lines[0], "8 bytes from 127.0.0.1: seq=1 time=3ms");
        assert!(lines[1].starts_with("Error: ") && lines[1].contains("require root"));
        assert!(lines[2].starts_with("Error: request timed out"));
        assert_eq!(lines[3], "8 bytes from 127.0.0.1: seq=4 time=4ms");
    }

    #[test]
    fn no_sleep_after_last_probe() {
        let mut cfg = config(1);
        cfg.interval = Duration::from_secs(10);
        let mut pinger = Pinger::new(
            Scripted::new(vec![Outcome::Reply(Duration::from_millis(1))]),
            cfg,
        );

        let started = std::time::Instant::now();
        let received = pinger
            .run("localhost", Ipv4Addr::LOCALHOST, &mut io::sink())
            .unwrap();
        assert_eq!(received, 1);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn zero_count_only_prints_header() {
        let (seen, out, _) = run(Vec::new(), 0);
        assert!(seen.is_empty());
        assert_eq!(out, "Ping 127.0.0.1 (localhost):\n\n");
    }
}
