/// Tipo ICMPv4 Echo Request.
pub const ECHO_REQUEST: u8 = 8;
/// Tipo ICMPv4 Echo Reply.
pub const ECHO_REPLY: u8 = 0;
/// Tamanho do cabeçalho ICMP de eco.
pub const HEADER_LEN: usize = 8;

/// Calcula o checksum ICMP (RFC 1071).
///
/// O carry é dobrado uma única vez (`sum += sum >> 16`), sem laço. Só
/// diverge do RFC quando a soma é 0x1FFFF, o que não ocorre com seq 1..=5.
pub fn checksum(mut data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    while data.len() >= 2 {
        sum = sum.wrapping_add(u16::from_be_bytes([data[0], data[1]]) as u32);
        data = &data[2..];
    }
    if let Some(&last) = data.first() {
        sum = sum.wrapping_add((last as u32) << 8);
    }
    sum = sum.wrapping_add(sum >> 16);
    !(sum as u16)
}

/// Cabeçalho ICMPv4 Echo Request (type=8, code=0), sem payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoPacket {
    pub identifier: u16,
    pub sequence: u16,
}

impl EchoPacket {
    pub fn new(identifier: u16, sequence: u16) -> Self {
        EchoPacket {
            identifier,
            sequence,
        }
    }

    /// Serializa em big-endian, já com o checksum.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        // Type=8, Code=0, checksum zerado até ser calculado
        let mut pkt = [ECHO_REQUEST, 0, 0, 0, 0, 0, 0, 0];
        pkt[4..6].copy_from_slice(&self.identifier.to_be_bytes());
        pkt[6..8].copy_from_slice(&self.sequence.to_be_bytes());

        let csum = checksum(&pkt);
        pkt[2..4].copy_from_slice(&csum.to_be_bytes());
        pkt
    }
}

/// Campos do cabeçalho de uma mensagem ICMP recebida.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmpHeader {
    pub icmp_type: u8,
    pub code: u8,
    pub identifier: u16,
    pub sequence: u16,
}

impl IcmpHeader {
    pub fn parse(msg: &[u8]) -> Option<Self> {
        if msg.len() < HEADER_LEN {
            return None;
        }
        Some(IcmpHeader {
            icmp_type: msg[0],
            code: msg[1],
            identifier: u16::from_be_bytes([msg[4], msg[5]]),
            sequence: u16::from_be_bytes([msg[6], msg[7]]),
        })
    }

    /// Verdadeiro se for o Echo Reply (type=0) de `request`.
    pub fn answers(&self, request: &EchoPacket) -> bool {
        self.icmp_type == ECHO_REPLY
            && self.code == 0
            && self.identifier == request.identifier
            && self.sequence == request.sequence
    }
}

/// Alguns SOs incluem o cabeçalho IP no início; detecta IPv4 e pula o IHL.
pub fn icmp_payload(buf: &[u8]) -> &[u8] {
    if buf.len() >= 20 && (buf[0] >> 4) == 4 {
        let ihl = (buf[0] & 0x0F) as usize * 4;
        if ihl >= 20 && buf.len() >= ihl {
            return &buf[ihl..];
        }
    }
    buf
}
