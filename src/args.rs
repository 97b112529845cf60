pub const USAGE: &str = "
Need to run as root!

Usage:
	goping host

	Example: ./goping example.com";

pub struct PingArgs {
    pub host: String,
}

/// Lê os argumentos do processo. `None` pede a mensagem de uso.
pub fn parse() -> Option<PingArgs> {
    parse_from(std::env::args().skip(1))
}

pub fn parse_from<I>(args: I) -> Option<PingArgs>
where
    I: IntoIterator<Item = String>,
{
    // Só o primeiro argumento conta; os demais são ignorados
    let host = args.into_iter().next()?;
    match host.as_str() {
        "" | "-h" | "--help" => None,
        _ => Some(PingArgs { host }),
    }
}
