pub mod online;
pub mod tui;

use tracing_subscriber::EnvFilter;

const DEFAULT_RELAY: &str = "127.0.0.1:3000";

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not interleave with the board.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let relay_addr = parse_relay_arg(&args).unwrap_or_else(|| DEFAULT_RELAY.to_string());

    tui::run(&relay_addr)
}

/// Reads `--relay HOST:PORT` from the command line.
fn parse_relay_arg(args: &[String]) -> Option<String> {
    let idx = args.iter().position(|a| a == "--relay")?;
    args.get(idx + 1).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_arg_is_optional() {
        let args = vec!["--relay".to_string(), "10.0.0.2:4000".to_string()];
        assert_eq!(parse_relay_arg(&args), Some("10.0.0.2:4000".to_string()));
        assert_eq!(parse_relay_arg(&[]), None);
        assert_eq!(parse_relay_arg(&["--relay".to_string()]), None);
    }
}
