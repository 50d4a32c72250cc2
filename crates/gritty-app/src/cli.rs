use std::path::PathBuf;

use clap::Parser;

/// gritty: attach the local terminal to a remote shell over a WebSocket.
#[derive(Parser, Debug)]
#[command(name = "gritty", version, about)]
pub struct Args {
    /// Terminal host URL, overriding `server.url` from the config.
    pub url: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Extra environment variable for the remote shell (repeatable).
    #[arg(short = 'e', long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// Log level override (e.g. `gritty=debug`).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    if key.is_empty() {
        return Err(format!("empty variable name in {raw:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_url_and_env_pairs() {
        let args = Args::try_parse_from([
            "gritty",
            "ws://host:1337/gritty",
            "-e",
            "EDITOR=vim",
            "--env",
            "EMPTY=",
        ])
        .unwrap();

        assert_eq!(args.url.as_deref(), Some("ws://host:1337/gritty"));
        assert_eq!(
            args.env,
            vec![
                ("EDITOR".to_string(), "vim".to_string()),
                ("EMPTY".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn env_value_may_contain_equals() {
        assert_eq!(
            parse_env_pair("OPTS=a=b").unwrap(),
            ("OPTS".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn rejects_malformed_env() {
        assert!(parse_env_pair("NOVALUE").is_err());
        assert!(parse_env_pair("=value").is_err());
        assert!(Args::try_parse_from(["gritty", "-e", "broken"]).is_err());
    }

    #[test]
    fn everything_is_optional() {
        let args = Args::try_parse_from(["gritty"]).unwrap();
        assert!(args.url.is_none());
        assert!(args.config.is_none());
        assert!(args.env.is_empty());
    }
}
