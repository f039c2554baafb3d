use dect_core::ClientId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Admit a client. Without a slot count, the configured client defaults apply.
    Admit { client_id: ClientId, num_slots: Option<u16> },
    Release { client_id: ClientId },
    Status,
}

/// Parses one script line. Blank lines and `#` comments yield Ok(None).
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let cmd = match verb.to_lowercase().as_str() {
        "admit" | "assign" => {
            let client_id = parse_client_id(words.next())?;
            let num_slots = match words.next() {
                Some(w) => Some(w.parse::<u16>().map_err(|_| format!("invalid slot count '{}'", w))?),
                None => None,
            };
            Command::Admit { client_id, num_slots }
        }
        "release" | "free" => Command::Release {
            client_id: parse_client_id(words.next())?,
        },
        "status" => Command::Status,
        other => return Err(format!("unknown command '{}'. Use: admit, release, status", other)),
    };

    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument '{}'", extra));
    }
    Ok(Some(cmd))
}

fn parse_client_id(word: Option<&str>) -> Result<ClientId, String> {
    let Some(word) = word else {
        return Err("missing client id".to_string());
    };
    let parsed = match word.strip_prefix("0x") {
        Some(hex) => ClientId::from_str_radix(hex, 16),
        None => word.parse::<ClientId>(),
    };
    parsed.map_err(|_| format!("invalid client id '{}'", word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("admit 7 5"),
            Ok(Some(Command::Admit { client_id: 7, num_slots: Some(5) }))
        );
        assert_eq!(
            parse_line("  ADMIT 0x1f  # defaults"),
            Ok(Some(Command::Admit { client_id: 31, num_slots: None }))
        );
        assert_eq!(parse_line("release 7"), Ok(Some(Command::Release { client_id: 7 })));
        assert_eq!(parse_line("status"), Ok(Some(Command::Status)));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# only a comment"), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("admit").is_err());
        assert!(parse_line("admit x 3").is_err());
        assert!(parse_line("admit 3 -1").is_err());
        assert!(parse_line("release 3 4").is_err());
        assert!(parse_line("reboot").is_err());
    }
}
