use crate::session::SessionId;

/// What a freshly accepted connection turned out to be, decided from its
/// first line alone (§4.2's dispatch table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirstLine {
    /// `DATA <sid>` — a data channel claiming a pending session.
    Data(SessionId),
    /// `DATA <garbage>` — the literal `DATA ` prefix was present, so the
    /// connection is a data-channel attempt by definition, but the id
    /// after it doesn't parse. It can never match a pending session; the
    /// acceptor just closes it. It must never fall through to becoming a
    /// controller (the original `recv_line` + `atoi(line+5)` + `pop_pending`
    /// never treats a `DATA `-prefixed line as anything else either).
    InvalidData,
    /// Anything else — the connection becomes (or stays) the controller.
    /// If the first line also happened to be a recognized command, it is
    /// carried along so the acceptor can execute it immediately.
    Control(Option<ControlCommand>),
}

/// A control-channel command (§4.3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// `LISTEN <port> [extras...]`. Extra tokens are accepted and ignored.
    Listen { port: u16 },
    /// `CLOSE <port>`.
    Close { port: u16 },
}

/// Classifies an already-trimmed line as a data channel or a control line.
///
/// The literal `DATA ` prefix alone decides the classification — a line
/// that starts with it is a data-channel attempt no matter what follows,
/// and an unparsable session id makes it an [`FirstLine::InvalidData`],
/// never a control line.
pub fn classify_first_line(line: &str) -> FirstLine {
    match line.strip_prefix("DATA ") {
        Some(rest) => match rest.trim().parse::<u64>() {
            Ok(value) => FirstLine::Data(SessionId::new(value)),
            Err(_) => FirstLine::InvalidData,
        },
        None => FirstLine::Control(parse_control_command(line)),
    }
}

/// Parses a control command line. Unknown commands and malformed ports
/// return `None` — callers log and ignore (§4.3), never treat it as fatal.
pub fn parse_control_command(line: &str) -> Option<ControlCommand> {
    let mut tokens = line.split_whitespace();
    match tokens.next()? {
        "LISTEN" => tokens
            .next()?
            .parse::<u16>()
            .ok()
            .map(|port| ControlCommand::Listen { port }),
        "CLOSE" => tokens
            .next()?
            .parse::<u16>()
            .ok()
            .map(|port| ControlCommand::Close { port }),
        _ => None,
    }
}

/// The `OPEN <sid> <server_port>` notice the server sends on the
/// controller channel (§4.4 step 3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenNotice {
    pub sid: SessionId,
    pub port: u16,
}

impl OpenNotice {
    pub fn new(sid: SessionId, port: u16) -> Self {
        OpenNotice { sid, port }
    }

    /// Renders the line body. Callers send it through a [`crate::LineStream`]
    /// (or equivalent), which appends the trailing `\n` itself.
    pub fn to_line(self) -> String {
        format!("OPEN {} {}", self.sid, self.port)
    }

    /// Parses an already-trimmed `OPEN <sid> <port>` line.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.strip_prefix("OPEN ")?;
        let mut tokens = rest.split_whitespace();
        let sid = tokens.next()?.parse::<u64>().ok()?;
        let port = tokens.next()?.parse::<u16>().ok()?;
        Some(OpenNotice::new(SessionId::new(sid), port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_data_line() {
        match classify_first_line("DATA 7") {
            FirstLine::Data(sid) => assert_eq!(sid, SessionId::new(7)),
            other => panic!("expected Data, got {other:?}"),
        }
    }

    #[test]
    fn malformed_data_line_is_invalid_data_not_control() {
        assert_eq!(classify_first_line("DATA abc"), FirstLine::InvalidData);
    }

    #[test]
    fn classifies_listen_with_extra_tokens() {
        assert_eq!(
            classify_first_line("LISTEN 9000 127.0.0.1 80"),
            FirstLine::Control(Some(ControlCommand::Listen { port: 9000 }))
        );
    }

    #[test]
    fn classifies_close() {
        assert_eq!(
            classify_first_line("CLOSE 9000"),
            FirstLine::Control(Some(ControlCommand::Close { port: 9000 }))
        );
    }

    #[test]
    fn unrecognized_control_line_has_no_command() {
        assert_eq!(classify_first_line("hello there"), FirstLine::Control(None));
    }

    #[test]
    fn open_notice_round_trips_through_the_wire_line() {
        let notice = OpenNotice::new(SessionId::new(12), 9001);
        let line = notice.to_line();
        assert_eq!(line, "OPEN 12 9001");
        let parsed = OpenNotice::parse(&line).unwrap();
        assert_eq!(parsed, notice);
    }

    #[test]
    fn rejects_bad_port_in_listen() {
        assert_eq!(parse_control_command("LISTEN notaport"), None);
    }
}
