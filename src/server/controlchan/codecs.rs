use super::{command::Command, error::ControlChanError, parse_error::ParseError, Reply};

use bytes::BytesMut;
use std::io::Write;
use tokio_util::codec::{Decoder, Encoder};

// FtpCodec implements tokio's `Decoder` and `Encoder` traits for the control
// channel, decoding FTP commands and encoding their replies.
pub struct FtpCodec {
    // Stored index of the next index to examine for a '\n' character. This is used to optimize
    // searching. For example, if `decode` was called with `abc`, it would hold `3`, because that
    // is the next index to examine. The next time `decode` is called with `abcde\n`, we will only
    // look at `de\n` before returning.
    next_index: usize,
}

impl FtpCodec {
    pub fn new() -> Self {
        FtpCodec { next_index: 0 }
    }
}

impl Decoder for FtpCodec {
    // A parse failure is an ordinary item, not a stream error: the session
    // answers it with a 501 and keeps going, while the stream error type
    // stays reserved for I/O trouble on the socket itself.
    type Item = Result<Command, ParseError>;
    type Error = ControlChanError;

    // Here we decode the incoming bytes into a meaningful command. We'll split on newlines, and
    // parse the resulting line using `Command::parse()`. This method will be called by tokio.
    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(newline_offset) = buf[self.next_index..].iter().position(|b| *b == b'\n') {
            let newline_index = newline_offset + self.next_index;
            let line = buf.split_to(newline_index + 1);
            self.next_index = 0;
            Ok(Some(Command::parse(&line)))
        } else {
            self.next_index = buf.len();
            Ok(None)
        }
    }
}

impl Encoder<Reply> for FtpCodec {
    type Error = ControlChanError;

    // Here we encode the outgoing reply
    fn encode(&mut self, reply: Reply, buf: &mut BytesMut) -> Result<(), Self::Error> {
        let mut buffer = vec![];
        match reply {
            Reply::None => {
                return Ok(());
            }
            Reply::CodeAndMsg { code, msg } => {
                if msg.is_empty() {
                    writeln!(buffer, "{}\r", code as u32)?;
                } else {
                    writeln!(buffer, "{} {}\r", code as u32, msg)?;
                }
            }
            Reply::MultiLine { code, mut lines } => {
                // Get the last line since it needs to be preceded by the reply code.
                let last_line = if let Some(x) = lines.pop() { x } else { String::from("") };

                // Lines starting with a digit should be indented
                for it in lines.iter_mut() {
                    if it.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                        it.insert(0, ' ');
                    }
                }
                if lines.is_empty() {
                    writeln!(buffer, "{} {}\r", code as u32, last_line)?;
                } else {
                    write!(buffer, "{}-{}\r\n{} {}\r\n", code as u32, lines.join("\r\n"), code as u32, last_line)?;
                }
            }
        }
        buf.extend(&buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::controlchan::ReplyCode;
    use pretty_assertions::assert_eq;

    fn encoded(reply: Reply) -> String {
        let mut codec = FtpCodec::new();
        let mut buf = BytesMut::new();
        codec.encode(reply, &mut buf).unwrap();
        String::from_utf8(buf.to_vec()).unwrap()
    }

    #[test]
    fn single_line_reply_is_crlf_terminated() {
        let reply = Reply::new(ReplyCode::CommandOkay, "Okay then");
        assert_eq!(encoded(reply), "200 Okay then\r\n");
    }

    #[test]
    fn multiline_reply_has_dash_and_terminal_code() {
        let reply = Reply::new_multiline(ReplyCode::SystemStatus, vec!["Extensions supported:", " SIZE", "END"]);
        assert_eq!(encoded(reply), "211-Extensions supported:\r\n SIZE\r\n211 END\r\n");
    }

    #[test]
    fn decodes_complete_lines_only() {
        let mut codec = FtpCodec::new();
        let mut buf = BytesMut::from(&b"NOOP"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(b"\r\nPW");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Ok(Command::Noop)));
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn malformed_line_decodes_to_a_parse_failure_item() {
        use crate::server::controlchan::parse_error::ParseError;

        let mut codec = FtpCodec::new();
        let mut buf = BytesMut::from(&b"NOOP unexpected\r\nNOOP\r\n"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Err(ParseError::InvalidCommand)));
        // The stream itself is unaffected and yields the next command.
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Ok(Command::Noop)));
    }
}
