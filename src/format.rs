//! Outbound command formatting.
//!
//! Serializes a command name and an ordered argument list into one wire line.
//! The final argument is always emitted as a `:`-prefixed trailing parameter,
//! which keeps empty and space-containing arguments round-trip safe.

use crate::error::FormatError;

/// Format an outbound command and its arguments as one wire line, without
/// the CRLF terminator.
///
/// - Zero arguments: just the command.
/// - One argument: `"{command} :{argument}"`.
/// - Multiple arguments: all but the last space-joined, the last
///   `:`-prefixed.
///
/// Fails when the command is empty or contains a space/CR/LF, when any
/// argument contains a CR/LF, or when a non-trailing argument contains a
/// space.
///
/// # Example
///
/// ```
/// use ircline::format_command;
///
/// assert_eq!(format_command("PING", &[]).unwrap(), "PING");
/// assert_eq!(format_command("NICK", &["wiz"]).unwrap(), "NICK :wiz");
/// assert_eq!(
///     format_command("PRIVMSG", &["#chan", "hello there"]).unwrap(),
///     "PRIVMSG #chan :hello there"
/// );
/// ```
pub fn format_command(command: &str, args: &[&str]) -> Result<String, FormatError> {
    if command.is_empty() {
        return Err(FormatError::EmptyCommand);
    }
    if let Some(c) = command.chars().find(|c| matches!(c, ' ' | '\r' | '\n')) {
        return Err(FormatError::IllegalCommandChar(c));
    }
    if let Some(index) = args.iter().position(|a| a.contains(['\r', '\n'])) {
        return Err(FormatError::LineEndingInArgument { index });
    }

    let Some((last, middles)) = args.split_last() else {
        return Ok(command.to_owned());
    };

    if let Some(index) = middles.iter().position(|a| a.contains(' ')) {
        return Err(FormatError::SpaceInMiddleArgument {
            index,
            argument: middles[index].to_owned(),
        });
    }

    let len = command.len() + args.iter().map(|a| a.len() + 1).sum::<usize>() + 1;
    let mut line = String::with_capacity(len);
    line.push_str(command);
    for middle in middles {
        line.push(' ');
        line.push_str(middle);
    }
    line.push_str(" :");
    line.push_str(last);
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    #[test]
    fn test_no_arguments() {
        assert_eq!(format_command("spam", &[]).unwrap(), "spam");
    }

    #[test]
    fn test_single_argument_is_always_trailing() {
        assert_eq!(format_command("spam", &["eggs"]).unwrap(), "spam :eggs");
    }

    #[test]
    fn test_two_arguments() {
        assert_eq!(
            format_command("spam", &["spam", "spam"]).unwrap(),
            "spam spam :spam"
        );
    }

    #[test]
    fn test_spaces_allowed_in_last_argument() {
        assert_eq!(
            format_command("spam", &["spam", "spam", "spam spam spam"]).unwrap(),
            "spam spam spam :spam spam spam"
        );
    }

    #[test]
    fn test_space_in_middle_argument_fails() {
        let err = format_command("spam", &["eggs and spam", "spam"]).unwrap_err();
        assert_eq!(
            err,
            FormatError::SpaceInMiddleArgument {
                index: 0,
                argument: "eggs and spam".to_owned(),
            }
        );
    }

    #[test]
    fn test_empty_command_fails() {
        assert_eq!(format_command("", &[]).unwrap_err(), FormatError::EmptyCommand);
    }

    #[test]
    fn test_command_with_space_fails() {
        assert_eq!(
            format_command("PRIV MSG", &[]).unwrap_err(),
            FormatError::IllegalCommandChar(' ')
        );
    }

    #[test]
    fn test_crlf_in_argument_fails() {
        assert_eq!(
            format_command("QUIT", &["bye\r\nJOIN #evil"]).unwrap_err(),
            FormatError::LineEndingInArgument { index: 0 }
        );
    }

    #[test]
    fn test_empty_trailing_argument_round_trips() {
        let line = format_command("TOPIC", &["#chan", ""]).unwrap();
        assert_eq!(line, "TOPIC #chan :");
        let msg: Message = line.parse().unwrap();
        assert_eq!(msg.params, vec!["#chan", ""]);
    }

    #[test]
    fn test_formatted_line_reparses() {
        let line = format_command("PRIVMSG", &["Wiz", "Hello are you receiving this message ?"])
            .unwrap();
        let msg: Message = line.parse().unwrap();
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(
            msg.params,
            vec!["Wiz", "Hello are you receiving this message ?"]
        );
    }
}
