//! # Operator Commands
//!
//! Line-oriented commands read from stdin while the bridge runs.
//!
//! | Command | Effect |
//! |---------|--------|
//! | `press <key>` | Key down on every row bound to `<key>` |
//! | `release <key>` | Key up on every row bound to `<key>` |
//! | `bind <row> <key>` | Assign `<key>` to row `<row>` |
//! | `axis <row> <value>` | Joystick axis (-1.0 to 1.0) into row |
//! | `set <row> <value>` | Raw integer into row |
//! | `mode <name>` | Select process mode by name |
//! | `start` / `stop` | Start or stop feeding frames |
//! | `status` | Log channels and link state |
//!
//! Blank lines and lines starting with `#` are ignored.

use crate::error::{AnyRcError, Result};

/// A parsed operator command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Press(String),
    Release(String),
    Bind { row: usize, key: String },
    Axis { row: usize, value: f32 },
    Set { row: usize, value: i32 },
    Mode(String),
    Start,
    Stop,
    Status,
}

impl Command {
    /// Parses one input line.
    ///
    /// Returns `Ok(None)` for blank and comment lines.
    ///
    /// # Errors
    ///
    /// Returns `Command` for unknown verbs, missing arguments or malformed
    /// numbers.
    ///
    /// # Examples
    ///
    /// ```
    /// use anyrc_bridge::input::command::Command;
    ///
    /// assert_eq!(Command::parse("press Up")?, Some(Command::Press("Up".to_string())));
    /// assert_eq!(Command::parse("set 2 1500")?, Some(Command::Set { row: 2, value: 1500 }));
    /// assert_eq!(Command::parse("  ")?, None);
    /// assert!(Command::parse("jump").is_err());
    /// # Ok::<(), anyrc_bridge::error::AnyRcError>(())
    /// ```
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        let command = match verb.as_str() {
            "press" => Command::Press(single_arg(&verb, &args)?.to_string()),
            "release" => Command::Release(single_arg(&verb, &args)?.to_string()),
            "mode" => Command::Mode(single_arg(&verb, &args)?.to_string()),
            "bind" => {
                let (row, key) = pair_args(&verb, &args)?;
                Command::Bind { row: parse_num(row, "row")?, key: key.to_string() }
            }
            "axis" => {
                let (row, value) = pair_args(&verb, &args)?;
                Command::Axis { row: parse_num(row, "row")?, value: parse_num(value, "axis")? }
            }
            "set" => {
                let (row, value) = pair_args(&verb, &args)?;
                Command::Set { row: parse_num(row, "row")?, value: parse_num(value, "value")? }
            }
            "start" => no_args(&verb, &args, Command::Start)?,
            "stop" => no_args(&verb, &args, Command::Stop)?,
            "status" => no_args(&verb, &args, Command::Status)?,
            other => {
                return Err(AnyRcError::Command(format!("unknown command '{}'", other)));
            }
        };

        Ok(Some(command))
    }
}

fn single_arg<'a>(verb: &str, args: &[&'a str]) -> Result<&'a str> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(AnyRcError::Command(format!("'{}' takes exactly one argument", verb))),
    }
}

fn pair_args<'a>(verb: &str, args: &[&'a str]) -> Result<(&'a str, &'a str)> {
    match args {
        [a, b] => Ok((*a, *b)),
        _ => Err(AnyRcError::Command(format!("'{}' takes exactly two arguments", verb))),
    }
}

fn no_args(verb: &str, args: &[&str], command: Command) -> Result<Command> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(AnyRcError::Command(format!("'{}' takes no arguments", verb)))
    }
}

fn parse_num<T: std::str::FromStr>(text: &str, what: &str) -> Result<T> {
    text.parse()
        .map_err(|_| AnyRcError::Command(format!("invalid {} '{}'", what, text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_commands() {
        assert_eq!(Command::parse("press a").unwrap(), Some(Command::Press("a".to_string())));
        assert_eq!(Command::parse("RELEASE Shift_L").unwrap(), Some(Command::Release("Shift_L".to_string())));
    }

    #[test]
    fn test_key_case_preserved() {
        // Key symbols are case sensitive ("a" vs "A")
        assert_eq!(Command::parse("press A").unwrap(), Some(Command::Press("A".to_string())));
    }

    #[test]
    fn test_parse_bind() {
        assert_eq!(
            Command::parse("bind 3 Left").unwrap(),
            Some(Command::Bind { row: 3, key: "Left".to_string() })
        );
    }

    #[test]
    fn test_parse_axis_and_set() {
        assert_eq!(Command::parse("axis 0 -0.5").unwrap(), Some(Command::Axis { row: 0, value: -0.5 }));
        assert_eq!(Command::parse("set 7 -12").unwrap(), Some(Command::Set { row: 7, value: -12 }));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(
            Command::parse("mode keyboard_process").unwrap(),
            Some(Command::Mode("keyboard_process".to_string()))
        );
    }

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(Command::parse("start").unwrap(), Some(Command::Start));
        assert_eq!(Command::parse(" stop ").unwrap(), Some(Command::Stop));
        assert_eq!(Command::parse("status").unwrap(), Some(Command::Status));
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   \t").unwrap(), None);
        assert_eq!(Command::parse("# press a").unwrap(), None);
    }

    #[test]
    fn test_unknown_verb() {
        match Command::parse("fly high") {
            Err(AnyRcError::Command(msg)) => assert!(msg.contains("fly")),
            other => panic!("Expected Command error, got: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_argument_counts() {
        assert!(Command::parse("press").is_err());
        assert!(Command::parse("press a b").is_err());
        assert!(Command::parse("bind 1").is_err());
        assert!(Command::parse("start now").is_err());
    }

    #[test]
    fn test_malformed_numbers() {
        assert!(Command::parse("set x 1").is_err());
        assert!(Command::parse("set 1 1.5").is_err());
        assert!(Command::parse("axis -1 0.0").is_err());
        assert!(Command::parse("axis 1 fast").is_err());
    }
}
