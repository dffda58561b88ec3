//! Operator console command parsing
//!
//! Each input line is split on whitespace and parsed with clap, so the
//! console gets the same error messages and help output as the CLI.

use crate::api::TimerId;
use clap::builder::BoolishValueParser;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "stagetimer-admin",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true,
    help_template = "Commands:\n{subcommands}"
)]
struct ConsoleLine {
    #[command(subcommand)]
    command: AdminCommand,
}

/// One operator command
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum AdminCommand {
    /// List commands
    Help,
    /// Toggle this console's light/dark theme
    DarkMode,
    /// Change the admin PIN: pin <current> <new> <confirm>
    Pin {
        /// Current PIN
        current: String,
        /// New PIN
        new: String,
        /// New PIN again
        confirm: String,
    },
    /// Close the PIN dialog
    PinClose,
    /// Reload and show the viewer theme
    Theme,
    /// Edit the viewer theme and submit it
    ThemeSet {
        /// Background colour (e.g. #000000)
        #[arg(long)]
        background: Option<String>,
        /// Font colour (e.g. #FFFFFF)
        #[arg(long)]
        font_color: Option<String>,
        /// Low-time threshold in minutes
        #[arg(long, allow_negative_numbers = true)]
        low_time_minutes: Option<i64>,
        /// Low-time warning on/off
        #[arg(long, value_parser = BoolishValueParser::new())]
        warning: Option<bool>,
    },
    /// Show a timer on the viewer
    Enable {
        /// Timer id (1 or 2)
        timer: TimerId,
    },
    /// Hide a timer from the viewer
    Disable {
        /// Timer id (1 or 2)
        timer: TimerId,
    },
    /// Set a timer's duration: set-time <timer> <h> <m> <s>
    SetTime {
        /// Timer id (1 or 2)
        timer: TimerId,
        /// Hours
        #[arg(default_value = "0", allow_hyphen_values = true)]
        hours: String,
        /// Minutes
        #[arg(default_value = "0", allow_hyphen_values = true)]
        minutes: String,
        /// Seconds
        #[arg(default_value = "0", allow_hyphen_values = true)]
        seconds: String,
    },
    /// Start a timer
    Start {
        /// Timer id (1 or 2)
        timer: TimerId,
    },
    /// Pause a running timer
    Pause {
        /// Timer id (1 or 2)
        timer: TimerId,
    },
    /// Resume a paused timer
    Resume {
        /// Timer id (1 or 2)
        timer: TimerId,
    },
    /// Reset a timer to its set duration
    Reset {
        /// Timer id (1 or 2)
        timer: TimerId,
    },
    /// Assign an uploaded logo to a timer
    Logo {
        /// Timer id (1 or 2)
        timer: TimerId,
        /// Logo filename
        filename: String,
    },
    /// Remove a timer's logo
    ClearLogo {
        /// Timer id (1 or 2)
        timer: TimerId,
    },
    /// Upload a logo image: upload <path> <name...>
    Upload {
        /// Image file
        path: PathBuf,
        /// Display name
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        name: Vec<String>,
    },
    /// Reload the logo list
    Logos,
    /// Delete an uploaded logo (asks for confirmation)
    DeleteLogo {
        /// Logo filename
        filename: String,
    },
    /// Confirm the pending question
    #[command(alias = "y")]
    Yes,
    /// Decline the pending question
    #[command(alias = "n")]
    No,
    /// Fetch status now
    Refresh,
    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

/// Parse one console line; `Ok(None)` for a blank line
pub fn parse_command(line: &str) -> Result<Option<AdminCommand>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    ConsoleLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

/// Console help text
pub fn help_text() -> String {
    ConsoleLine::command().render_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> AdminCommand {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_timer_commands() {
        assert_eq!(parse("start 1"), AdminCommand::Start { timer: TimerId::One });
        assert_eq!(parse("disable 2"), AdminCommand::Disable { timer: TimerId::Two });
        assert!(parse_command("start 3").is_err());
    }

    #[test]
    fn test_set_time_keeps_raw_fields() {
        assert_eq!(
            parse("set-time 1 0 x 30"),
            AdminCommand::SetTime {
                timer: TimerId::One,
                hours: "0".to_string(),
                minutes: "x".to_string(),
                seconds: "30".to_string(),
            }
        );
        assert_eq!(
            parse("set-time 2 1"),
            AdminCommand::SetTime {
                timer: TimerId::Two,
                hours: "1".to_string(),
                minutes: "0".to_string(),
                seconds: "0".to_string(),
            }
        );
    }

    #[test]
    fn test_upload_name_with_spaces() {
        assert_eq!(
            parse("upload /tmp/logo.png Acme Corp"),
            AdminCommand::Upload {
                path: PathBuf::from("/tmp/logo.png"),
                name: vec!["Acme".to_string(), "Corp".to_string()],
            }
        );
        assert!(parse_command("upload /tmp/logo.png").is_err());
    }

    #[test]
    fn test_theme_set_flags() {
        assert_eq!(
            parse("theme-set --background #101010 --low-time-minutes 3 --warning off"),
            AdminCommand::ThemeSet {
                background: Some("#101010".to_string()),
                font_color: None,
                low_time_minutes: Some(3),
                warning: Some(false),
            }
        );
    }

    #[test]
    fn test_aliases() {
        assert_eq!(parse("y"), AdminCommand::Yes);
        assert_eq!(parse("n"), AdminCommand::No);
        assert_eq!(parse("exit"), AdminCommand::Quit);
    }

    #[test]
    fn test_pin_arguments() {
        assert_eq!(
            parse("pin 12345 54321 54321"),
            AdminCommand::Pin {
                current: "12345".to_string(),
                new: "54321".to_string(),
                confirm: "54321".to_string(),
            }
        );
    }

    #[test]
    fn test_help_lists_commands() {
        let help = help_text();
        assert!(help.contains("delete-logo"));
        assert!(help.contains("set-time"));
    }
}
