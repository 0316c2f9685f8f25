//! Editor options — fixed at session start.
//!
//! Values come from three layers, later layers winning:
//!
//! 1. built-in defaults
//! 2. one environment variable per option, then `KED_OPTIONS`, a
//!    whitespace-separated list of `name=value` directives
//! 3. `-c name=value` directives on the command line
//!
//! # Option names
//!
//! Both full names and abbreviations are accepted:
//!
//! | Full name       | Abbrev | Default | Env var               |
//! |-----------------|--------|---------|-----------------------|
//! | `tabwidth`      | `tw`   | 4       | `KED_TABWIDTH`        |
//! | `maxhistory`    | `mh`   | 10      | `KED_MAX_HISTORY`     |
//! | `maxactiontime` | `mat`  | 10      | `KED_MAX_ACTION_TIME` |
//! | `scrolloff`     | `so`   | 8       | `KED_SCROLLOFF`       |
//! | `maxfilename`   | `mfn`  | 40      | `KED_MAX_FILE_NAME`   |
//!
//! `maxactiontime` is in seconds; 0 disables the idle commit.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::buffer::DEFAULT_TAB_WIDTH;
use crate::error::{Error, Result};
use crate::history::{DEFAULT_MAX_ACTION_TIME, DEFAULT_MAX_HISTORY};

/// Environment variable holding extra `name=value` directives.
pub const OPTIONS_ENV: &str = "KED_OPTIONS";

// ---------------------------------------------------------------------------
// OptionName
// ---------------------------------------------------------------------------

/// A known option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionName {
    TabWidth,
    MaxHistory,
    MaxActionTime,
    ScrollOff,
    MaxFileName,
}

impl OptionName {
    pub const ALL: [Self; 5] = [
        Self::TabWidth,
        Self::MaxHistory,
        Self::MaxActionTime,
        Self::ScrollOff,
        Self::MaxFileName,
    ];

    /// Look up a full name or abbreviation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "tabwidth" | "tw" => Some(Self::TabWidth),
            "maxhistory" | "mh" => Some(Self::MaxHistory),
            "maxactiontime" | "mat" => Some(Self::MaxActionTime),
            "scrolloff" | "so" => Some(Self::ScrollOff),
            "maxfilename" | "mfn" => Some(Self::MaxFileName),
            _ => None,
        }
    }

    #[must_use]
    pub const fn full_name(self) -> &'static str {
        match self {
            Self::TabWidth => "tabwidth",
            Self::MaxHistory => "maxhistory",
            Self::MaxActionTime => "maxactiontime",
            Self::ScrollOff => "scrolloff",
            Self::MaxFileName => "maxfilename",
        }
    }

    #[must_use]
    pub const fn abbrev(self) -> &'static str {
        match self {
            Self::TabWidth => "tw",
            Self::MaxHistory => "mh",
            Self::MaxActionTime => "mat",
            Self::ScrollOff => "so",
            Self::MaxFileName => "mfn",
        }
    }

    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::TabWidth => "KED_TABWIDTH",
            Self::MaxHistory => "KED_MAX_HISTORY",
            Self::MaxActionTime => "KED_MAX_ACTION_TIME",
            Self::ScrollOff => "KED_SCROLLOFF",
            Self::MaxFileName => "KED_MAX_FILE_NAME",
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

// ---------------------------------------------------------------------------
// Directives
// ---------------------------------------------------------------------------

/// Parse one `name=value` directive.
///
/// # Errors
///
/// [`Error::InvalidOption`] for a missing `=`, an unknown name or a value
/// that is not a non-negative integer.
pub fn parse_directive(arg: &str) -> Result<(OptionName, usize)> {
    let arg = arg.trim();
    let Some((name, value)) = arg.split_once('=') else {
        return Err(Error::invalid_option(arg, "expected name=value"));
    };
    let name = name.trim();
    let option =
        OptionName::parse(name).ok_or_else(|| Error::invalid_option(name, "unknown option"))?;
    let value = value
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::invalid_option(name, format!("'{}' is not a number", value.trim())))?;
    Ok((option, value))
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Resolved option values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Render columns per tab stop. Never zero.
    pub tab_width: usize,
    /// Capacity of each undo/redo stack.
    pub max_history: usize,
    /// Idle seconds before the in-progress undo step closes.
    pub max_action_time: u64,
    /// Rows kept visible above and below the cursor.
    pub scroll_off: usize,
    /// Longest file name accepted by the save-as prompt.
    pub max_file_name: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            max_history: DEFAULT_MAX_HISTORY,
            max_action_time: DEFAULT_MAX_ACTION_TIME.as_secs(),
            scroll_off: 8,
            max_file_name: 40,
        }
    }
}

impl Options {
    /// Defaults overridden by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    ///
    /// Bad values are logged and skipped; the rest still apply.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        for option in OptionName::ALL {
            let Some(raw) = lookup(option.env_var()) else {
                continue;
            };
            let parsed = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| {
                    Error::invalid_option(option.env_var(), format!("'{raw}' is not a number"))
                })
                .and_then(|value| options.set(option, value));
            if let Err(err) = parsed {
                warn!(%err, "ignoring environment option");
            }
        }

        if let Some(directives) = lookup(OPTIONS_ENV) {
            for arg in directives.split_whitespace() {
                if let Err(err) = options.apply(arg) {
                    warn!(%err, "ignoring {OPTIONS_ENV} entry");
                }
            }
        }

        options
    }

    /// Assign one option.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOption`] when `tabwidth` is zero.
    pub fn set(&mut self, option: OptionName, value: usize) -> Result<()> {
        match option {
            OptionName::TabWidth => {
                if value == 0 {
                    return Err(Error::invalid_option(option.full_name(), "must be at least 1"));
                }
                self.tab_width = value;
            }
            OptionName::MaxHistory => self.max_history = value,
            OptionName::MaxActionTime => {
                self.max_action_time = u64::try_from(value).unwrap_or(u64::MAX);
            }
            OptionName::ScrollOff => self.scroll_off = value,
            OptionName::MaxFileName => self.max_file_name = value,
        }
        Ok(())
    }

    /// Current value of one option.
    #[must_use]
    pub fn get(&self, option: OptionName) -> usize {
        match option {
            OptionName::TabWidth => self.tab_width,
            OptionName::MaxHistory => self.max_history,
            OptionName::MaxActionTime => {
                usize::try_from(self.max_action_time).unwrap_or(usize::MAX)
            }
            OptionName::ScrollOff => self.scroll_off,
            OptionName::MaxFileName => self.max_file_name,
        }
    }

    /// Apply one `name=value` directive.
    ///
    /// # Errors
    ///
    /// Anything [`parse_directive`] or [`Options::set`] rejects. The options
    /// are unchanged on error.
    pub fn apply(&mut self, directive: &str) -> Result<()> {
        let (option, value) = parse_directive(directive)?;
        self.set(option, value)
    }

    /// Apply every directive in order, stopping at the first bad one.
    ///
    /// # Errors
    ///
    /// The first directive that fails to apply.
    pub fn apply_all<I, S>(&mut self, directives: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for directive in directives {
            self.apply(directive.as_ref())?;
        }
        Ok(())
    }

    /// Idle limit as a `Duration`.
    #[must_use]
    pub const fn max_action_time(&self) -> Duration {
        Duration::from_secs(self.max_action_time)
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, option) in OptionName::ALL.into_iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{option}={}", self.get(option))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
