//! Terminal presentation: ANSI styling, error boxes and the [`Presenter`]
//! seam the dispatcher writes through.

use std::io::{self, Write};

use cmdkit_core::{AppSpec, CommandSpec};

use crate::help::{render_app_help, render_command_help, render_version};

/// ANSI SGR codes used by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ansi {
    Reset,
    Bright,
    Dim,
    Underscore,
    Blink,
    Reverse,
    Hidden,
    FgBlack,
    FgRed,
    FgGreen,
    FgYellow,
    FgBlue,
    FgMagenta,
    FgCyan,
    FgWhite,
    BgBlack,
    BgRed,
    BgGreen,
    BgYellow,
    BgBlue,
    BgMagenta,
    BgCyan,
    BgWhite,
}

impl Ansi {
    pub fn code(self) -> u8 {
        match self {
            Self::Reset => 0,
            Self::Bright => 1,
            Self::Dim => 2,
            Self::Underscore => 4,
            Self::Blink => 5,
            Self::Reverse => 7,
            Self::Hidden => 8,
            Self::FgBlack => 30,
            Self::FgRed => 31,
            Self::FgGreen => 32,
            Self::FgYellow => 33,
            Self::FgBlue => 34,
            Self::FgMagenta => 35,
            Self::FgCyan => 36,
            Self::FgWhite => 37,
            Self::BgBlack => 40,
            Self::BgRed => 41,
            Self::BgGreen => 42,
            Self::BgYellow => 43,
            Self::BgBlue => 44,
            Self::BgMagenta => 45,
            Self::BgCyan => 46,
            Self::BgWhite => 47,
        }
    }

    /// Escape sequence selecting this code.
    pub fn escape(self) -> String {
        format!("\x1b[{}m", self.code())
    }
}

/// Wraps `text` in `codes` followed by a reset, or returns it unchanged when
/// `color` is off.
pub fn paint(text: &str, codes: &[Ansi], color: bool) -> String {
    if !color || codes.is_empty() {
        return text.to_string();
    }
    let mut out: String = codes.iter().map(|code| code.escape()).collect();
    out.push_str(text);
    out.push_str(&Ansi::Reset.escape());
    out
}

/// Renders a centred white-on-red notification block.
///
/// The block is as wide as the longer of `[title]` and `message` plus four
/// columns, rounded up to an even width.
///
/// # Examples
///
/// ```
/// use cmdkit::error_box;
///
/// let block = error_box("Oops", "bad", false);
/// let lines: Vec<&str> = block.lines().collect();
/// assert_eq!(lines[1], "          ");
/// assert_eq!(lines[2], "  [Oops]  ");
/// assert_eq!(lines[4], "   bad    ");
/// ```
pub fn error_box(title: &str, message: &str, color: bool) -> String {
    let title = format!("[{title}]");
    let mut width = title.chars().count().max(message.chars().count()) + 4;
    width += width % 2;

    let blank = " ".repeat(width);
    let title = center(&title, width);
    let message = center(message, width);

    let style = [Ansi::FgWhite, Ansi::BgRed];
    let mut out = String::from("\n");
    for line in [&blank, &title, &blank, &message, &blank] {
        out.push_str(&paint(line, &style, color));
        out.push('\n');
    }
    out.push('\n');
    out
}

fn center(text: &str, width: usize) -> String {
    let mut text = text.to_string();
    if text.chars().count() % 2 != 0 {
        text.push(' ');
    }
    let padding = " ".repeat(width.saturating_sub(text.chars().count()) / 2);
    format!("{padding}{text}{padding}")
}

/// Output collaborator used by [`Command`](crate::Command) and
/// [`App`](crate::App).
pub trait Presenter {
    /// Shows help for one command.
    fn command_help(&mut self, cmd: &CommandSpec) -> io::Result<()>;

    /// Shows application-level help.
    fn app_help(&mut self, app: &AppSpec) -> io::Result<()>;

    /// Shows the application version line.
    fn version(&mut self, app: &AppSpec) -> io::Result<()>;

    /// Shows a formatted error block.
    fn error(&mut self, title: &str, message: &str) -> io::Result<()>;

    /// Shows a plain line of text.
    fn notice(&mut self, text: &str) -> io::Result<()>;
}

/// [`Presenter`] writing rendered text to any [`Write`] sink.
///
/// # Examples
///
/// ```
/// use cmdkit::{Presenter, Terminal};
///
/// let mut term = Terminal::plain(Vec::new());
/// term.notice("hello").unwrap();
/// assert_eq!(String::from_utf8(term.into_inner()).unwrap(), "hello\n");
/// ```
#[derive(Debug)]
pub struct Terminal<W: Write> {
    out: W,
    color: bool,
}

impl Terminal<io::Stdout> {
    /// Standard output, coloured unless `NO_COLOR` is set.
    pub fn stdout() -> Self {
        Self::new(io::stdout(), std::env::var_os("NO_COLOR").is_none())
    }
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Sink without ANSI codes.
    pub fn plain(out: W) -> Self {
        Self::new(out, false)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for Terminal<W> {
    fn command_help(&mut self, cmd: &CommandSpec) -> io::Result<()> {
        self.out
            .write_all(render_command_help(cmd, self.color).as_bytes())
    }

    fn app_help(&mut self, app: &AppSpec) -> io::Result<()> {
        self.out.write_all(render_app_help(app, self.color).as_bytes())
    }

    fn version(&mut self, app: &AppSpec) -> io::Result<()> {
        writeln!(self.out, "{}", render_version(app))
    }

    fn error(&mut self, title: &str, message: &str) -> io::Result<()> {
        self.out
            .write_all(error_box(title, message, self.color).as_bytes())
    }

    fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_wraps_in_codes() {
        assert_eq!(
            paint("hi", &[Ansi::FgYellow], true),
            "\x1b[33mhi\x1b[0m"
        );
        assert_eq!(paint("hi", &[Ansi::FgYellow], false), "hi");
    }

    #[test]
    fn test_error_box_width_is_even() {
        let block = error_box("Incorrect Usage", "flag provided but not defined: -x", false);
        let widths: Vec<usize> = block
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().count())
            .collect();

        assert_eq!(widths.len(), 5);
        assert!(widths.iter().all(|&w| w == widths[0]));
        assert_eq!(widths[0] % 2, 0);
    }

    #[test]
    fn test_error_box_colours_every_line() {
        let block = error_box("T", "m", true);
        let painted = block.lines().filter(|l| l.starts_with("\x1b[37m\x1b[41m"));
        assert_eq!(painted.count(), 5);
    }
}
