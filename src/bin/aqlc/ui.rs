//! Terminal rendering for `aqlc` text output.

use nu_ansi_term::{Color, Style};
use std::io::IsTerminal;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Theme {
    Auto,
    Light,
    Dark,
    Plain,
}

pub struct Ui {
    styles: Styles,
    quiet: bool,
}

impl Ui {
    pub fn new(theme: Theme, quiet: bool) -> Self {
        let paint = theme != Theme::Plain && !quiet && std::io::stdout().is_terminal();

        #[cfg(windows)]
        if paint {
            let _ = nu_ansi_term::enable_ansi_support();
        }

        Self {
            styles: Styles::for_theme(theme, paint),
            quiet,
        }
    }

    /// Query text on a single line so it can be piped.
    pub fn query(&self, text: &str) {
        println!("{}", self.styles.query.paint(text));
    }

    /// One `@key = value` row per bind variable, in key order.
    pub fn bind_vars<'a, I>(&self, rows: I)
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        for (key, value) in rows {
            println!("  {} {value}", self.styles.key.paint(format!("@{key} =")));
        }
    }

    pub fn entity(&self, name: &str, collection: &str, properties: usize, default: bool) {
        let marker = if default { " (default)" } else { "" };
        println!(
            "{} {collection} [{properties} properties]{marker}",
            self.styles.key.paint(format!("{name} ->"))
        );
    }

    /// Writes to stderr; `--quiet` drops the prefix.
    pub fn warn(&self, message: &str) {
        if self.quiet {
            eprintln!("{message}");
        } else {
            eprintln!("{} {message}", self.styles.warn.paint("warning:"));
        }
    }
}

struct Styles {
    query: Style,
    key: Style,
    warn: Style,
}

impl Styles {
    fn for_theme(theme: Theme, paint: bool) -> Self {
        if !paint {
            return Self {
                query: Style::new(),
                key: Style::new(),
                warn: Style::new(),
            };
        }
        match theme {
            Theme::Light => Self {
                query: Color::Purple.normal(),
                key: Color::Blue.bold(),
                warn: Color::Red.bold(),
            },
            Theme::Dark | Theme::Auto | Theme::Plain => Self {
                query: Color::LightCyan.normal(),
                key: Color::LightBlue.bold(),
                warn: Color::Yellow.bold(),
            },
        }
    }
}
