use std::io::{self, Stdout, Write};

const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Sink for newly detected clues
pub trait Reporter {
    fn report(&mut self, riddle: &str, answer: &str) -> io::Result<()>;
}

/// Prints the clue line and a highlighted answer line
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
}

impl ConsoleReporter<Stdout> {
    /// Stdout, colored only when it is a terminal
    pub fn stdout() -> Self {
        Self::new(io::stdout(), atty::is(atty::Stream::Stdout))
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, riddle: &str, answer: &str) -> io::Result<()> {
        writeln!(self.out, "Found clue: '{riddle}'")?;
        if self.color {
            writeln!(self.out, "{GREEN}Answer: {answer}{RESET}")?;
        } else {
            writeln!(self.out, "Answer: {answer}")?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}
