use std::io::{self, Write};

const BAR_WIDTH: u64 = 28;

/// Console side of a revocation run: status lines plus a progress indicator.
pub trait Reporter {
    fn message(&mut self, line: &str) -> io::Result<()>;
    fn on_start(&mut self, total: u64) -> io::Result<()>;
    fn on_step(&mut self) -> io::Result<()>;
    fn on_finish(&mut self) -> io::Result<()>;
}

/// Prints lines as-is and redraws ` current/total [====>---] pct%` in place.
pub struct TerminalReporter<W> {
    out: W,
    current: u64,
    total: u64,
}

impl TerminalReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            current: 0,
            total: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self) -> io::Result<()> {
        let (filled, pct) = if self.total == 0 {
            (BAR_WIDTH, 100)
        } else {
            (
                BAR_WIDTH * self.current / self.total,
                100 * self.current / self.total,
            )
        };

        let mut bar = "=".repeat(filled as usize);
        if filled < BAR_WIDTH {
            bar.push('>');
            bar.push_str(&"-".repeat((BAR_WIDTH - filled - 1) as usize));
        }

        write!(
            self.out,
            "\r {}/{} [{}] {:>3}%",
            self.current, self.total, bar, pct
        )?;
        self.out.flush()
    }
}

impl<W: Write> Reporter for TerminalReporter<W> {
    fn message(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)
    }

    fn on_start(&mut self, total: u64) -> io::Result<()> {
        self.total = total;
        self.current = 0;
        self.render()
    }

    fn on_step(&mut self) -> io::Result<()> {
        self.current = (self.current + 1).min(self.total);
        self.render()
    }

    fn on_finish(&mut self) -> io::Result<()> {
        self.current = self.total;
        self.render()?;
        writeln!(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_counts_and_percentage() {
        let mut r = TerminalReporter::new(Vec::new());
        r.on_start(4).unwrap();
        r.on_step().unwrap();
        r.on_step().unwrap();
        r.on_finish().unwrap();

        let out = String::from_utf8(r.into_inner()).unwrap();
        assert!(out.contains(" 0/4 [>"));
        assert!(out.contains(" 2/4 [==============>"));
        assert!(out.contains("  50%"));
        assert!(out.contains(&format!(" 4/4 [{}] 100%\n", "=".repeat(28))));
    }

    #[test]
    fn test_empty_run_is_complete() {
        let mut r = TerminalReporter::new(Vec::new());
        r.on_start(0).unwrap();
        r.on_finish().unwrap();

        let out = String::from_utf8(r.into_inner()).unwrap();
        assert!(out.ends_with(" 0/0 [============================] 100%\n"));
    }

    #[test]
    fn test_messages_are_plain_lines() {
        let mut r = TerminalReporter::new(Vec::new());
        r.message("Revoking all active tokens...").unwrap();
        assert_eq!(
            String::from_utf8(r.into_inner()).unwrap(),
            "Revoking all active tokens...\n"
        );
    }
}
