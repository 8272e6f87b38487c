use std::io::{Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::Print,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use super::{CharacterDisplay, DeviceError, DisplayLine};

/// Two-line character panel drawn in the terminal's alternate screen.
///
/// Stands in for the physical LCD: each row is a fixed number of character
/// cells inside a box frame, and every write replaces the whole row.
pub struct TerminalDisplay<W: Write = Stdout> {
    out: W,
    width: usize,
    open: bool,
}

impl TerminalDisplay<Stdout> {
    pub fn new(width: usize) -> Self {
        Self::with_writer(std::io::stdout(), width)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn with_writer(out: W, width: usize) -> Self {
        Self {
            out,
            width,
            open: false,
        }
    }

    /// Row text padded with blanks so stale cells get overwritten.
    fn cells(&self, text: &str) -> String {
        let mut cells: String = text.chars().take(self.width).collect();
        let used = cells.chars().count();
        cells.extend(std::iter::repeat_n(' ', self.width - used));
        cells
    }

    fn draw_frame(&mut self) -> std::io::Result<()> {
        let border = "─".repeat(self.width);
        let right = column(self.width + 1);
        execute!(
            self.out,
            EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            Print(format!("┌{}┐", border)),
            cursor::MoveTo(0, 1),
            Print("│"),
            cursor::MoveTo(right, 1),
            Print("│"),
            cursor::MoveTo(0, 2),
            Print("│"),
            cursor::MoveTo(right, 2),
            Print("│"),
            cursor::MoveTo(0, 3),
            Print(format!("└{}┘", border)),
        )
    }

    fn draw_row(&mut self, line: DisplayLine, text: &str) -> std::io::Result<()> {
        let cells = self.cells(text);
        queue!(
            self.out,
            cursor::MoveTo(1, row(line)),
            Print(cells)
        )?;
        self.out.flush()
    }
}

fn column(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn row(line: DisplayLine) -> u16 {
    match line {
        DisplayLine::Line1 => 1,
        DisplayLine::Line2 => 2,
    }
}

impl<W: Write + Send + 'static> CharacterDisplay for TerminalDisplay<W> {
    fn init(&mut self) -> Result<(), DeviceError> {
        self.draw_frame()
            .map_err(|e| DeviceError::Init(e.to_string()))?;
        self.open = true;
        Ok(())
    }

    fn write_line(&mut self, line: DisplayLine, text: &str) -> Result<(), DeviceError> {
        if !self.open {
            return Err(DeviceError::Closed);
        }
        self.draw_row(line, text).map_err(|e| DeviceError::Write {
            line,
            reason: e.to_string(),
        })
    }

    fn clear(&mut self) {
        if !self.open {
            return;
        }
        for line in DisplayLine::ALL {
            if let Err(e) = self.draw_row(line, "") {
                log::warn!("Failed to clear {}: {}", line, e);
            }
        }
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = execute!(self.out, cursor::Show, LeaveAlternateScreen) {
            log::warn!("Failed to restore terminal: {}", e);
        }
    }
}
