use std::io::{self, BufRead, Write};

/// Line-oriented prompt over any reader/writer pair
pub struct Prompt<R, W> {
    input: R,
    pub output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a label and read one trimmed line; `None` at end of input
    pub fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    pub fn rule(&mut self, width: usize) -> io::Result<()> {
        writeln!(self.output, "{}", "=".repeat(width))
    }
}
