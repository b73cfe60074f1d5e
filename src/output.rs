use std::io::{self, Write};

/// Standard output and standard error, or whatever stands in for them.
///
/// Every write is flushed right away so the report streams.
pub struct Console<'a> {
    out: &'a mut (dyn Write + Send),
    err: &'a mut (dyn Write + Send),
}

impl<'a> Console<'a> {
    pub fn new(out: &'a mut (dyn Write + Send), err: &'a mut (dyn Write + Send)) -> Self {
        Console { out, err }
    }

    /// Writes `text` to the output stream as is.
    pub fn print(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    /// Writes `message` and a newline to the error stream.
    pub fn eprintln(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.err, "{message}")?;
        self.err.flush()
    }
}
