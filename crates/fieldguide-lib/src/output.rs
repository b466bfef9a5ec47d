use std::io::{Cursor, Read, Stderr, Stdin, Stdout, Write};

/// Console streams handed to every command.
///
/// `identify -` reads image bytes from stdin; answers, labels and API
/// diagnostics go to stdout.
pub trait ConsoleIO<IN: Read, OUT: Write, ERR: Write> {
    fn stdin(&mut self) -> &mut IN;
    fn stdout(&mut self) -> &mut OUT;
    fn stderr(&mut self) -> &mut ERR;
}

/// Process streams.
pub struct StdIO {
    stdin: Stdin,
    stdout: Stdout,
    stderr: Stderr,
}

impl StdIO {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stdin: std::io::stdin(),
            stdout: std::io::stdout(),
            stderr: std::io::stderr(),
        }
    }
}

impl Default for StdIO {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleIO<Stdin, Stdout, Stderr> for StdIO {
    fn stdin(&mut self) -> &mut Stdin {
        &mut self.stdin
    }

    fn stdout(&mut self) -> &mut Stdout {
        &mut self.stdout
    }

    fn stderr(&mut self) -> &mut Stderr {
        &mut self.stderr
    }
}

/// In-memory console: canned stdin bytes, captured stdout/stderr.
#[derive(Default)]
pub struct BufferedIO {
    stdin: Cursor<Vec<u8>>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl BufferedIO {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Console whose stdin yields `bytes`, e.g. a piped image.
    #[must_use]
    pub fn with_stdin(bytes: &[u8]) -> Self {
        Self {
            stdin: Cursor::new(bytes.to_vec()),
            ..Self::default()
        }
    }

    /// Captured stdout, lossily decoded.
    pub fn stdout_to_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Captured stderr, lossily decoded.
    pub fn stderr_to_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

impl ConsoleIO<Cursor<Vec<u8>>, Vec<u8>, Vec<u8>> for BufferedIO {
    fn stdin(&mut self) -> &mut Cursor<Vec<u8>> {
        &mut self.stdin
    }

    fn stdout(&mut self) -> &mut Vec<u8> {
        &mut self.stdout
    }

    fn stderr(&mut self) -> &mut Vec<u8> {
        &mut self.stderr
    }
}
