use crate::error::ReadOutcome;
use log::debug;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, BufRead, ErrorKind, Write};
use std::path::PathBuf;

/// Bytes reserved each time the line buffer runs out of room.
pub const LINE_CHUNK: usize = 8192;

/// A source of command lines.
pub trait LineSource {
    /// Shows `prompt` (if non-empty) and returns the raw bytes of the next
    /// line without its trailing newline.
    fn read_line(&mut self, prompt: &str) -> Result<Vec<u8>, ReadOutcome>;
}

/// Reads lines from any buffered byte stream, writing prompts to `output`.
pub struct StreamReader<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StreamReader<R, W> {
    pub fn new(input: R, output: W) -> Self {
        StreamReader { input, output }
    }
}

impl<R: BufRead, W: Write> LineSource for StreamReader<R, W> {
    /// A final line that ends at end of input without a newline is returned
    /// as a complete line; only an end of input with nothing buffered is
    /// reported as `EndOfFile`.
    fn read_line(&mut self, prompt: &str) -> Result<Vec<u8>, ReadOutcome> {
        if !prompt.is_empty() {
            self.output.write_all(prompt.as_bytes())?;
            self.output.flush()?;
        }

        let mut line: Vec<u8> = Vec::new();
        loop {
            let (used, complete) = {
                let available = match self.input.fill_buf() {
                    Ok(available) => available,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(ReadOutcome::Io(e)),
                };
                if available.is_empty() {
                    if line.is_empty() {
                        return Err(ReadOutcome::EndOfFile);
                    }
                    break;
                }
                let (chunk, used, complete) = match available.iter().position(|&b| b == b'\n') {
                    Some(end) => (&available[..end], end + 1, true),
                    None => (available, available.len(), false),
                };
                if line.capacity() - line.len() < chunk.len() {
                    line.try_reserve(chunk.len().max(LINE_CHUNK))?;
                }
                line.extend_from_slice(chunk);
                (used, complete)
            };
            self.input.consume(used);
            if complete {
                break;
            }
        }

        Ok(line)
    }
}

/// Interactive line editing with history, for terminals.
pub struct EditorReader {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl EditorReader {
    pub fn new(history: Option<PathBuf>) -> rustyline::Result<Self> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &history {
            if let Err(err) = editor.load_history(path) {
                debug!("no history loaded from {}: {}", path.display(), err);
            }
        }
        Ok(EditorReader { editor, history })
    }
}

impl LineSource for EditorReader {
    fn read_line(&mut self, prompt: &str) -> Result<Vec<u8>, ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        debug!("history entry dropped: {}", err);
                    }
                }
                Ok(line.into_bytes())
            }
            Err(ReadlineError::Eof) => Err(ReadOutcome::EndOfFile),
            // Ctrl-C at the prompt abandons the current line.
            Err(ReadlineError::Interrupted) => Ok(Vec::new()),
            Err(ReadlineError::Io(e)) => Err(ReadOutcome::Io(e)),
            Err(err) => Err(ReadOutcome::Io(io::Error::new(ErrorKind::Other, err.to_string()))),
        }
    }
}

impl Drop for EditorReader {
    fn drop(&mut self) {
        if let Some(path) = &self.history {
            if let Err(err) = self.editor.save_history(path) {
                debug!("could not save history to {}: {}", path.display(), err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};

    fn reader(input: &[u8]) -> StreamReader<Cursor<Vec<u8>>, Vec<u8>> {
        StreamReader::new(Cursor::new(input.to_vec()), Vec::new())
    }

    #[test]
    fn test_reads_lines_without_newline() {
        let mut r = reader(b"ls -l\ncd /\n");
        assert_eq!(r.read_line("").unwrap(), b"ls -l");
        assert_eq!(r.read_line("").unwrap(), b"cd /");
        assert!(matches!(r.read_line(""), Err(ReadOutcome::EndOfFile)));
    }

    #[test]
    fn test_empty_line_is_not_eof() {
        let mut r = reader(b"\n\nexit\n");
        assert_eq!(r.read_line("").unwrap(), b"");
        assert_eq!(r.read_line("").unwrap(), b"");
        assert_eq!(r.read_line("").unwrap(), b"exit");
    }

    #[test]
    fn test_immediate_eof() {
        let mut r = reader(b"");
        assert!(matches!(r.read_line(""), Err(ReadOutcome::EndOfFile)));
    }

    #[test]
    fn test_last_line_without_newline_is_accepted() {
        let mut r = reader(b"whoami\nexit 3");
        assert_eq!(r.read_line("").unwrap(), b"whoami");
        assert_eq!(r.read_line("").unwrap(), b"exit 3");
        assert!(matches!(r.read_line(""), Err(ReadOutcome::EndOfFile)));
    }

    #[test]
    fn test_prompt_is_written() {
        let mut r = reader(b"help\n");
        r.read_line("user:~/tmp $ ").unwrap();
        assert_eq!(r.output, b"user:~/tmp $ ");
    }

    #[test]
    fn test_long_line_spanning_many_buffers() {
        let long = "x".repeat(LINE_CHUNK * 3 + 17);
        let input = format!("{}\nnext\n", long);
        // A tiny BufReader forces the line to arrive in many small pieces.
        let mut r = StreamReader::new(BufReader::with_capacity(7, input.as_bytes()), io::sink());
        assert_eq!(r.read_line("").unwrap(), long.as_bytes());
        assert_eq!(r.read_line("").unwrap(), b"next");
    }

    #[test]
    fn test_non_utf8_bytes_are_kept() {
        let mut r = reader(b"cd caf\xe9\necho \xff\xfe");
        assert_eq!(r.read_line("").unwrap(), b"cd caf\xe9");
        assert_eq!(r.read_line("").unwrap(), b"echo \xff\xfe");
    }

    struct FailingInput;

    impl Read for FailingInput {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "device gone"))
        }
    }

    #[test]
    fn test_read_error_is_reported() {
        let mut r = StreamReader::new(BufReader::new(FailingInput), io::sink());
        match r.read_line("") {
            Err(ReadOutcome::Io(e)) => assert_eq!(e.to_string(), "device gone"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
