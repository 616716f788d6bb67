//! Non-blocking, newline-terminated line assembly over a serial port.

use embedded_io::{Read, ReadReady, Write};
use heapless::Vec;

/// Line terminator.
pub const LINE_END: u8 = b'\n';

/// Errors reported by [`LineReader::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError<E> {
    /// A line did not fit the buffer. It has been discarded up to and
    /// including its terminator.
    LineTooLong,

    /// The serial port failed.
    Transport(E),
}

impl<E: core::fmt::Debug> core::fmt::Display for LineError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LineError::LineTooLong => write!(f, "line too long"),
            LineError::Transport(err) => write!(f, "serial transport error: {:?}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for LineError<E> {}

/// Accumulates serial bytes into lines of at most `L` bytes.
///
/// Only bytes the port reports as ready are read, so [`poll`](Self::poll)
/// never blocks. A partial line stays buffered across polls; a complete one is
/// handed out once and dropped on the next poll.
pub struct LineReader<const L: usize> {
    buf: Vec<u8, L>,
    complete: bool,
    overflowed: bool,
    echo: bool,
}

impl<const L: usize> LineReader<L> {
    /// Creates an empty reader. With `echo` set, every byte read is written
    /// straight back to the port.
    pub fn new(echo: bool) -> Self {
        Self {
            buf: Vec::new(),
            complete: false,
            overflowed: false,
            echo,
        }
    }

    /// Reads whatever the port has ready, stopping at the first terminator.
    ///
    /// Returns the finished line without its terminator, or `None` if no
    /// terminator has arrived yet. Bytes after the terminator stay in the
    /// port for the next poll.
    pub fn poll<P>(&mut self, port: &mut P) -> Result<Option<&[u8]>, LineError<P::Error>>
    where
        P: Read + ReadReady + Write,
    {
        if self.complete {
            self.buf.clear();
            self.complete = false;
        }

        let mut byte = [0u8; 1];
        while port.read_ready().map_err(LineError::Transport)? {
            if port.read(&mut byte).map_err(LineError::Transport)? == 0 {
                break;
            }
            if self.echo {
                port.write_all(&byte).map_err(LineError::Transport)?;
            }

            if byte[0] == LINE_END {
                if self.overflowed {
                    self.overflowed = false;
                    self.buf.clear();
                    return Err(LineError::LineTooLong);
                }
                self.complete = true;
                return Ok(Some(&self.buf));
            }

            if !self.overflowed && self.buf.push(byte[0]).is_err() {
                self.overflowed = true;
            }
        }

        Ok(None)
    }

    /// Bytes of the line still being assembled.
    pub fn pending(&self) -> &[u8] {
        if self.complete { &[] } else { &self.buf }
    }
}
