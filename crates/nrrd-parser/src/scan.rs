//! Header/body boundary detection.
//!
//! The header ends at the first `\r\n\r\n` or `\n\n` sequence. The scan is
//! a five-state machine driven one byte at a time; a backslash escapes the
//! byte that follows it (including a literal line terminator), so escaped
//! content can never produce a false boundary.

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const ESCAPE: u8 = b'\\';

/// Scanner states. Each state encodes the terminator prefix seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Waiting for the first CR or LF.
    Start,
    /// Seen CR, waiting for its paired LF.
    Cr,
    /// Seen CRLF, waiting for a second CR.
    CrLf,
    /// Seen CRLFCR, waiting for the LF that completes CRLFCRLF.
    CrLfCr,
    /// Seen LF, waiting for a second consecutive LF.
    Lf,
}

/// Outcome of feeding one byte to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue(ScanState),
    Terminated,
}

/// The single transition function of the scanner.
fn step(state: ScanState, byte: u8) -> Step {
    use ScanState::*;
    match state {
        Start => match byte {
            CR => Step::Continue(Cr),
            LF => Step::Continue(Lf),
            _ => Step::Continue(Start),
        },
        Cr => match byte {
            LF => Step::Continue(CrLf),
            _ => Step::Continue(Start),
        },
        CrLf => match byte {
            CR => Step::Continue(CrLfCr),
            _ => Step::Continue(Start),
        },
        CrLfCr => match byte {
            LF => Step::Terminated,
            _ => Step::Continue(Start),
        },
        Lf => match byte {
            LF => Step::Terminated,
            _ => Step::Continue(Start),
        },
    }
}

/// Locate the end of the header in `data`.
///
/// Returns the exclusive offset of the byte just past the terminator, i.e.
/// the offset at which the compressed body starts. Returns `None` when the
/// buffer holds no unescaped terminator.
pub fn header_length(data: &[u8]) -> Option<usize> {
    let mut state = ScanState::Start;
    let mut cursor = 0;
    while cursor < data.len() {
        let byte = data[cursor];
        cursor += 1;
        if byte == ESCAPE {
            // The escaped byte is consumed without a state transition.
            cursor += 1;
            continue;
        }
        match step(state, byte) {
            Step::Continue(next) => state = next,
            Step::Terminated => return Some(cursor),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_terminator() {
        // Boundary is the index just past the second LF.
        assert_eq!(header_length(b"a\r\n\r\nb"), Some(5));
    }

    #[test]
    fn test_lf_terminator() {
        assert_eq!(header_length(b"a\n\nb"), Some(3));
    }

    #[test]
    fn test_no_terminator() {
        assert_eq!(header_length(b"no blank line in sight\n"), None);
        assert_eq!(header_length(b""), None);
    }

    #[test]
    fn test_escaped_terminator_is_skipped() {
        // The backslash consumes the first CR, so the first CRLFCRLF run
        // is broken and only the later unescaped terminator matches.
        let data = b"a\\\r\n\r\nstill header\n\nb";
        assert_eq!(header_length(data), Some(20));
    }

    #[test]
    fn test_escape_at_end_of_buffer() {
        // A trailing escape consumes the (absent) next byte and the scan
        // just runs out of input.
        assert_eq!(header_length(b"abc\\"), None);
    }

    #[test]
    fn test_interrupted_sequences_reset() {
        // CR followed by anything but LF resets to the initial state.
        assert_eq!(header_length(b"a\rb\n\nc"), Some(5));
        // CRLF followed by a regular byte resets as well.
        assert_eq!(header_length(b"a\r\nb\r\n\r\nc"), Some(8));
        // LF + non-LF resets the LF state.
        assert_eq!(header_length(b"a\nb\n\nc"), Some(5));
    }

    #[test]
    fn test_state_transitions() {
        use ScanState::*;
        assert_eq!(step(Start, b'\r'), Step::Continue(Cr));
        assert_eq!(step(Start, b'\n'), Step::Continue(Lf));
        assert_eq!(step(Start, b'x'), Step::Continue(Start));
        assert_eq!(step(Cr, b'\n'), Step::Continue(CrLf));
        assert_eq!(step(Cr, b'\r'), Step::Continue(Start));
        assert_eq!(step(CrLf, b'\r'), Step::Continue(CrLfCr));
        assert_eq!(step(CrLf, b'x'), Step::Continue(Start));
        assert_eq!(step(CrLfCr, b'\n'), Step::Terminated);
        assert_eq!(step(CrLfCr, b'x'), Step::Continue(Start));
        assert_eq!(step(Lf, b'\n'), Step::Terminated);
        assert_eq!(step(Lf, b'x'), Step::Continue(Start));
    }
}
