use crate::error::Ls8Error;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read an LS-8 source file and return the program bytes.
///
/// The format is one instruction per line: a base-2 literal in [0, 255],
/// optionally followed by a `#` comment. Blank and comment-only lines are
/// skipped and do not consume an address.
pub fn load_program(path: &Path) -> Result<Vec<u8>, Ls8Error> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Ls8Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let program = parse_source(&source)?;
    debug!("parsed {} instruction bytes from {}", program.len(), path.display());
    Ok(program)
}

/// Parse LS-8 source text into program bytes
pub fn parse_source(source: &str) -> Result<Vec<u8>, Ls8Error> {
    let mut program = Vec::new();

    for (index, raw_line) in source.lines().enumerate() {
        let text = match raw_line.find('#') {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        }
        .trim();

        if text.is_empty() {
            continue;
        }

        let value = u8::from_str_radix(text, 2).map_err(|_| Ls8Error::InvalidLiteral {
            line: index + 1,
            text: text.to_string(),
        })?;
        program.push(value);
    }

    Ok(program)
}
