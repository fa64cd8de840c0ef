//! Resolution of the pattern to analyse.

use std::fs;
use std::io::{BufRead, Write};

use crate::cli::PatternArgs;
use crate::errors::AppError;

const PROMPT: &str = "Enter a Regular Expression: ";

/// The pattern under analysis and its optional description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PatternSpec {
    pub(crate) pattern: String,
    pub(crate) description: Option<String>,
}

impl PatternSpec {
    /// Parses pattern-file contents: the first line is the pattern and the
    /// second, if present and not blank, the description. Trailing
    /// whitespace is trimmed from both.
    pub(crate) fn from_file_contents(contents: &str) -> Self {
        let mut lines = contents.lines();
        let pattern = lines.next().unwrap_or_default().trim_end().to_owned();
        let description = lines
            .next()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_owned);
        Self {
            pattern,
            description,
        }
    }
}

/// Reads the pattern from `--regex`, `--file`, or, failing both, one line of
/// `stdin` after prompting on `prompt`.
pub(crate) fn resolve_pattern<R, E>(
    args: &PatternArgs,
    stdin: &mut R,
    prompt: &mut E,
) -> Result<PatternSpec, AppError>
where
    R: BufRead,
    E: Write,
{
    if let Some(pattern) = &args.regex {
        return Ok(PatternSpec {
            pattern: pattern.clone(),
            description: None,
        });
    }

    if let Some(path) = &args.file {
        let contents = fs::read_to_string(path).map_err(|source| AppError::ReadPatternFile {
            path: path.clone(),
            source,
        })?;
        return Ok(PatternSpec::from_file_contents(&contents));
    }

    write!(prompt, "{PROMPT}").map_err(AppError::WriteReport)?;
    prompt.flush().map_err(AppError::WriteReport)?;
    let mut line = String::new();
    let read = stdin.read_line(&mut line).map_err(AppError::ReadStdin)?;
    if read == 0 {
        return Err(AppError::MissingPattern);
    }
    Ok(PatternSpec {
        pattern: line.trim_end_matches(['\n', '\r']).to_owned(),
        description: None,
    })
}
