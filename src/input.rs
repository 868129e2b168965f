//! Reading the list of URLs to fetch.

use std::io::{self, BufRead, Write};

use itertools::Itertools;

pub const PROMPT: &str = "Please enter one or more image URLs (comma separated): ";

/// Splits a comma separated line into trimmed, non-empty URLs.
pub fn parse_url_list(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(String::from)
        .collect_vec()
}

/// Writes [`PROMPT`] to `output` and parses one line from `input`.
pub fn prompt_urls<R, W>(input: &mut R, output: &mut W) -> io::Result<Vec<String>>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(parse_url_list(&line))
}
