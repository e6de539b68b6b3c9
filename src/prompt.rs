//! Line-prompt front end.
//!
//! Asks for each option in turn on `output` and reads one answer per line from `input`.
//! Empty answers keep the default. Generic over the streams so it runs the same against a
//! terminal or an in-memory script.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_BACK_COLOR, DEFAULT_ERROR_CORRECTION, DEFAULT_FILENAME, DEFAULT_FILL_COLOR,
    DEFAULT_FORMAT, DEFAULT_VERSION,
};
use crate::qrcode::Version;
use crate::request::ComposeOptions;

/// Runs the full question sequence and returns the collected options.
///
/// # Errors
///
/// Fails on I/O errors, or with [`io::ErrorKind::UnexpectedEof`] if input ends before a
/// non-empty URL was given. Input ending later just leaves the remaining defaults in place.
pub fn collect_options<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<ComposeOptions> {
    writeln!(output, "Welcome to the QR Code Generator!")?;

    let text = loop {
        match ask(&mut input, &mut output, "Enter the URL to encode in the QR code: ")? {
            Some(url) if !url.trim().is_empty() => break url,
            Some(_) => writeln!(output, "The URL cannot be empty.")?,
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input ended before a URL was entered",
                ))
            }
        }
    };

    let fill_color = ask_optional(
        &mut input,
        &mut output,
        &format!("Enter the fill color (default is {DEFAULT_FILL_COLOR}): "),
    )?;
    let back_color = ask_optional(
        &mut input,
        &mut output,
        &format!("Enter the background color (default is {DEFAULT_BACK_COLOR}): "),
    )?;
    let destination = ask_optional(
        &mut input,
        &mut output,
        &format!("Enter the filename to save the QR code image (default is {DEFAULT_FILENAME}): "),
    )?
    .map(PathBuf::from);

    let version = loop {
        let answer = ask_optional(
            &mut input,
            &mut output,
            &format!("Enter the QR code version (1-40, default is {DEFAULT_VERSION}): "),
        )?;
        match answer {
            None => break None,
            Some(v) => match v.trim().parse::<u32>().ok().filter(|&n| Version::checked(n).is_some()) {
                Some(n) => break Some(n),
                None => writeln!(output, "Please enter a whole number from 1 to 40.")?,
            },
        }
    };

    let error_correction = ask_optional(
        &mut input,
        &mut output,
        &format!("Enter the error correction level (L, M, Q, H, default is {DEFAULT_ERROR_CORRECTION}): "),
    )?;
    let logo = ask_optional(&mut input, &mut output, "Enter the path to a logo image (optional): ")?
        .map(PathBuf::from);
    let format = ask_optional(
        &mut input,
        &mut output,
        &format!("Enter the output format (PNG, JPEG, etc., default is {DEFAULT_FORMAT}): "),
    )?;
    let frame_text = ask_optional(
        &mut input,
        &mut output,
        "Enter the text to display on the frame (optional): ",
    )?;

    Ok(ComposeOptions {
        text,
        destination,
        fill_color,
        back_color,
        version,
        error_correction,
        logo,
        format,
        frame_text,
        ..ComposeOptions::default()
    })
}

/// Prints `question` and reads one line without its line ending. `None` means end of input.
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<Option<String>> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Like [`ask`], but empty answers and end of input both mean "keep the default".
fn ask_optional<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str
) -> io::Result<Option<String>> {
    Ok(ask(input, output, question)?.filter(|answer| !answer.is_empty()))
}
