//! Line-oriented form input.
//!
//! Numeric entries are clamped at entry: blanks and unparseable text take
//! the default, negatives become zero.

use std::io::{self, BufRead, Write};

/// Reads answers from `input`, writing prompts to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Prompt and read one trimmed line. `None` at end of input.
    pub fn line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    /// Text with a default for blank answers
    pub fn text(&mut self, prompt: &str, default: &str) -> io::Result<String> {
        let answer = self.line(&format!("{} [{}]: ", prompt, default))?;
        Ok(match answer {
            Some(s) if !s.is_empty() => s,
            _ => default.to_string(),
        })
    }

    /// Non-negative number; blank or invalid keeps `default`
    pub fn number(&mut self, prompt: &str, default: f64) -> io::Result<f64> {
        let answer = self.line(&format!("{} [{}]: ", prompt, default))?;
        let value = answer
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(default);
        Ok(value.max(0.0))
    }

    /// Optional non-negative number; blank means `None`
    pub fn optional_number(&mut self, prompt: &str) -> io::Result<Option<f64>> {
        let answer = self.line(&format!("{} [none]: ", prompt))?;
        Ok(answer
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map(|v| v.max(0.0))
            .filter(|v| *v > 0.0))
    }

    /// Whole number of at least `min`
    pub fn count(&mut self, prompt: &str, default: u32, min: u32) -> io::Result<u32> {
        let answer = self.line(&format!("{} [{}]: ", prompt, default))?;
        let value = answer
            .and_then(|s| s.parse::<i64>().ok())
            .map(|v| v.clamp(0, u32::MAX as i64) as u32)
            .unwrap_or(default);
        Ok(value.max(min))
    }

    /// y/n question
    pub fn yes_no(&mut self, prompt: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        let answer = self.line(&format!("{} [{}]: ", prompt, hint))?;
        Ok(match answer.as_deref().map(str::to_lowercase).as_deref() {
            Some("y") | Some("yes") => true,
            Some("n") | Some("no") => false,
            _ => default,
        })
    }

    /// Pick from `options` by 1-based number or by a parser on free text.
    /// Blank or unrecognized input keeps `default`.
    pub fn select<T: Copy + std::fmt::Display + PartialEq>(
        &mut self,
        prompt: &str,
        options: &[T],
        default: T,
        parse: impl Fn(&str) -> Option<T>,
    ) -> io::Result<T> {
        let listing: Vec<String> = options
            .iter()
            .enumerate()
            .map(|(i, option)| format!("{}={}", i + 1, option))
            .collect();
        let answer = self.line(&format!("{} ({}) [{}]: ", prompt, listing.join(", "), default))?;

        let Some(answer) = answer.filter(|s| !s.is_empty()) else {
            return Ok(default);
        };
        if let Ok(index) = answer.parse::<usize>() {
            if (1..=options.len()).contains(&index) {
                return Ok(options[index - 1]);
            }
        }
        Ok(parse(&answer).unwrap_or(default))
    }

    /// Writer for messages between prompts
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }
}
