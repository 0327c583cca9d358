//! Splitting script files into executable statements

use sqlparser::tokenizer::{Token, Tokenizer};

use crate::dialect::SqlDialect;
use crate::error::{SqlError, SqlResult};

/// Split script text into statements.
///
/// Dialects with a batch separator (SQL Server's `GO`) are split on separator
/// lines and each batch is kept whole. Otherwise the text is tokenized with the
/// dialect's tokenizer and split on top-level `;`, so semicolons inside string
/// literals, quoted identifiers and comments are left alone. Pieces holding
/// only whitespace or comments are dropped. Statement text is returned as it
/// appears in the script, without the trailing `;`.
pub fn split_statements(dialect: &dyn SqlDialect, text: &str) -> SqlResult<Vec<String>> {
    if let Some(separator) = dialect.batch_separator() {
        return Ok(split_batches(text, separator));
    }

    let tokens = Tokenizer::new(dialect.parser_dialect(), text)
        .tokenize_with_location()
        .map_err(|e| SqlError::Tokenize(e.to_string()))?;

    let offsets = LineOffsets::new(text);
    let mut statements = Vec::new();
    let mut start = 0usize;
    let mut has_content = false;

    for token in &tokens {
        match &token.token {
            Token::SemiColon => {
                let end = offsets.byte_offset(
                    token.span.start.line as usize,
                    token.span.start.column as usize,
                );
                if has_content {
                    statements.push(text[start..end].trim().to_string());
                }
                start = end + 1;
                has_content = false;
            }
            Token::Whitespace(_) | Token::EOF => {}
            _ => has_content = true,
        }
    }

    if has_content && start < text.len() {
        statements.push(text[start..].trim().to_string());
    }

    log::debug!(
        "Split script into {} statement(s) using {}",
        statements.len(),
        dialect.name()
    );
    Ok(statements)
}

/// Split on lines consisting only of the separator keyword (case-insensitive)
fn split_batches(text: &str, separator: &str) -> Vec<String> {
    let mut batches = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().eq_ignore_ascii_case(separator) {
            push_batch(&mut batches, &current);
            current.clear();
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    push_batch(&mut batches, &current);
    batches
}

fn push_batch(batches: &mut Vec<String>, batch: &str) {
    let trimmed = batch.trim();
    if !trimmed.is_empty() {
        batches.push(trimmed.to_string());
    }
}

/// Maps 1-based (line, column) token locations back to byte offsets
struct LineOffsets<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineOffsets<'a> {
    fn new(text: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, starts }
    }

    fn byte_offset(&self, line: usize, column: usize) -> usize {
        let line_start = self
            .starts
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(self.text.len());
        self.text[line_start..]
            .char_indices()
            .nth(column.saturating_sub(1))
            .map(|(i, _)| line_start + i)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
