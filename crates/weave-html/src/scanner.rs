//! Character-level cursor over the markup input.
//!
//! Positions are byte offsets into the input. The scanner only stops at
//! ASCII structural characters or after whole characters, so every offset it
//! hands out is a UTF-8 boundary.

/// Carriage returns and line feeds seen while skipping whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineBreaks {
    pub cr: usize,
    pub lf: usize,
}

pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub const fn pos(&self) -> usize {
        self.pos
    }

    pub const fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Whether the character just before the cursor is `c`.
    pub fn preceded_by(&self, c: char) -> bool {
        self.input[..self.pos].ends_with(c)
    }

    /// Consume the run of text up to (not including) the next `<`.
    pub fn take_text(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest.find('<').unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// The input consumed since byte offset `start`.
    pub fn since(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }

    pub fn skip_blank(&mut self) {
        let _ = self.skip_whitespace();
    }

    /// Skip whitespace, counting the line breaks crossed.
    pub fn skip_whitespace(&mut self) -> LineBreaks {
        let mut breaks = LineBreaks::default();
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            match c {
                '\r' => breaks.cr += 1,
                '\n' => breaks.lf += 1,
                _ => {}
            }
            self.pos += c.len_utf8();
        }
        breaks
    }

    /// Consume everything through the next `needle`, or to the end of input.
    ///
    /// Returns the consumed slice (needle included) and whether the needle
    /// was found.
    pub fn take_through(&mut self, needle: &str) -> (&'a str, bool) {
        let rest = self.rest();
        match rest.find(needle) {
            Some(i) => {
                let end = i + needle.len();
                self.pos += end;
                (&rest[..end], true)
            }
            None => {
                self.pos = self.input.len();
                (rest, false)
            }
        }
    }

    /// Consume one word: a quoted string (quotes kept) or a run of
    /// characters up to whitespace, `<`, `>`, `=` or `/>`.
    ///
    /// Inside quotes, a quote character preceded by a backslash does not end
    /// the word. An unterminated quote runs to the end of input.
    pub fn word(&mut self) -> &'a str {
        let start = self.pos;
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut prev = quote;
                while let Some(c) = self.bump() {
                    if c == quote && prev != '\\' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => {
                while let Some(c) = self.peek() {
                    if c.is_whitespace()
                        || matches!(c, '<' | '>' | '=')
                        || self.starts_with("/>")
                    {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
            }
        }
        &self.input[start..self.pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_stops_at_structural_characters() {
        let mut s = Scanner::new("br/>");
        assert_eq!(s.word(), "br");
        assert!(s.starts_with("/>"));

        let mut s = Scanner::new("a/b=c");
        assert_eq!(s.word(), "a/b");
        assert_eq!(s.peek(), Some('='));
    }

    #[test]
    fn quoted_word_keeps_quotes_and_escapes() {
        let mut s = Scanner::new(r#""say \"hi\"" rest"#);
        assert_eq!(s.word(), r#""say \"hi\"""#);
        assert_eq!(s.peek(), Some(' '));

        let mut s = Scanner::new("'open");
        assert_eq!(s.word(), "'open");
        assert!(s.at_end());
    }

    #[test]
    fn whitespace_counts_line_breaks() {
        let mut s = Scanner::new(" \r\n\t\nx");
        assert_eq!(s.skip_whitespace(), LineBreaks { cr: 1, lf: 2 });
        assert_eq!(s.peek(), Some('x'));
    }

    #[test]
    fn take_through_missing_needle_consumes_rest() {
        let mut s = Scanner::new("abc-->def");
        assert_eq!(s.take_through("-->"), ("abc-->", true));
        assert_eq!(s.take_through("-->"), ("def", false));
        assert!(s.at_end());
    }

    #[test]
    fn multibyte_text_is_sliced_on_boundaries() {
        let mut s = Scanner::new("héllo<b>");
        assert_eq!(s.take_text(), "héllo");
        assert_eq!(s.bump(), Some('<'));
        assert!(s.preceded_by('<'));
    }
}
