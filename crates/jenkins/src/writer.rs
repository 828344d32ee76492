//! Indented Groovy text assembly.

/// Builds brace-delimited, four-space-indented Groovy text.
#[derive(Debug, Default)]
pub struct GroovyWriter {
    out: String,
    depth: usize,
}

impl GroovyWriter {
    /// Empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one indented line.
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Open a `head {` block.
    pub fn open(&mut self, head: &str) {
        self.line(&format!("{head} {{"));
        self.depth += 1;
    }

    /// Close the innermost block.
    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    /// The assembled text.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }
}

/// Render a Groovy single-quoted string, escaping backslashes and quotes.
#[must_use]
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            other => quoted.push(other),
        }
    }
    quoted.push('\'');
    quoted
}

/// Render a Groovy triple-single-quoted string for multiline content.
#[must_use]
pub fn quote_multiline(text: &str) -> String {
    format!("'''{}'''", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nesting_indents_by_four() {
        let mut w = GroovyWriter::new();
        w.open("pipeline");
        w.open("stages");
        w.line("sh 'make'");
        w.close();
        w.close();
        assert_eq!(
            w.finish(),
            "pipeline {\n    stages {\n        sh 'make'\n    }\n}\n"
        );
    }

    #[test]
    fn quoting_escapes_quotes_and_backslashes() {
        assert_eq!(quote("it's"), r"'it\'s'");
        assert_eq!(quote(r"a\b"), r"'a\\b'");
    }

    #[test]
    fn unbalanced_close_does_not_underflow() {
        let mut w = GroovyWriter::new();
        w.close();
        assert_eq!(w.finish(), "}\n");
    }
}
