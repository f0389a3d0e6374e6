use super::token::{CSSToken, HashType, Span, Token};

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// CSS tokenizer following the CSS Syntax Module Level 3 specification.
/// Every emitted token records the span of source it covers.
pub struct CSSTokenizer {
    /// The input string being tokenized
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// Offsets at which each line starts (line 1 starts at 0)
    line_starts: Vec<usize>,
    /// Collected tokens
    tokens: Vec<Token>,
}

impl CSSTokenizer {
    /// Create a new CSS tokenizer with the given input.
    pub fn new(input: impl Into<String>) -> Self {
        let input: Vec<char> = input.into().chars().collect();
        let mut line_starts = vec![0];
        for (offset, &c) in input.iter().enumerate() {
            if c == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            input,
            position: 0,
            line_starts,
            tokens: Vec::new(),
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// "This section describes how to consume a token from a stream of code points.
    /// It will return a single token of any type."
    pub fn run(&mut self) {
        loop {
            let start = self.position;
            let kind = self.consume_token();
            let is_eof = kind.is_eof();
            let span = self.span(start, self.position);
            self.tokens.push(Token { kind, span });
            if is_eof {
                break;
            }
        }
    }

    /// Return the collected tokens.
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Build a span, resolving the 1-based line and column of `start`.
    fn span(&self, start: usize, end: usize) -> Span {
        let line_index = self.line_starts.partition_point(|&s| s <= start) - 1;
        Span {
            start,
            end,
            line: line_index + 1,
            column: start - self.line_starts[line_index] + 1,
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> CSSToken {
        // Comments are surfaced as tokens rather than skipped.
        if self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            return self.consume_comment();
        }

        // "Consume the next input code point."
        let Some(c) = self.consume() else {
            return CSSToken::EOF;
        };

        match c {
            // "whitespace"
            // "Consume as much whitespace as possible. Return a <whitespace-token>."
            c if is_whitespace(c) => {
                self.consume_whitespace();
                CSSToken::Whitespace
            }

            // "U+0022 QUOTATION MARK (")" / "U+0027 APOSTROPHE (')"
            // "Consume a string token and return it."
            '"' | '\'' => self.consume_string_token(c),

            // "U+0023 NUMBER SIGN (#)"
            '#' => {
                // "If the next input code point is an ident code point or the next
                // two input code points are a valid escape..."
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    // "If the next 3 input code points would start an ident sequence,
                    // set the <hash-token>'s type flag to 'id'."
                    let hash_type = if self.would_start_ident_sequence() {
                        HashType::Id
                    } else {
                        HashType::Unrestricted
                    };
                    let value = self.consume_ident_sequence();
                    CSSToken::Hash { value, hash_type }
                } else {
                    CSSToken::Delim('#')
                }
            }

            '(' => CSSToken::LeftParen,
            ')' => CSSToken::RightParen,

            // "U+002B PLUS SIGN (+)"
            '+' => {
                if self.would_start_number_with(Some('+')) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CSSToken::Delim('+')
                }
            }

            ',' => CSSToken::Comma,

            // "U+002D HYPHEN-MINUS (-)"
            '-' => {
                if self.would_start_number_with(Some('-')) {
                    self.reconsume();
                    self.consume_numeric_token()
                }
                // "Otherwise, if the next 2 input code points are U+002D U+003E (->)..."
                else if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
                    let _ = self.consume();
                    let _ = self.consume();
                    CSSToken::CDC
                }
                // "Otherwise, if the input stream starts with an ident sequence..."
                else if self.would_start_ident_sequence_with(Some('-')) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CSSToken::Delim('-')
                }
            }

            // "U+002E FULL STOP (.)"
            '.' => {
                if self.would_start_number_with(Some('.')) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CSSToken::Delim('.')
                }
            }

            ':' => CSSToken::Colon,
            ';' => CSSToken::Semicolon,

            // "U+003C LESS-THAN SIGN (<)"
            '<' => {
                if self.peek() == Some('!')
                    && self.peek_at(1) == Some('-')
                    && self.peek_at(2) == Some('-')
                {
                    let _ = self.consume();
                    let _ = self.consume();
                    let _ = self.consume();
                    CSSToken::CDO
                } else {
                    CSSToken::Delim('<')
                }
            }

            // "U+0040 COMMERCIAL AT (@)"
            '@' => {
                if self.would_start_ident_sequence() {
                    CSSToken::AtKeyword(self.consume_ident_sequence())
                } else {
                    CSSToken::Delim('@')
                }
            }

            '[' => CSSToken::LeftBracket,

            // "U+005C REVERSE SOLIDUS (\)"
            '\\' => {
                if is_valid_escape(Some('\\'), self.peek()) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    // "This is a parse error."
                    CSSToken::Delim('\\')
                }
            }

            ']' => CSSToken::RightBracket,
            '{' => CSSToken::LeftBrace,
            '}' => CSSToken::RightBrace,

            // "digit"
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }

            // "ident-start code point"
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            // "anything else"
            c => CSSToken::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// "consume them and all following code points up to and including the first
    /// U+002A ASTERISK (*) followed by U+002F SOLIDUS (/), or up to an EOF code point."
    fn consume_comment(&mut self) -> CSSToken {
        let _ = self.consume(); // /
        let _ = self.consume(); // *

        let mut text = String::new();
        loop {
            match self.consume() {
                Some('*') if self.peek() == Some('/') => {
                    let _ = self.consume();
                    break;
                }
                Some(c) => text.push(c),
                None => break,
            }
        }
        CSSToken::Comment(text)
    }

    /// Consume whitespace characters.
    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending_code_point: char) -> CSSToken {
        let mut value = String::new();

        loop {
            match self.consume() {
                // "ending code point" / "EOF"
                Some(c) if c == ending_code_point => return CSSToken::String(value),
                None => return CSSToken::String(value),

                // "newline"
                // "This is a parse error. Reconsume the current input code point,
                // create a <bad-string-token>, and return it."
                Some('\n') => {
                    self.reconsume();
                    return CSSToken::BadString;
                }

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n') => {
                        let _ = self.consume();
                    }
                    Some(_) => {
                        if let Some(c) = self.consume_escaped_code_point() {
                            value.push(c);
                        }
                    }
                },

                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.5 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> CSSToken {
        let value = self.consume_number();

        if self.would_start_ident_sequence() {
            let unit = self.consume_ident_sequence();
            CSSToken::Dimension { value, unit }
        } else if self.peek() == Some('%') {
            let _ = self.consume();
            CSSToken::Percentage(value)
        } else {
            CSSToken::Number(value)
        }
    }

    /// [§ 4.3.6 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> CSSToken {
        let string = self.consume_ident_sequence();

        // "If string's value is an ASCII case-insensitive match for 'url',
        // and the next input code point is U+0028 LEFT PARENTHESIS (()"
        if string.eq_ignore_ascii_case("url") && self.peek() == Some('(') {
            let _ = self.consume();
            let mark = self.position;
            self.consume_whitespace();

            // Quoted urls are plain functions; the string is its own token.
            if matches!(self.peek(), Some('"' | '\'')) {
                self.position = mark;
                CSSToken::Function(string)
            } else {
                self.consume_url_token()
            }
        } else if self.peek() == Some('(') {
            let _ = self.consume();
            CSSToken::Function(string)
        } else {
            CSSToken::Ident(string)
        }
    }

    /// [§ 4.3.7 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url_token(&mut self) -> CSSToken {
        let mut value = String::new();
        self.consume_whitespace();

        loop {
            match self.consume() {
                Some(')') | None => return CSSToken::Url(value),

                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    return match self.peek() {
                        Some(')') => {
                            let _ = self.consume();
                            CSSToken::Url(value)
                        }
                        None => CSSToken::Url(value),
                        _ => {
                            self.consume_bad_url_remnants();
                            CSSToken::BadUrl
                        }
                    };
                }

                // "This is a parse error. Consume the remnants of a bad url..."
                Some('"' | '\'' | '(') => {
                    self.consume_bad_url_remnants();
                    return CSSToken::BadUrl;
                }

                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        if let Some(c) = self.consume_escaped_code_point() {
                            value.push(c);
                        }
                    } else {
                        self.consume_bad_url_remnants();
                        return CSSToken::BadUrl;
                    }
                }

                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.consume() {
                Some(')') | None => return,
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    let _ = self.consume_escaped_code_point();
                }
                _ => {}
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();

        loop {
            match self.consume() {
                Some(c) if is_ident_code_point(c) => result.push(c),
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    if let Some(c) = self.consume_escaped_code_point() {
                        result.push(c);
                    }
                }
                Some(_) => {
                    self.reconsume();
                    return result;
                }
                None => return result,
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Returns the number's representation exactly as written.
    fn consume_number(&mut self) -> String {
        let mut repr = String::new();

        if matches!(self.peek(), Some('+' | '-')) {
            self.push_next(&mut repr);
        }
        self.push_digits(&mut repr);

        // "If the next 2 input code points are U+002E FULL STOP (.) followed by a digit..."
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.push_next(&mut repr);
            self.push_digits(&mut repr);
        }

        // "If the next 2 or 3 input code points are U+0045 (E) or U+0065 (e),
        // optionally followed by U+002D (-) or U+002B (+), followed by a digit..."
        if matches!(self.peek(), Some('e' | 'E')) {
            let has_sign = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_pos = if has_sign { 2 } else { 1 };
            if self.peek_at(digit_pos).is_some_and(|c| c.is_ascii_digit()) {
                self.push_next(&mut repr);
                if has_sign {
                    self.push_next(&mut repr);
                }
                self.push_digits(&mut repr);
            }
        }

        repr
    }

    /// [§ 4.3.13 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    fn consume_escaped_code_point(&mut self) -> Option<char> {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = c.to_string();
                // "Consume as many hex digits as possible, but no more than 5."
                for _ in 0..5 {
                    if self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                        self.push_next(&mut hex);
                    } else {
                        break;
                    }
                }
                if self.peek().is_some_and(is_whitespace) {
                    let _ = self.consume();
                }
                let code_point = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
                if code_point == 0 || (0xD800..=0xDFFF).contains(&code_point) {
                    Some('\u{FFFD}')
                } else {
                    Some(char::from_u32(code_point).unwrap_or('\u{FFFD}'))
                }
            }
            // "EOF" - "This is a parse error. Return U+FFFD REPLACEMENT CHARACTER."
            None => Some('\u{FFFD}'),
            Some(c) => Some(c),
        }
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn would_start_ident_sequence(&self) -> bool {
        starts_ident_sequence(self.peek(), self.peek_at(1), self.peek_at(2))
    }

    /// Same check, where `first` has already been consumed and the stream
    /// continues at `peek()`.
    fn would_start_ident_sequence_with(&self, first: Option<char>) -> bool {
        starts_ident_sequence(first, self.peek(), self.peek_at(1))
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    ///
    /// `first` is the code point that was just consumed.
    fn would_start_number_with(&self, first: Option<char>) -> bool {
        match first {
            Some('+' | '-') => {
                let second = self.peek();
                if second.is_some_and(|c| c.is_ascii_digit()) {
                    return true;
                }
                second == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
            }
            Some('.') => self.peek().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    /// Consume the next character and append it to `buffer`.
    fn push_next(&mut self, buffer: &mut String) {
        if let Some(c) = self.consume() {
            buffer.push(c);
        }
    }

    /// Consume a run of ASCII digits into `buffer`.
    fn push_digits(&mut self, buffer: &mut String) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.push_next(buffer);
        }
    }

    /// Consume and return the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Put back the last consumed character.
    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Peek at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Peek at a character at an offset from current position.
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// Tokenize `input` in one call.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = CSSTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
fn starts_ident_sequence(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        // "U+002D HYPHEN-MINUS"
        // "If the second code point is an ident-start code point or a U+002D
        // HYPHEN-MINUS, or the second and third code points are a valid escape,
        // return true."
        Some('-') => {
            second.is_some_and(is_ident_start_code_point)
                || second == Some('-')
                || is_valid_escape(second, third)
        }
        Some(c) if is_ident_start_code_point(c) => true,
        Some('\\') => is_valid_escape(first, second),
        _ => false,
    }
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second != Some('\n')
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
///
/// "A newline, U+0009 CHARACTER TABULATION, or U+0020 SPACE."
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}
