//! Selector tokenizer following [CSS Syntax Module Level 3](https://www.w3.org/TR/css-syntax-3/).

use crate::error::Error;

use super::token::{Token, TokenFlag, TokenKind};

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// A pull-based tokenizer over a selector string. Each call to
/// [`Tokenizer::next_token`] consumes exactly one token from an internal
/// byte cursor; emitted tokens are never re-derived from a different offset.
/// Pushback is the parser's responsibility, not the tokenizer's.
///
/// Unlike a stylesheet tokenizer there is no recovery: the first malformed
/// construct (unterminated string, bad URL) is a hard error carrying its
/// byte offset. Requesting tokens past the end of input keeps returning EOF.
pub struct Tokenizer {
    /// The selector string being tokenized. Holding `String` means invalid
    /// UTF-8 is unrepresentable here.
    input: String,
    /// Byte offset of the next code point to consume.
    pos: usize,
    /// Byte offset where the token currently being consumed started.
    start: usize,
}

impl Tokenizer {
    /// Create a tokenizer over the given selector text.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            pos: 0,
            start: 0,
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// "This section describes how to consume a token from a stream of code
    /// points. It will return a single token of any type."
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenize`] on malformed input; tokenization stops at
    /// the first error.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(Token::eof(self.pos));
        };

        match c {
            // "whitespace"
            // "Consume as much whitespace as possible. Return a
            // <whitespace-token>."
            c if is_whitespace(c) => {
                self.consume_whitespace();
                Ok(self.make(TokenKind::Whitespace, self.raw()))
            }

            // "U+0022 QUOTATION MARK (\")" / "U+0027 APOSTROPHE (')"
            // "Consume a string token and return it."
            '"' | '\'' => {
                self.advance();
                self.consume_string_token(c)
            }

            // "U+0023 NUMBER SIGN (#)"
            '#' => {
                self.advance();
                // "If the next input code point is an ident code point or
                // the next two input code points are a valid escape..."
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    // "If the next 3 input code points would start an ident
                    // sequence, set the <hash-token>'s type flag to 'id'."
                    let flag = if self.would_start_ident_sequence() {
                        TokenFlag::Id
                    } else {
                        TokenFlag::Unrestricted
                    };
                    let value = self.consume_ident_sequence();
                    let mut token = self.make(TokenKind::Hash, value);
                    token.flag = flag;
                    Ok(token)
                } else {
                    Ok(self.make(TokenKind::Delim, "#"))
                }
            }

            '(' => Ok(self.simple(TokenKind::ParenOpen)),
            ')' => Ok(self.simple(TokenKind::ParenClose)),
            '[' => Ok(self.simple(TokenKind::BracketOpen)),
            ']' => Ok(self.simple(TokenKind::BracketClose)),
            '{' => Ok(self.simple(TokenKind::CurlyOpen)),
            '}' => Ok(self.simple(TokenKind::CurlyClose)),
            ',' => Ok(self.simple(TokenKind::Comma)),
            ':' => Ok(self.simple(TokenKind::Colon)),
            ';' => Ok(self.simple(TokenKind::Semicolon)),

            // "U+002B PLUS SIGN (+)"
            // "If the input stream starts with a number, consume a numeric
            // token and return it."
            '+' => {
                if self.would_start_number() {
                    Ok(self.consume_numeric_token())
                } else {
                    self.advance();
                    Ok(self.make(TokenKind::Delim, "+"))
                }
            }

            // "U+002D HYPHEN-MINUS (-)"
            '-' => {
                if self.would_start_number() {
                    Ok(self.consume_numeric_token())
                }
                // "If the next 2 input code points are U+002D U+003E (->)..."
                else if self.peek_at(1) == Some('-') && self.peek_at(2) == Some('>') {
                    self.advance();
                    self.advance();
                    self.advance();
                    Ok(self.make(TokenKind::Cdc, self.raw()))
                }
                // "Otherwise, if the input stream starts with an ident
                // sequence, consume an ident-like token."
                else if self.would_start_ident_sequence() {
                    self.consume_ident_like_token()
                } else {
                    self.advance();
                    Ok(self.make(TokenKind::Delim, "-"))
                }
            }

            // "U+002E FULL STOP (.)"
            '.' => {
                if self.would_start_number() {
                    Ok(self.consume_numeric_token())
                } else {
                    self.advance();
                    Ok(self.make(TokenKind::Delim, "."))
                }
            }

            // "U+003C LESS-THAN SIGN (<)"
            // "If the next 3 input code points are U+0021 U+002D U+002D
            // (!--), consume them and return a <CDO-token>."
            '<' => {
                if self.peek_at(1) == Some('!')
                    && self.peek_at(2) == Some('-')
                    && self.peek_at(3) == Some('-')
                {
                    for _ in 0..4 {
                        self.advance();
                    }
                    Ok(self.make(TokenKind::Cdo, self.raw()))
                } else {
                    self.advance();
                    Ok(self.make(TokenKind::Delim, "<"))
                }
            }

            // "U+0040 COMMERCIAL AT (@)"
            // "If the next 3 input code points would start an ident
            // sequence, consume it and return an <at-keyword-token>."
            '@' => {
                self.advance();
                if self.would_start_ident_sequence() {
                    let value = self.consume_ident_sequence();
                    Ok(self.make(TokenKind::AtKeyword, value))
                } else {
                    Ok(self.make(TokenKind::Delim, "@"))
                }
            }

            // "U+005C REVERSE SOLIDUS (\)"
            // "If the input stream starts with a valid escape, consume an
            // ident-like token. Otherwise... return a <delim-token>."
            '\\' => {
                if is_valid_escape(Some('\\'), self.peek_at(1)) {
                    self.consume_ident_like_token()
                } else {
                    self.advance();
                    Ok(self.make(TokenKind::Delim, "\\"))
                }
            }

            // "digit"
            // "Consume a numeric token and return it."
            c if c.is_ascii_digit() => Ok(self.consume_numeric_token()),

            // "ident-start code point"
            // "Consume an ident-like token and return it."
            c if is_ident_start_code_point(c) => self.consume_ident_like_token(),

            // "anything else"
            // "Return a <delim-token> with its value set to the current
            // input code point."
            c => {
                self.advance();
                Ok(self.make(TokenKind::Delim, c.to_string()))
            }
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// The opening quote has already been consumed. An unescaped newline or
    /// EOF before the closing quote is a hard tokenization error.
    fn consume_string_token(&mut self, ending: char) -> Result<Token, Error> {
        let mut value = String::new();

        loop {
            match self.consume() {
                // "ending code point" - "Return the <string-token>."
                Some(c) if c == ending => {
                    return Ok(self.make(TokenKind::String, value));
                }

                // "EOF" - the selector ends mid-string.
                None => {
                    return Err(Error::tokenize("unmatched string quote", self.start));
                }

                // "newline"
                Some('\n' | '\r' | '\x0C') => {
                    return Err(Error::tokenize(
                        "invalid unescaped string character",
                        self.start,
                    ));
                }

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => match self.peek() {
                    // "If the next input code point is EOF, do nothing."
                    // The next loop iteration reports the unmatched quote.
                    None => {}
                    // "Otherwise, if the next input code point is a newline,
                    // consume it." (line continuation, no character emitted)
                    Some('\n' | '\x0C') => self.advance(),
                    Some('\r') => {
                        self.advance();
                        if self.peek() == Some('\n') {
                            self.advance();
                        }
                    }
                    // "Otherwise, consume an escaped code point and append
                    // the returned code point to the <string-token>'s value."
                    Some(_) => value.push(self.consume_escaped_code_point()),
                },

                // "anything else" - append to the value.
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.5 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> Token {
        // "Consume a number and let number be the result."
        let flag = self.scan_number();
        let number_text = self.raw();

        // "If the next 3 input code points would start an ident sequence..."
        // "Create a <dimension-token>... Consume an ident sequence. Set the
        // <dimension-token>'s unit to the returned value."
        //
        // This is how `2n-1` becomes one dimension token with unit `n-1`:
        // both `-` and digits are ident code points.
        if self.would_start_ident_sequence() {
            let unit = self.consume_ident_sequence();
            let mut token = self.make(TokenKind::Dimension, number_text);
            token.flag = flag;
            token.unit = unit;
            token
        }
        // "Otherwise, if the next input code point is U+0025 PERCENTAGE
        // SIGN (%), consume it."
        else if self.peek() == Some('%') {
            self.advance();
            let mut token = self.make(TokenKind::Percentage, number_text);
            token.flag = flag;
            token
        } else {
            let mut token = self.make(TokenKind::Number, number_text);
            token.flag = flag;
            token
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Advances the cursor over sign, digits, fractional part, and exponent.
    /// Returns the integer/number type flag; the numeric text is the slice
    /// covered.
    fn scan_number(&mut self) -> TokenFlag {
        // "Initially set type to 'integer'."
        let mut flag = TokenFlag::Integer;

        // "If the next input code point is U+002B PLUS SIGN (+) or U+002D
        // HYPHEN-MINUS (-), consume it."
        if matches!(self.peek(), Some('+' | '-')) {
            self.advance();
        }

        // "While the next input code point is a digit, consume it."
        self.skip_digits();

        // "If the next 2 input code points are U+002E FULL STOP (.)
        // followed by a digit... set type to 'number'."
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.advance();
            self.skip_digits();
            flag = TokenFlag::Number;
        }

        // "If the next 2 or 3 input code points are U+0045 (E) or U+0065
        // (e), optionally followed by a sign, followed by a digit... set
        // type to 'number'."
        if matches!(self.peek(), Some('e' | 'E')) {
            let has_sign = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if has_sign { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
                if has_sign {
                    self.advance();
                }
                self.advance();
                self.skip_digits();
                flag = TokenFlag::Number;
            }
        }

        flag
    }

    /// [§ 4.3.6 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> Result<Token, Error> {
        // "Consume an ident sequence, and let string be the result."
        let value = self.consume_ident_sequence();

        // "If string's value is an ASCII case-insensitive match for 'url',
        // and the next input code point is U+0028 LEFT PARENTHESIS (()..."
        if value.eq_ignore_ascii_case("url") && self.peek() == Some('(') {
            self.advance();
            self.consume_whitespace();

            // "If the next one or two input code points are U+0022, U+0027,
            // or whitespace followed by one of those, return a
            // <function-token>. Otherwise, consume a url token."
            match self.peek() {
                Some('"' | '\'') => Ok(self.make(TokenKind::Function, value)),
                _ => self.consume_url_token(),
            }
        }
        // "Otherwise, if the next input code point is U+0028 LEFT
        // PARENTHESIS ((), consume it. Return a <function-token>."
        else if self.peek() == Some('(') {
            self.advance();
            Ok(self.make(TokenKind::Function, value))
        }
        // "Otherwise, return an <ident-token>."
        else {
            Ok(self.make(TokenKind::Ident, value))
        }
    }

    /// [§ 4.3.7 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    ///
    /// Where the stylesheet algorithm would emit a `<bad-url-token>`, this
    /// tokenizer reports a hard error instead.
    fn consume_url_token(&mut self) -> Result<Token, Error> {
        let mut value = String::new();

        // "Consume as much whitespace as possible."
        self.consume_whitespace();

        loop {
            match self.consume() {
                // "U+0029 RIGHT PARENTHESIS ())" - "Return the <url-token>."
                Some(')') => return Ok(self.make(TokenKind::Url, value)),

                // "EOF" - the selector ends mid-URL.
                None => return Err(Error::tokenize("unterminated URL", self.start)),

                // "whitespace" - only allowed immediately before the
                // closing parenthesis.
                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    match self.peek() {
                        Some(')') => {
                            self.advance();
                            return Ok(self.make(TokenKind::Url, value));
                        }
                        None => return Err(Error::tokenize("unterminated URL", self.start)),
                        _ => return Err(Error::tokenize("invalid character in URL", self.start)),
                    }
                }

                // Quotes, parentheses, and non-printable code points are
                // not allowed in an unquoted URL.
                Some('"' | '\'' | '(') => {
                    return Err(Error::tokenize("invalid character in URL", self.start));
                }

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        value.push(self.consume_escaped_code_point());
                    } else {
                        return Err(Error::tokenize("invalid escape in URL", self.start));
                    }
                }

                // "anything else" - append to the value.
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    ///
    /// Returns the decoded name; escapes are resolved to their code points.
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();

        loop {
            match self.peek() {
                // "ident code point" - "Append the code point to result."
                Some(c) if is_ident_code_point(c) => {
                    self.advance();
                    result.push(c);
                }

                // "the stream starts with a valid escape"
                // "Consume an escaped code point. Append it to result."
                Some('\\') if is_valid_escape(Some('\\'), self.peek_at(1)) => {
                    self.advance();
                    result.push(self.consume_escaped_code_point());
                }

                // "anything else" - "Return result."
                _ => return result,
            }
        }
    }

    /// [§ 4.3.13 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Assumes the U+005C REVERSE SOLIDUS has already been consumed and
    /// that the escape is valid.
    fn consume_escaped_code_point(&mut self) -> char {
        match self.consume() {
            // "hex digit"
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = c.to_string();
                // "Consume as many hex digits as possible, but no more
                // than 5."
                for _ in 0..5 {
                    match self.peek() {
                        Some(h) if h.is_ascii_hexdigit() => {
                            self.advance();
                            hex.push(h);
                        }
                        _ => break,
                    }
                }
                // "If the next input code point is whitespace, consume it
                // as well."
                match self.peek() {
                    Some(' ' | '\t' | '\n' | '\x0C') => self.advance(),
                    Some('\r') => {
                        self.advance();
                        if self.peek() == Some('\n') {
                            self.advance();
                        }
                    }
                    _ => {}
                }
                // "Interpret the hex digits as a hexadecimal number. If
                // this number is zero, or is for a surrogate, or is greater
                // than the maximum allowed code point, return U+FFFD."
                let code_point = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
                if code_point == 0
                    || (0xD800..=0xDFFF).contains(&code_point)
                    || code_point > 0x10_FFFF
                {
                    '\u{FFFD}'
                } else {
                    char::from_u32(code_point).unwrap_or('\u{FFFD}')
                }
            }
            // "EOF" - "Return U+FFFD REPLACEMENT CHARACTER."
            None => '\u{FFFD}',
            // "anything else" - "Return the current input code point."
            Some(c) => c,
        }
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn would_start_ident_sequence(&self) -> bool {
        match self.peek() {
            // "U+002D HYPHEN-MINUS"
            // "If the second code point is an ident-start code point or a
            // U+002D HYPHEN-MINUS, or the second and third code points are
            // a valid escape, return true."
            Some('-') => {
                let second = self.peek_at(1);
                second.is_some_and(is_ident_start_code_point)
                    || second == Some('-')
                    || is_valid_escape(second, self.peek_at(2))
            }
            // "ident-start code point"
            Some(c) if is_ident_start_code_point(c) => true,
            // "U+005C REVERSE SOLIDUS (\)"
            Some('\\') => is_valid_escape(Some('\\'), self.peek_at(1)),
            _ => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn would_start_number(&self) -> bool {
        match self.peek() {
            // "U+002B PLUS SIGN (+)" or "U+002D HYPHEN-MINUS (-)"
            Some('+' | '-') => {
                let second = self.peek_at(1);
                if second.is_some_and(|c| c.is_ascii_digit()) {
                    return true;
                }
                // "if the second code point is U+002E FULL STOP (.) and the
                // third code point is a digit, return true."
                second == Some('.') && self.peek_at(2).is_some_and(|c| c.is_ascii_digit())
            }
            // "U+002E FULL STOP (.)"
            Some('.') => self.peek_at(1).is_some_and(|c| c.is_ascii_digit()),
            // "digit"
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    /// Consume a maximal whitespace run.
    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.advance();
        }
    }

    /// Consume a maximal digit run.
    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Build a token spanning from the current token start to the cursor.
    fn make(&self, kind: TokenKind, value: impl Into<String>) -> Token {
        Token {
            kind,
            raw: self.raw(),
            value: value.into(),
            pos: self.start,
            flag: TokenFlag::None,
            unit: String::new(),
        }
    }

    /// Consume one code point and emit it as a token of the given kind.
    fn simple(&mut self, kind: TokenKind) -> Token {
        self.advance();
        self.make(kind, self.raw())
    }

    /// The raw source text of the token being consumed.
    fn raw(&self) -> String {
        self.input[self.start..self.pos].to_string()
    }

    /// Peek at the next code point without consuming it.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Peek at the code point `n` positions ahead of the cursor.
    fn peek_at(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    /// Consume and return the next code point.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume the next code point, discarding it.
    fn advance(&mut self) {
        let _ = self.consume();
    }
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
///
/// "If the first code point is not U+005C REVERSE SOLIDUS (\), return false.
/// Otherwise, if the second code point is a newline, return false.
/// Otherwise, return true."
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && !matches!(second, Some('\n' | '\r' | '\x0C'))
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}
