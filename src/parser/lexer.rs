//! Lexical scanner for AtomC source code.
//!
//! A single-pass tokenizer driven by an explicit finite-state machine with
//! one character of lookahead, fed by a [`CharStream`]. Every token records
//! the line and column of its first character; the position is captured when
//! the state machine leaves [`State::Initial`], before any lookahead moves
//! the stream.
//!
//! Escape sequences inside string and character literals are kept raw
//! (`\n` stays as the two characters `\` and `n`); interpreting them is left
//! to whatever later stage consumes the literal.
//!
//! Lexical errors are reported through [`Diagnostics`] and scanning resumes
//! from the initial state, so a single bad literal never hides the rest of
//! the file.

use rustc_hash::FxHashMap;

use super::token::{Token, TokenKind};
use crate::diagnostics::Diagnostics;
use crate::source::CharStream;

/// Scanner states. One token is built per excursion out of `Initial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    Identifier,
    Number,
    HexNumber,
    OctalNumber,
    RealNumber,
    Exponent,
    ExponentNumber,
    Str,
    CharLit,
    Escape,
    LineComment,
    BlockComment,
    End,
}

/// State-machine tokenizer producing the ordered token sequence.
pub struct Lexer<'a> {
    source: &'a mut CharStream,
    diagnostics: &'a mut Diagnostics,
    keywords: FxHashMap<&'static str, TokenKind>,
    tokens: Vec<Token>,
    buffer: String,
    state: State,
    // Position of the first character of the token being built.
    start_line: usize,
    start_column: usize,
    // Whether an escape sequence returns to a char or a string literal.
    in_char_literal: bool,
    // Where the current block comment opened, for the unterminated case.
    comment_line: usize,
    comment_column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a mut CharStream, diagnostics: &'a mut Diagnostics) -> Self {
        let mut keywords = FxHashMap::default();
        keywords.insert("break", TokenKind::Break);
        keywords.insert("char", TokenKind::Char);
        keywords.insert("double", TokenKind::Double);
        keywords.insert("else", TokenKind::Else);
        keywords.insert("for", TokenKind::For);
        keywords.insert("if", TokenKind::If);
        keywords.insert("int", TokenKind::Int);
        keywords.insert("return", TokenKind::Return);
        keywords.insert("struct", TokenKind::Struct);
        keywords.insert("void", TokenKind::Void);
        keywords.insert("while", TokenKind::While);
        // "float" is deliberately absent: TokenKind::Float is reserved and
        // the word lexes as an ordinary identifier.

        Self {
            source,
            diagnostics,
            keywords,
            tokens: Vec::new(),
            buffer: String::new(),
            state: State::Initial,
            start_line: 1,
            start_column: 1,
            in_char_literal: false,
            comment_line: 1,
            comment_column: 1,
        }
    }

    /// Run the scanner to end of input and return the token sequence.
    pub fn analyze(mut self) -> Vec<Token> {
        loop {
            if self.state == State::End {
                break;
            }
            match self.source.next_char() {
                Some(ch) => self.step(ch),
                None => self.finish(),
            }
        }
        self.tokens
    }

    fn step(&mut self, ch: char) {
        match self.state {
            State::Initial => self.initial(ch),
            State::Identifier => self.identifier(ch),
            State::Number => self.number(ch),
            State::HexNumber => self.hex_number(ch),
            State::OctalNumber => self.octal_number(ch),
            State::RealNumber => self.real_number(ch),
            State::Exponent => self.exponent(ch),
            State::ExponentNumber => self.exponent_number(ch),
            State::Str => self.string_literal(ch),
            State::CharLit => self.char_literal(ch),
            State::Escape => self.escape(ch),
            State::LineComment => {
                if ch == '\n' {
                    self.state = State::Initial;
                }
            }
            State::BlockComment => self.block_comment(ch),
            State::End => {}
        }
    }

    fn initial(&mut self, ch: char) {
        if ch.is_ascii_whitespace() {
            return;
        }

        // The stream position now names `ch` itself; snapshot it before any
        // lookahead moves on.
        self.start_line = self.source.line();
        self.start_column = self.source.column();

        if ch.is_ascii_alphabetic() || ch == '_' {
            self.buffer.push(ch);
            self.state = State::Identifier;
            return;
        }

        if ch.is_ascii_digit() {
            self.buffer.push(ch);
            if ch == '0' {
                match self.source.next_char() {
                    Some(next) if next == 'x' || next == 'X' => {
                        self.buffer.push(next);
                        self.state = State::HexNumber;
                    }
                    Some(next) if next.is_ascii_digit() => {
                        // Any digit after a leading 0 commits to the octal
                        // rule; 8 and 9 are then rejected by that state.
                        self.source.put_back(next);
                        self.state = State::OctalNumber;
                    }
                    Some('.') => {
                        self.buffer.push('.');
                        self.state = State::RealNumber;
                    }
                    other => {
                        if let Some(next) = other {
                            self.source.put_back(next);
                        }
                        self.emit(TokenKind::CtInt);
                    }
                }
            } else {
                self.state = State::Number;
            }
            return;
        }

        match ch {
            '"' => {
                self.buffer.clear();
                self.in_char_literal = false;
                self.state = State::Str;
            }
            '\'' => {
                self.buffer.clear();
                self.in_char_literal = true;
                self.state = State::CharLit;
            }
            '/' => match self.source.next_char() {
                Some('/') => self.state = State::LineComment,
                Some('*') => {
                    self.comment_line = self.start_line;
                    self.comment_column = self.start_column;
                    self.state = State::BlockComment;
                }
                other => {
                    if let Some(next) = other {
                        self.source.put_back(next);
                    }
                    self.single(TokenKind::Div, "/");
                }
            },
            ',' => self.single(TokenKind::Comma, ","),
            ';' => self.single(TokenKind::Semicolon, ";"),
            '(' => self.single(TokenKind::Lpar, "("),
            ')' => self.single(TokenKind::Rpar, ")"),
            '[' => self.single(TokenKind::Lbracket, "["),
            ']' => self.single(TokenKind::Rbracket, "]"),
            '{' => self.single(TokenKind::Lacc, "{"),
            '}' => self.single(TokenKind::Racc, "}"),
            '.' => self.single(TokenKind::Dot, "."),
            '+' => self.single(TokenKind::Add, "+"),
            '-' => self.single(TokenKind::Sub, "-"),
            '*' => self.single(TokenKind::Mul, "*"),
            '!' => self.pair('=', TokenKind::NotEq, "!=", TokenKind::Not, "!"),
            '=' => self.pair('=', TokenKind::Equal, "==", TokenKind::Assign, "="),
            '<' => self.pair('=', TokenKind::LessEq, "<=", TokenKind::Less, "<"),
            '>' => self.pair('=', TokenKind::GreaterEq, ">=", TokenKind::Greater, ">"),
            '&' => self.pair('&', TokenKind::And, "&&", TokenKind::Unknown, "&"),
            '|' => match self.source.next_char() {
                Some('|') => self.single(TokenKind::Or, "||"),
                other => {
                    if let Some(next) = other {
                        self.source.put_back(next);
                    }
                    self.diagnostics.lexical(
                        "Invalid '|' operator",
                        self.start_line,
                        self.start_column,
                    );
                }
            },
            _ => {
                self.diagnostics.lexical(
                    &format!("Unknown character: {}", ch),
                    self.start_line,
                    self.start_column,
                );
            }
        }
    }

    fn identifier(&mut self, ch: char) {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            self.buffer.push(ch);
        } else {
            self.source.put_back(ch);
            self.emit_identifier();
        }
    }

    fn number(&mut self, ch: char) {
        if ch.is_ascii_digit() {
            self.buffer.push(ch);
        } else if ch == '.' {
            self.buffer.push(ch);
            self.state = State::RealNumber;
        } else if ch == 'e' || ch == 'E' {
            self.buffer.push(ch);
            self.state = State::Exponent;
        } else {
            self.source.put_back(ch);
            self.emit(TokenKind::CtInt);
        }
    }

    fn hex_number(&mut self, ch: char) {
        if ch.is_ascii_hexdigit() {
            self.buffer.push(ch);
        } else {
            self.source.put_back(ch);
            self.emit_hex();
        }
    }

    fn octal_number(&mut self, ch: char) {
        if ('0'..='7').contains(&ch) {
            self.buffer.push(ch);
        } else if ch == '8' || ch == '9' {
            // Report at the offending digit, drop the whole literal, and
            // swallow the rest of the digit run so no fragment of it leaks
            // out as a separate token.
            self.diagnostics.lexical(
                "Invalid octal number",
                self.source.line(),
                self.source.column(),
            );
            self.buffer.clear();
            self.skip_digit_run();
            self.state = State::Initial;
        } else {
            self.source.put_back(ch);
            self.emit(TokenKind::CtInt);
        }
    }

    fn real_number(&mut self, ch: char) {
        if ch.is_ascii_digit() {
            self.buffer.push(ch);
        } else if ch == 'e' || ch == 'E' {
            self.buffer.push(ch);
            self.state = State::Exponent;
        } else {
            self.source.put_back(ch);
            self.emit(TokenKind::CtReal);
        }
    }

    fn exponent(&mut self, ch: char) {
        if ch == '+' || ch == '-' {
            self.buffer.push(ch);
            match self.source.next_char() {
                Some(next) if next.is_ascii_digit() => {
                    self.buffer.push(next);
                    self.state = State::ExponentNumber;
                }
                other => {
                    self.diagnostics.lexical(
                        "Invalid exponent notation: missing digits after sign",
                        self.source.line(),
                        self.source.column(),
                    );
                    if let Some(next) = other {
                        self.source.put_back(next);
                    }
                    self.emit(TokenKind::CtReal);
                }
            }
        } else if ch.is_ascii_digit() {
            self.buffer.push(ch);
            self.state = State::ExponentNumber;
        } else {
            self.diagnostics.lexical(
                "Invalid exponent notation in number",
                self.source.line(),
                self.source.column(),
            );
            self.source.put_back(ch);
            self.emit(TokenKind::CtReal);
        }
    }

    fn exponent_number(&mut self, ch: char) {
        if ch.is_ascii_digit() {
            self.buffer.push(ch);
        } else {
            self.source.put_back(ch);
            self.emit(TokenKind::CtReal);
        }
    }

    fn string_literal(&mut self, ch: char) {
        match ch {
            '\\' => self.state = State::Escape,
            '"' => self.emit(TokenKind::CtString),
            _ => self.buffer.push(ch),
        }
    }

    fn char_literal(&mut self, ch: char) {
        match ch {
            '\\' => self.state = State::Escape,
            '\'' => {
                self.in_char_literal = false;
                self.emit(TokenKind::CtChar);
            }
            _ => self.buffer.push(ch),
        }
    }

    fn escape(&mut self, ch: char) {
        match ch {
            'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' | '\'' | '"' | '0' => {
                // Stored raw: the backslash and the escape letter both land
                // in the lexeme untranslated.
                self.buffer.push('\\');
                self.buffer.push(ch);
            }
            _ => {
                self.diagnostics.lexical(
                    "Invalid escape sequence",
                    self.source.line(),
                    self.source.column(),
                );
            }
        }
        self.state = if self.in_char_literal {
            State::CharLit
        } else {
            State::Str
        };
    }

    fn block_comment(&mut self, ch: char) {
        if ch == '*' {
            match self.source.next_char() {
                Some('/') => self.state = State::Initial,
                Some(next) => self.source.put_back(next),
                None => {}
            }
        }
    }

    /// End of input: flush whatever token is in flight, or report the
    /// constructs that cannot legally end at EOF.
    fn finish(&mut self) {
        match self.state {
            State::Initial | State::LineComment | State::End => {}
            State::Identifier => self.emit_identifier(),
            State::Number | State::OctalNumber => self.emit(TokenKind::CtInt),
            State::HexNumber => self.emit_hex(),
            State::RealNumber | State::ExponentNumber => self.emit(TokenKind::CtReal),
            State::Exponent => {
                self.diagnostics.lexical(
                    "Invalid exponent notation in number",
                    self.source.line(),
                    self.source.column(),
                );
                self.emit(TokenKind::CtReal);
            }
            State::Str => {
                self.diagnostics.lexical(
                    "Unterminated string literal",
                    self.start_line,
                    self.start_column,
                );
                self.buffer.clear();
            }
            State::CharLit | State::Escape => {
                let msg = if self.in_char_literal {
                    "Unterminated character literal"
                } else {
                    "Unterminated string literal"
                };
                self.diagnostics
                    .lexical(msg, self.start_line, self.start_column);
                self.buffer.clear();
            }
            State::BlockComment => {
                self.diagnostics.lexical(
                    "Unterminated block comment",
                    self.comment_line,
                    self.comment_column,
                );
            }
        }
        self.state = State::End;
    }

    /// Emit the buffered lexeme at the snapshotted start position.
    fn emit(&mut self, kind: TokenKind) {
        let lexeme = std::mem::take(&mut self.buffer);
        self.tokens
            .push(Token::new(kind, lexeme, self.start_line, self.start_column));
        self.state = State::Initial;
    }

    fn emit_identifier(&mut self) {
        let kind = self
            .keywords
            .get(self.buffer.as_str())
            .copied()
            .unwrap_or(TokenKind::Id);
        self.emit(kind);
    }

    /// Hex literals need at least one digit after the `0x` prefix.
    fn emit_hex(&mut self) {
        if self.buffer.len() <= 2 {
            self.diagnostics.lexical(
                "Invalid hexadecimal number: missing digits",
                self.start_line,
                self.start_column,
            );
            self.buffer.clear();
            self.state = State::Initial;
        } else {
            self.emit(TokenKind::CtInt);
        }
    }

    /// Single- or two-character token whose text is known in advance.
    fn single(&mut self, kind: TokenKind, lexeme: &str) {
        self.tokens
            .push(Token::new(kind, lexeme, self.start_line, self.start_column));
        self.state = State::Initial;
    }

    /// Two-character operator when `second` follows, `short_kind` otherwise.
    fn pair(
        &mut self,
        second: char,
        long_kind: TokenKind,
        long_lexeme: &str,
        short_kind: TokenKind,
        short_lexeme: &str,
    ) {
        match self.source.next_char() {
            Some(next) if next == second => self.single(long_kind, long_lexeme),
            other => {
                if let Some(next) = other {
                    self.source.put_back(next);
                }
                self.single(short_kind, short_lexeme);
            }
        }
    }

    /// Consume a contiguous run of decimal digits, pushing back the first
    /// non-digit. Used to discard the tail of a rejected octal literal.
    fn skip_digit_run(&mut self) {
        while let Some(ch) = self.source.next_char() {
            if !ch.is_ascii_digit() {
                self.source.put_back(ch);
                break;
            }
        }
    }
}
