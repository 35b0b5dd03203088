//! Best-effort repair of malformed JSON emitted by language models.
//!
//! [`repair_json`] makes a single left-to-right pass over the text, tracking the open containers
//! and what each one expects next, and writes out compact JSON that `serde_json` can parse.
//!
//! Handled defects:
//! - trailing, leading and repeated commas; missing commas between values
//! - unquoted keys, single-quoted and typographic (“smart”) quoted strings
//! - unescaped inner quotes, raw control characters and invalid escapes inside strings
//! - `//` and `/* */` comments
//! - `True`/`False`/`None`/`undefined`/`NaN` and unquoted bare-word values
//! - a colon with no value (becomes `null`)
//! - mismatched or stray closing brackets, text after the root value
//! - truncation: unterminated strings, dangling keys and unclosed containers
//!
//! An object key that is not followed by a colon is treated as unrecoverable; the repairer
//! refuses rather than inventing structure, so prose inside braces still ends in the fallback.

/// Reasons the repairer gives up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepairError {
    #[error("no JSON object found")]
    NoRoot,
    #[error("object key before offset {0} is not followed by ':'")]
    MissingColon(usize),
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },
}

pub type RepairResult<T> = std::result::Result<T, RepairError>;

/// Repair `input` into syntactically valid JSON text.
///
/// The root must be an object; anything before the first `{` is ignored, as is anything after
/// the root closes. Bracketed prose such as a Markdown link is never taken for an array.
///
/// # Errors
/// Returns a [`RepairError`] when no root is present or the structure cannot be recovered.
pub fn repair_json(input: &str) -> RepairResult<String> {
    Repairer::new(input).run()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

impl Container {
    fn closer(self) -> char {
        match self {
            Container::Object => '}',
            Container::Array => ']',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Expect {
    Key,
    Colon,
    Value,
    CommaOrEnd,
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    container: Container,
    expect: Expect,
}

/// What the token about to be written stands for in its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Key,
    Value,
}

struct Repairer {
    chars: Vec<char>,
    pos: usize,
    out: String,
    stack: Vec<Frame>,
    root_done: bool,
}

impl Repairer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            out: String::with_capacity(input.len() + 16),
            stack: Vec::new(),
            root_done: false,
        }
    }

    fn run(mut self) -> RepairResult<String> {
        self.pos = self
            .chars
            .iter()
            .position(|c| *c == '{')
            .ok_or(RepairError::NoRoot)?;

        while !self.root_done {
            self.skip_insignificant();
            let Some(c) = self.peek() else { break };
            match c {
                '{' | '[' => self.open(c)?,
                '}' | ']' => self.close(c)?,
                ',' => {
                    self.pos += 1;
                    self.comma();
                }
                ':' => {
                    self.pos += 1;
                    self.colon();
                }
                c if is_quote(c) => self.string(c)?,
                c if starts_number(c, self.peek_at(1)) => self.number()?,
                c if is_word_start(c) => self.word()?,
                _ => self.pos += 1,
            }
        }

        while !self.stack.is_empty() {
            self.close_top(true)?;
        }
        Ok(self.out)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn skip_insignificant(&mut self) {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => self.pos += 1,
                (Some('/'), Some('/')) => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                }
                (Some('/'), Some('*')) => {
                    self.pos += 2;
                    while self.peek().is_some() && !(self.peek() == Some('*') && self.peek_at(1) == Some('/')) {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.chars.len());
                }
                _ => return,
            }
        }
    }

    /// Decide the role of the next token, inserting a missing comma when needed.
    fn begin(&mut self, offset: usize) -> RepairResult<Role> {
        let Some(frame) = self.stack.last_mut() else {
            return Ok(Role::Value);
        };
        match (frame.container, frame.expect) {
            (Container::Object, Expect::CommaOrEnd) => {
                self.out.push(',');
                frame.expect = Expect::Key;
                Ok(Role::Key)
            }
            (Container::Array, Expect::CommaOrEnd) => {
                self.out.push(',');
                frame.expect = Expect::Value;
                Ok(Role::Value)
            }
            (Container::Object, Expect::Key) => Ok(Role::Key),
            (Container::Object, Expect::Colon) => Err(RepairError::MissingColon(offset)),
            _ => Ok(Role::Value),
        }
    }

    /// Record that a token with `role` has been fully written.
    fn finish(&mut self, role: Role) {
        match self.stack.last_mut() {
            None => self.root_done = true,
            Some(frame) => {
                frame.expect = match role {
                    Role::Key => Expect::Colon,
                    Role::Value => Expect::CommaOrEnd,
                }
            }
        }
    }

    fn open(&mut self, c: char) -> RepairResult<()> {
        let offset = self.pos;
        if self.begin(offset)? == Role::Key {
            return Err(RepairError::Unexpected { found: c, offset });
        }
        self.pos += 1;
        self.out.push(c);
        self.stack.push(if c == '{' {
            Frame {
                container: Container::Object,
                expect: Expect::Key,
            }
        } else {
            Frame {
                container: Container::Array,
                expect: Expect::Value,
            }
        });
        Ok(())
    }

    /// Close the innermost container matching `c`, closing any containers opened inside it.
    /// A closer with no matching open container is dropped.
    fn close(&mut self, c: char) -> RepairResult<()> {
        self.pos += 1;
        let Some(depth) = self
            .stack
            .iter()
            .rposition(|frame| frame.container.closer() == c)
        else {
            return Ok(());
        };
        while self.stack.len() > depth {
            self.close_top(false)?;
        }
        Ok(())
    }

    fn close_top(&mut self, at_eof: bool) -> RepairResult<()> {
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        match (frame.container, frame.expect) {
            (Container::Object, Expect::Colon) if at_eof => self.out.push_str(":null"),
            (Container::Object, Expect::Colon) => return Err(RepairError::MissingColon(self.pos)),
            (Container::Object, Expect::Value) => self.out.push_str("null"),
            _ => {
                if self.out.ends_with(',') {
                    self.out.pop();
                }
            }
        }
        self.out.push(frame.container.closer());
        self.finish(Role::Value);
        Ok(())
    }

    fn comma(&mut self) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        match (frame.container, frame.expect) {
            (Container::Object, Expect::CommaOrEnd) => {
                self.out.push(',');
                frame.expect = Expect::Key;
            }
            (Container::Array, Expect::CommaOrEnd) => {
                self.out.push(',');
                frame.expect = Expect::Value;
            }
            (Container::Object, Expect::Value) => {
                self.out.push_str("null,");
                frame.expect = Expect::Key;
            }
            // Leading or repeated comma.
            _ => {}
        }
    }

    fn colon(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            if frame.container == Container::Object && frame.expect == Expect::Colon {
                self.out.push(':');
                frame.expect = Expect::Value;
            }
        }
    }

    fn string(&mut self, open: char) -> RepairResult<()> {
        let role = self.begin(self.pos)?;
        self.pos += 1;
        self.out.push('"');

        while let Some(c) = self.peek() {
            if c == '\\' {
                self.escape();
                continue;
            }
            if closes(open, c) && self.quote_ends_string() {
                self.pos += 1;
                break;
            }
            push_escaped_char(&mut self.out, c);
            self.pos += 1;
        }

        // Reached on the closing quote or on truncation.
        self.out.push('"');
        self.finish(role);
        Ok(())
    }

    /// A quote only terminates a string when what follows could follow a string.
    fn quote_ends_string(&self) -> bool {
        let next = self.chars[self.pos + 1..]
            .iter()
            .copied()
            .find(|c| !c.is_whitespace());
        match next {
            None => true,
            Some(c) => matches!(c, ',' | ':' | '}' | ']') || is_quote(c),
        }
    }

    fn escape(&mut self) {
        match self.peek_at(1) {
            None => self.pos += 1,
            Some(e @ ('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't')) => {
                self.out.push('\\');
                self.out.push(e);
                self.pos += 2;
            }
            Some('u') if self.is_hex4_at(self.pos + 2) => {
                self.out.extend(&self.chars[self.pos..self.pos + 6]);
                self.pos += 6;
            }
            Some('\'') => {
                self.out.push('\'');
                self.pos += 2;
            }
            Some(_) => {
                self.out.push_str("\\\\");
                self.pos += 1;
            }
        }
    }

    fn is_hex4_at(&self, start: usize) -> bool {
        self.chars
            .get(start..start + 4)
            .is_some_and(|digits| digits.iter().all(char::is_ascii_hexdigit))
    }

    fn number(&mut self) -> RepairResult<()> {
        let role = self.begin(self.pos)?;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        {
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos].iter().collect();

        match role {
            Role::Key => push_quoted(&mut self.out, &raw),
            Role::Value => match normalise_number(&raw) {
                Some(number) => self.out.push_str(&number),
                None => push_quoted(&mut self.out, &raw),
            },
        }
        self.finish(role);
        Ok(())
    }

    fn word(&mut self) -> RepairResult<()> {
        let role = self.begin(self.pos)?;
        let start = self.pos;
        while self.peek().is_some_and(is_word_char) {
            self.pos += 1;
        }
        let ident: String = self.chars[start..self.pos].iter().collect();

        match role {
            Role::Key => push_quoted(&mut self.out, &ident),
            Role::Value => match literal(&ident) {
                Some(lit) => self.out.push_str(lit),
                None => {
                    // Unquoted text runs to the next delimiter.
                    self.pos = start;
                    while self
                        .peek()
                        .is_some_and(|c| !matches!(c, ',' | '}' | ']' | '\n' | '\r'))
                    {
                        self.pos += 1;
                    }
                    let text: String = self.chars[start..self.pos].iter().collect();
                    push_quoted(&mut self.out, text.trim_end());
                }
            },
        }
        self.finish(role);
        Ok(())
    }
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '“' | '”' | '„' | '‟' | '‘' | '’')
}

fn closes(open: char, c: char) -> bool {
    match open {
        '"' => c == '"',
        '\'' => c == '\'',
        '“' | '”' | '„' | '‟' => matches!(c, '”' | '“' | '"'),
        '‘' | '’' => matches!(c, '’' | '‘' | '\''),
        _ => false,
    }
}

fn starts_number(c: char, next: Option<char>) -> bool {
    c.is_ascii_digit()
        || (matches!(c, '-' | '+' | '.') && next.is_some_and(|n| n.is_ascii_digit() || n == '.'))
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '-' | '.')
}

fn literal(ident: &str) -> Option<&'static str> {
    match ident {
        "true" | "True" | "TRUE" => Some("true"),
        "false" | "False" | "FALSE" => Some("false"),
        "null" | "Null" | "NULL" | "None" | "nil" | "undefined" | "NaN" | "Infinity" => {
            Some("null")
        }
        _ => None,
    }
}

/// Canonicalise a number literal, trimming characters left dangling by truncation.
fn normalise_number(raw: &str) -> Option<String> {
    let mut number = raw.trim_start_matches('+').to_string();
    while number.ends_with(['.', 'e', 'E', '+', '-']) {
        number.pop();
    }
    if number.starts_with('.') {
        number.insert(0, '0');
    } else if number.starts_with("-.") {
        number.insert(1, '0');
    }
    serde_json::from_str::<serde_json::Number>(&number)
        .is_ok()
        .then_some(number)
}

fn push_escaped_char(out: &mut String, c: char) {
    match c {
        '"' => out.push_str("\\\""),
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if u32::from(c) < 0x20 => out.push_str(&format!("\\u{:04x}", u32::from(c))),
        c => out.push(c),
    }
}

fn push_quoted(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        push_escaped_char(out, c);
    }
    out.push('"');
}
