//! A small expression language over JSON scopes.
//!
//! ```text
//! program  := operand ( '|' pipe )*
//! pipe     := ident ( ':' operand )?
//! operand  := literal | path
//! path     := ident ( '.' ident | '[' operand ']' )*
//! literal  := string | number | true | false | null
//! ```
//!
//! Identifiers resolve against the locals first and then the scope. Missing
//! paths evaluate to `null`, never to an error.
//!
//! Pipes:
//!
//! - `filter:needle` keeps array elements where any nested string, number or
//!   bool contains `needle`, case-insensitively. A null or empty needle keeps
//!   everything.
//! - `limitTo:n` keeps the first `n` elements of an array or characters of a
//!   string; a negative `n` keeps the last `n`.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::trace;

use crate::error::EvalError;
use crate::expression::{Expression, Locals};

/// A compiled expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
	head: Operand,
	pipes: Vec<Pipe>,
}

#[derive(Debug, Clone, PartialEq)]
enum Operand {
	Literal(Value),
	Path { root: String, segments: Vec<Segment> },
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
	Field(String),
	Index(Operand),
}

#[derive(Debug, Clone, PartialEq)]
enum Pipe {
	Filter(Option<Operand>),
	LimitTo(Option<Operand>),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
	Ident(String),
	Str(String),
	Num(f64),
	Dot,
	LBracket,
	RBracket,
	Pipe,
	Colon,
}

impl Token {
	fn describe(&self) -> String {
		match self {
			Token::Ident(name) => format!("identifier '{name}'"),
			Token::Str(s) => format!("string {s:?}"),
			Token::Num(n) => format!("number {n}"),
			Token::Dot => "'.'".to_string(),
			Token::LBracket => "'['".to_string(),
			Token::RBracket => "']'".to_string(),
			Token::Pipe => "'|'".to_string(),
			Token::Colon => "':'".to_string(),
		}
	}
}

fn is_ident_start(ch: char) -> bool {
	ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_continue(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

fn tokenize(source: &str) -> Result<Vec<Token>, EvalError> {
	let mut tokens = Vec::new();
	let mut chars = source.char_indices().peekable();

	while let Some(&(offset, ch)) = chars.peek() {
		match ch {
			c if c.is_whitespace() => {
				chars.next();
			}
			'.' => {
				chars.next();
				tokens.push(Token::Dot);
			}
			'[' => {
				chars.next();
				tokens.push(Token::LBracket);
			}
			']' => {
				chars.next();
				tokens.push(Token::RBracket);
			}
			'|' => {
				chars.next();
				tokens.push(Token::Pipe);
			}
			':' => {
				chars.next();
				tokens.push(Token::Colon);
			}
			'\'' | '"' => {
				let quote = ch;
				chars.next();
				let mut text = String::new();
				let mut closed = false;
				while let Some((_, c)) = chars.next() {
					match c {
						'\\' => {
							if let Some((_, escaped)) = chars.next() {
								text.push(escaped);
							}
						}
						c if c == quote => {
							closed = true;
							break;
						}
						c => text.push(c),
					}
				}
				if !closed {
					return Err(EvalError::UnterminatedString(offset));
				}
				tokens.push(Token::Str(text));
			}
			c if c.is_ascii_digit() || c == '-' => {
				let mut text = String::new();
				text.push(c);
				chars.next();
				while let Some(&(_, c)) = chars.peek() {
					if c.is_ascii_digit() || c == '.' {
						text.push(c);
						chars.next();
					} else {
						break;
					}
				}
				let n = text
					.parse::<f64>()
					.map_err(|_| EvalError::InvalidNumber(text.clone()))?;
				tokens.push(Token::Num(n));
			}
			c if is_ident_start(c) => {
				let mut name = String::new();
				while let Some(&(_, c)) = chars.peek() {
					if is_ident_continue(c) {
						name.push(c);
						chars.next();
					} else {
						break;
					}
				}
				tokens.push(Token::Ident(name));
			}
			ch => return Err(EvalError::UnexpectedChar { ch, offset }),
		}
	}

	Ok(tokens)
}

struct Parser<'a> {
	tokens: Vec<Token>,
	pos: usize,
	source: &'a str,
}

impl Parser<'_> {
	fn peek(&self) -> Option<&Token> {
		self.tokens.get(self.pos)
	}

	fn bump(&mut self) -> Option<Token> {
		let token = self.tokens.get(self.pos).cloned();
		self.pos += 1;
		token
	}

	fn unexpected(&self, token: Option<&Token>) -> EvalError {
		EvalError::UnexpectedToken {
			found: token.map_or_else(|| "end of input".to_string(), Token::describe),
			source_text: self.source.to_string(),
		}
	}

	fn program(&mut self) -> Result<Program, EvalError> {
		let head = self.operand()?;
		let mut pipes = Vec::new();
		while let Some(token) = self.bump() {
			if token != Token::Pipe {
				return Err(self.unexpected(Some(&token)));
			}
			pipes.push(self.pipe()?);
		}
		Ok(Program { head, pipes })
	}

	fn pipe(&mut self) -> Result<Pipe, EvalError> {
		let name = match self.bump() {
			Some(Token::Ident(name)) => name,
			other => return Err(self.unexpected(other.as_ref())),
		};
		let arg = if self.peek() == Some(&Token::Colon) {
			self.pos += 1;
			Some(self.operand()?)
		} else {
			None
		};
		match name.as_str() {
			"filter" => Ok(Pipe::Filter(arg)),
			"limitTo" => Ok(Pipe::LimitTo(arg)),
			_ => Err(EvalError::UnknownPipe(name)),
		}
	}

	fn operand(&mut self) -> Result<Operand, EvalError> {
		match self.bump() {
			Some(Token::Str(s)) => Ok(Operand::Literal(Value::String(s))),
			Some(Token::Num(n)) => Ok(Operand::Literal(number(n))),
			Some(Token::Ident(name)) => match name.as_str() {
				"true" => Ok(Operand::Literal(Value::Bool(true))),
				"false" => Ok(Operand::Literal(Value::Bool(false))),
				"null" | "undefined" => Ok(Operand::Literal(Value::Null)),
				_ => self.path(name),
			},
			other => Err(self.unexpected(other.as_ref())),
		}
	}

	fn path(&mut self, root: String) -> Result<Operand, EvalError> {
		let mut segments = Vec::new();
		loop {
			match self.peek() {
				Some(Token::Dot) => {
					self.pos += 1;
					match self.bump() {
						Some(Token::Ident(field)) => segments.push(Segment::Field(field)),
						other => return Err(self.unexpected(other.as_ref())),
					}
				}
				Some(Token::LBracket) => {
					self.pos += 1;
					let index = self.operand()?;
					match self.bump() {
						Some(Token::RBracket) => segments.push(Segment::Index(index)),
						other => return Err(self.unexpected(other.as_ref())),
					}
				}
				_ => break,
			}
		}
		Ok(Operand::Path { root, segments })
	}
}

fn number(n: f64) -> Value {
	if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
		Value::from(n as i64)
	} else {
		serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
	}
}

impl Program {
	/// Compiles expression source text.
	///
	/// # Errors
	///
	/// Returns an [`EvalError`] when the source is empty or malformed, or
	/// names an unknown pipe.
	pub fn compile(source: &str) -> Result<Self, EvalError> {
		let tokens = tokenize(source)?;
		if tokens.is_empty() {
			return Err(EvalError::Empty);
		}
		Parser {
			tokens,
			pos: 0,
			source,
		}
		.program()
	}

	/// Evaluates the program against `scope`, with `locals` shadowing it.
	pub fn evaluate(&self, scope: &Value, locals: &Locals) -> Value {
		let mut value = self.head.evaluate(scope, locals);
		for pipe in &self.pipes {
			value = pipe.apply(value, scope, locals);
		}
		value
	}
}

impl Operand {
	fn evaluate(&self, scope: &Value, locals: &Locals) -> Value {
		match self {
			Operand::Literal(value) => value.clone(),
			Operand::Path { root, segments } => {
				let Some(mut current) = locals.get(root).or_else(|| scope.get(root)) else {
					return Value::Null;
				};
				for segment in segments {
					let next = match segment {
						Segment::Field(field) => current.get(field),
						Segment::Index(index) => match index.evaluate(scope, locals) {
							Value::Number(n) => n
								.as_u64()
								.and_then(|i| usize::try_from(i).ok())
								.and_then(|i| current.get(i)),
							Value::String(key) => current.get(&key),
							_ => None,
						},
					};
					match next {
						Some(value) => current = value,
						None => return Value::Null,
					}
				}
				current.clone()
			}
		}
	}
}

impl Pipe {
	fn apply(&self, input: Value, scope: &Value, locals: &Locals) -> Value {
		match self {
			Pipe::Filter(arg) => {
				let needle = arg.as_ref().map(|a| a.evaluate(scope, locals));
				filter(input, needle)
			}
			Pipe::LimitTo(arg) => {
				let limit = arg
					.as_ref()
					.map(|a| a.evaluate(scope, locals))
					.and_then(|v| v.as_i64().or_else(|| v.as_str()?.trim().parse().ok()));
				match limit {
					Some(limit) => limit_to(input, limit),
					None => input,
				}
			}
		}
	}
}

fn needle_text(needle: &Value) -> Option<String> {
	match needle {
		Value::Null => None,
		Value::String(s) if s.is_empty() => None,
		Value::String(s) => Some(s.to_lowercase()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Array(_) | Value::Object(_) => None,
	}
}

fn contains_text(value: &Value, needle: &str) -> bool {
	match value {
		Value::Null => false,
		Value::String(s) => s.to_lowercase().contains(needle),
		Value::Number(n) => n.to_string().contains(needle),
		Value::Bool(b) => b.to_string().contains(needle),
		Value::Array(items) => items.iter().any(|v| contains_text(v, needle)),
		Value::Object(map) => map.values().any(|v| contains_text(v, needle)),
	}
}

fn filter(input: Value, needle: Option<Value>) -> Value {
	let Some(needle) = needle.as_ref().and_then(needle_text) else {
		return input;
	};
	match input {
		Value::Array(items) => Value::Array(
			items
				.into_iter()
				.filter(|item| contains_text(item, &needle))
				.collect(),
		),
		other => other,
	}
}

fn limit_to(input: Value, limit: i64) -> Value {
	let take = |len: usize| -> std::ops::Range<usize> {
		let n = usize::try_from(limit.unsigned_abs()).unwrap_or(usize::MAX).min(len);
		if limit >= 0 { 0..n } else { len - n..len }
	};
	match input {
		Value::Array(items) => {
			let range = take(items.len());
			Value::Array(items[range].to_vec())
		}
		Value::String(s) => {
			let chars: Vec<char> = s.chars().collect();
			let range = take(chars.len());
			Value::String(chars[range].iter().collect())
		}
		other => other,
	}
}

/// Compiled programs keyed by expression source.
///
/// Hosts evaluate the same handful of expressions for every keystroke and
/// every match, so compilation happens once per distinct source.
#[derive(Debug, Default)]
pub struct ProgramCache {
	programs: Mutex<FxHashMap<Arc<str>, Arc<Program>>>,
}

impl ProgramCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the compiled program for `expr`, compiling it on first use.
	///
	/// # Errors
	///
	/// Propagates compilation errors; failures are not cached.
	pub fn get(&self, expr: &Expression) -> Result<Arc<Program>, EvalError> {
		if let Some(program) = self.programs.lock().get(expr.source()) {
			return Ok(Arc::clone(program));
		}
		let program = Arc::new(Program::compile(expr.source())?);
		trace!(source = expr.source(), "compiled expression");
		self.programs
			.lock()
			.insert(Arc::from(expr.source()), Arc::clone(&program));
		Ok(program)
	}

	/// Number of compiled programs held.
	pub fn len(&self) -> usize {
		self.programs.lock().len()
	}

	/// Returns true when nothing has been compiled yet.
	pub fn is_empty(&self) -> bool {
		self.programs.lock().is_empty()
	}
}
