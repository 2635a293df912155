//! Tokenizer and recursive descent parser for keypad expressions

use crate::core::{CalcError, CalcResult};

/// Binary operators accepted by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (*)
    Multiply,
    /// Division (/)
    Divide,
}

impl BinaryOp {
    /// Returns the operator symbol
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Maps a symbol back to its operator
    #[must_use]
    pub const fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            _ => None,
        }
    }
}

/// Token types from lexical analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(f64),
    /// Operator symbol
    Operator(BinaryOp),
    /// Left parenthesis
    LeftParen,
    /// Right parenthesis
    RightParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Operator(op) => write!(f, "'{}'", op.symbol()),
            Self::LeftParen => f.write_str("'('"),
            Self::RightParen => f.write_str("')'"),
        }
    }
}

/// Abstract syntax tree node
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Numeric literal
    Number(f64),
    /// Binary operation
    Binary {
        /// Left operand
        left: Box<AstNode>,
        /// Operator
        op: BinaryOp,
        /// Right operand
        right: Box<AstNode>,
    },
    /// Unary negation
    Negate(Box<AstNode>),
}

impl AstNode {
    /// Creates a binary operation node
    #[must_use]
    pub fn binary(left: AstNode, op: BinaryOp, right: AstNode) -> Self {
        Self::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates a negation node
    #[must_use]
    pub fn negate(inner: AstNode) -> Self {
        Self::Negate(Box::new(inner))
    }

    // Moves the children out, leaving number leaves behind
    fn detach_children(&mut self, out: &mut Vec<AstNode>) {
        match self {
            Self::Number(_) => {}
            Self::Negate(inner) => out.push(std::mem::replace(&mut **inner, Self::Number(0.0))),
            Self::Binary { left, right, .. } => {
                out.push(std::mem::replace(&mut **left, Self::Number(0.0)));
                out.push(std::mem::replace(&mut **right, Self::Number(0.0)));
            }
        }
    }
}

// Long operator chains build left-deep trees; drop them without recursing
impl Drop for AstNode {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        self.detach_children(&mut detached);
        while let Some(mut node) = detached.pop() {
            node.detach_children(&mut detached);
        }
    }
}

/// Splits an expression string into tokens
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenizes the entire input
    pub fn tokenize(mut self) -> CalcResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> CalcResult<Option<Token>> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        let token = match ch {
            '0'..='9' | '.' => return self.read_number().map(Some),
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            _ => match BinaryOp::from_symbol(ch) {
                Some(op) => Token::Operator(op),
                None => return Err(CalcError::parse(format!("unexpected character '{ch}'"))),
            },
        };
        self.advance();

        Ok(Some(token))
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    // A literal may start or end with its dot (`.5`, `5.`) but not be a lone dot
    fn read_number(&mut self) -> CalcResult<Token> {
        let start = self.pos;
        let mut seen_dot = false;

        while let Some(ch) = self.current_char() {
            match ch {
                '0'..='9' => self.advance(),
                '.' if seen_dot => {
                    return Err(CalcError::parse(format!(
                        "malformed number '{}'",
                        &self.input[start..=self.pos]
                    )));
                }
                '.' => {
                    seen_dot = true;
                    self.advance();
                }
                _ => break,
            }
        }

        let literal = &self.input[start..self.pos];
        let value = if literal == "." {
            None
        } else if let Some(stripped) = literal.strip_suffix('.') {
            stripped.parse().ok()
        } else {
            literal.parse().ok()
        };

        value
            .map(Token::Number)
            .ok_or_else(|| CalcError::parse(format!("malformed number '{literal}'")))
    }
}

/// Deepest nesting of parentheses and stacked signs the parser accepts
pub const MAX_DEPTH: usize = 256;

/// Recursive descent parser
///
/// Grammar:
/// ```text
/// expression ::= term (('+' | '-') term)*
/// term       ::= unary (('*' | '/') unary)*
/// unary      ::= ('+' | '-') unary | primary
/// primary    ::= NUMBER | '(' expression ')'
/// ```
///
/// Parentheses and signs together may nest at most [`MAX_DEPTH`] levels.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parses a string expression into an AST
    pub fn parse_str(input: &str) -> CalcResult<AstNode> {
        let tokens = Tokenizer::new(input).tokenize()?;
        Self::new(tokens).parse()
    }

    /// Parses all tokens into a single expression
    pub fn parse(&mut self) -> CalcResult<AstNode> {
        if self.tokens.is_empty() {
            return Err(CalcError::EmptyExpression);
        }

        let ast = self.parse_expression()?;

        if let Some(token) = self.current() {
            return Err(CalcError::parse(format!(
                "unexpected {token} at position {}",
                self.pos
            )));
        }

        Ok(ast)
    }

    fn current(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.current();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_expression(&mut self) -> CalcResult<AstNode> {
        let mut left = self.parse_term()?;

        while let Some(Token::Operator(op @ (BinaryOp::Add | BinaryOp::Subtract))) = self.current()
        {
            self.advance();
            let right = self.parse_term()?;
            left = AstNode::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> CalcResult<AstNode> {
        let mut left = self.parse_unary()?;

        while let Some(Token::Operator(op @ (BinaryOp::Multiply | BinaryOp::Divide))) =
            self.current()
        {
            self.advance();
            let right = self.parse_unary()?;
            left = AstNode::binary(left, op, right);
        }

        Ok(left)
    }

    // Runs of signs fold into at most one negation
    fn parse_unary(&mut self) -> CalcResult<AstNode> {
        let mut signs = 0;
        let mut negated = false;
        while let Some(Token::Operator(op @ (BinaryOp::Add | BinaryOp::Subtract))) = self.current()
        {
            self.advance();
            signs += 1;
            negated ^= op == BinaryOp::Subtract;
        }

        let operand = self.nested(signs, Self::parse_primary)?;
        Ok(if negated {
            AstNode::negate(operand)
        } else {
            operand
        })
    }

    fn parse_primary(&mut self) -> CalcResult<AstNode> {
        let token = self
            .advance()
            .ok_or_else(|| CalcError::parse("unexpected end of expression"))?;

        match token {
            Token::Number(n) => Ok(AstNode::Number(n)),
            Token::LeftParen => {
                let inner = self.nested(1, Self::parse_expression)?;
                match self.advance() {
                    Some(Token::RightParen) => Ok(inner),
                    Some(other) => Err(CalcError::parse(format!("expected ')' but found {other}"))),
                    None => Err(CalcError::parse("unclosed parenthesis")),
                }
            }
            other => Err(CalcError::parse(format!("unexpected {other}"))),
        }
    }

    fn nested(
        &mut self,
        levels: usize,
        parse: fn(&mut Self) -> CalcResult<AstNode>,
    ) -> CalcResult<AstNode> {
        if self.depth + levels > MAX_DEPTH {
            return Err(CalcError::parse("expression nested too deeply"));
        }
        self.depth += levels;
        let result = parse(self);
        self.depth -= levels;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Tokenizer::new(input).tokenize().unwrap()
    }

    // ===== BinaryOp tests =====

    #[test]
    fn test_binary_op_symbol_round_trip() {
        for op in [
            BinaryOp::Add,
            BinaryOp::Subtract,
            BinaryOp::Multiply,
            BinaryOp::Divide,
        ] {
            assert_eq!(BinaryOp::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(BinaryOp::from_symbol('%'), None);
    }

    // ===== Tokenizer tests =====

    #[test]
    fn test_tokenize_simple_expression() {
        assert_eq!(
            tokens("2+3*4"),
            vec![
                Token::Number(2.0),
                Token::Operator(BinaryOp::Add),
                Token::Number(3.0),
                Token::Operator(BinaryOp::Multiply),
                Token::Number(4.0),
            ]
        );
    }

    #[test]
    fn test_tokenize_skips_whitespace() {
        assert_eq!(tokens("  7 /  2 "), tokens("7/2"));
    }

    #[test]
    fn test_tokenize_decimal_forms() {
        assert_eq!(tokens("1.5"), vec![Token::Number(1.5)]);
        assert_eq!(tokens(".5"), vec![Token::Number(0.5)]);
        assert_eq!(tokens("5."), vec![Token::Number(5.0)]);
        assert_eq!(tokens("007"), vec![Token::Number(7.0)]);
    }

    #[test]
    fn test_tokenize_parentheses() {
        assert_eq!(
            tokens("(1)"),
            vec![Token::LeftParen, Token::Number(1.0), Token::RightParen]
        );
    }

    #[test]
    fn test_tokenize_lone_dot_is_error() {
        assert!(matches!(
            Tokenizer::new(".").tokenize(),
            Err(CalcError::Parse(_))
        ));
        assert!(matches!(
            Tokenizer::new("1+.").tokenize(),
            Err(CalcError::Parse(_))
        ));
    }

    #[test]
    fn test_tokenize_double_dot_is_error() {
        assert!(matches!(
            Tokenizer::new("1.2.3").tokenize(),
            Err(CalcError::Parse(_))
        ));
        assert!(matches!(
            Tokenizer::new("1..2").tokenize(),
            Err(CalcError::Parse(_))
        ));
    }

    #[test]
    fn test_tokenize_rejects_foreign_characters() {
        for input in ["2^3", "alert(1)", "1%2", "2×3"] {
            assert!(
                matches!(Tokenizer::new(input).tokenize(), Err(CalcError::Parse(_))),
                "{input} should not tokenize"
            );
        }
    }

    // ===== Parser tests =====

    #[test]
    fn test_parse_precedence() {
        let ast = Parser::parse_str("2+3*4").unwrap();
        assert_eq!(
            ast,
            AstNode::binary(
                AstNode::Number(2.0),
                BinaryOp::Add,
                AstNode::binary(AstNode::Number(3.0), BinaryOp::Multiply, AstNode::Number(4.0)),
            )
        );
    }

    #[test]
    fn test_parse_left_associative() {
        let ast = Parser::parse_str("8-4-2").unwrap();
        assert_eq!(
            ast,
            AstNode::binary(
                AstNode::binary(AstNode::Number(8.0), BinaryOp::Subtract, AstNode::Number(4.0)),
                BinaryOp::Subtract,
                AstNode::Number(2.0),
            )
        );
    }

    #[test]
    fn test_parse_unary_signs() {
        assert_eq!(
            Parser::parse_str("-5").unwrap(),
            AstNode::negate(AstNode::Number(5.0))
        );
        assert_eq!(Parser::parse_str("+5").unwrap(), AstNode::Number(5.0));
        assert_eq!(Parser::parse_str("--5").unwrap(), AstNode::Number(5.0));
        assert_eq!(
            Parser::parse_str("-+-+-5").unwrap(),
            AstNode::negate(AstNode::Number(5.0))
        );
        assert!(Parser::parse_str("2*-3").is_ok());
        assert!(Parser::parse_str("2+-3").is_ok());
    }

    #[test]
    fn test_parse_parentheses() {
        let ast = Parser::parse_str("(2+3)*4").unwrap();
        assert!(matches!(
            ast,
            AstNode::Binary {
                op: BinaryOp::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_empty_is_empty_expression() {
        assert_eq!(Parser::parse_str(""), Err(CalcError::EmptyExpression));
        assert_eq!(Parser::parse_str("   "), Err(CalcError::EmptyExpression));
    }

    #[test]
    fn test_parse_malformed_expressions() {
        for input in ["2+", "*/", "*2", "2*", "(2", "2)", "()", "2 3", "(1+2))"] {
            assert!(
                matches!(Parser::parse_str(input), Err(CalcError::Parse(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_error_messages() {
        let err = Parser::parse_str("(1+2").unwrap_err();
        assert_eq!(err, CalcError::parse("unclosed parenthesis"));

        let err = Parser::parse_str("2+").unwrap_err();
        assert_eq!(err, CalcError::parse("unexpected end of expression"));
    }

    // ===== Nesting limit tests =====

    #[test]
    fn test_parse_nesting_at_limit() {
        let parens = format!("{}7{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(Parser::parse_str(&parens).unwrap(), AstNode::Number(7.0));

        let signs = format!("{}7", "-".repeat(MAX_DEPTH));
        assert_eq!(Parser::parse_str(&signs).unwrap(), AstNode::Number(7.0));
    }

    #[test]
    fn test_parse_rejects_deep_nesting() {
        let too_deep = CalcError::parse("expression nested too deeply");

        let parens = format!("{}7{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(Parser::parse_str(&parens), Err(too_deep.clone()));
        assert_eq!(Parser::parse_str(&"(".repeat(10_000)), Err(too_deep.clone()));
        assert_eq!(
            Parser::parse_str(&format!("{}1", "-".repeat(100_000))),
            Err(too_deep.clone())
        );

        // Signs inside parentheses count toward the same limit
        let mixed = "(-".repeat(MAX_DEPTH / 2 + 1) + "1";
        assert_eq!(Parser::parse_str(&mixed), Err(too_deep));
    }

    #[test]
    fn test_parse_long_chain_is_not_nesting() {
        let chain = format!("{}1", "1+".repeat(50_000));
        let ast = Parser::parse_str(&chain).unwrap();
        assert!(matches!(ast, AstNode::Binary { op: BinaryOp::Add, .. }));
        drop(ast);
    }
}
