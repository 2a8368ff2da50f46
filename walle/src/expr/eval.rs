use crate::agent::Agent;
use crate::constants::MAX_EXPRESSION_DEPTH;
use crate::error::{Result, WallError};
use crate::variables::{Value, Variables};

use super::lexer::{Token, render, tokenize};

/// Evaluates numeric and boolean expressions against one run's state.
///
/// Binary operators are split at every operator of the loosest tier outside
/// parentheses and folded from the left:
///
/// - `||` (loosest), then `&&`
/// - comparisons `==` `!=` `<=` `>=` `<` `>` (first one wins)
/// - `+` `-`, then `*` `/` `%`, then `**` (tightest)
///
/// A parenthesized comparison or logic expression used as a number yields 1 or 0.
pub struct Evaluator<'a> {
    variables: &'a Variables,
    agent: &'a Agent,
}

impl<'a> Evaluator<'a> {
    pub fn new(variables: &'a Variables, agent: &'a Agent) -> Self {
        Evaluator { variables, agent }
    }

    fn lex(&self, source: &str) -> Result<Vec<Token>> {
        tokenize(source, |name| self.variables.exists(name))
    }

    pub fn evaluate_numeric(&self, source: &str) -> Result<i64> {
        let tokens = self.lex(source)?;
        self.numeric(&tokens, 0)
    }

    pub fn evaluate_boolean(&self, source: &str) -> Result<bool> {
        let tokens = self.lex(source)?;
        self.boolean(&tokens, 0)
    }

    /// Evaluates with whichever type the expression's outermost operator produces.
    pub fn evaluate(&self, source: &str) -> Result<Value> {
        let tokens = self.lex(source)?;
        let mut outer: &[Token] = &tokens;
        while let Some(inner) = unwrap_parens(outer) {
            outer = inner;
        }

        let is_boolean = has_top_level(outer, |t| t.is_logical() || t.is_comparison())
            || match outer {
                [Token::True] | [Token::False] => true,
                [Token::Identifier(name)] => {
                    matches!(self.variables.get(name), Ok(Value::Bool(_)))
                }
                _ => false,
            };

        if is_boolean {
            self.boolean(&tokens, 0).map(Value::Bool)
        } else {
            self.numeric(&tokens, 0).map(Value::Int)
        }
    }

    fn numeric(&self, tokens: &[Token], depth: usize) -> Result<i64> {
        if depth > MAX_EXPRESSION_DEPTH {
            return Err(WallError::ExpressionTooDeep);
        }
        if tokens.is_empty() {
            return Err(WallError::InvalidExpression("empty expression".to_string()));
        }

        if has_top_level(tokens, |t| t.is_logical() || t.is_comparison()) {
            return self.boolean(tokens, depth + 1).map(i64::from);
        }

        let additive = top_level_positions(tokens, |i, t| match t {
            Token::Plus => true,
            Token::Minus => i > 0 && tokens[i - 1].ends_operand(),
            _ => false,
        });
        if !additive.is_empty() {
            return self.chain(tokens, &additive, depth);
        }

        let multiplicative = top_level_positions(tokens, |_, t| {
            matches!(t, Token::Star | Token::Slash | Token::Percent)
        });
        if !multiplicative.is_empty() {
            return self.chain(tokens, &multiplicative, depth);
        }

        let powers = top_level_positions(tokens, |_, t| *t == Token::StarStar);
        if !powers.is_empty() {
            return self.chain(tokens, &powers, depth);
        }

        match tokens {
            [Token::Minus, rest @ ..] => self
                .numeric(rest, depth + 1)?
                .checked_neg()
                .ok_or(WallError::Overflow),
            [Token::Plus, rest @ ..] => self.numeric(rest, depth + 1),
            [Token::Number(n)] => Ok(*n),
            [Token::Identifier(name)] => self.variables.get_int(name),
            [literal @ (Token::True | Token::False)] => Err(WallError::TypeMismatch {
                name: literal.to_string(),
                expected: "an integer",
            }),
            _ => {
                if let Some(inner) = unwrap_parens(tokens) {
                    return self.numeric(inner, depth + 1);
                }
                if let [Token::Identifier(name), rest @ ..] = tokens {
                    if let Some(args) = unwrap_parens(rest) {
                        return self.call(name, args, depth + 1);
                    }
                }
                Err(WallError::InvalidExpression(render(tokens)))
            }
        }
    }

    /// Folds operands of one precedence tier from the left. Only nesting
    /// counts towards the depth limit, not the length of the chain.
    fn chain(&self, tokens: &[Token], at: &[usize], depth: usize) -> Result<i64> {
        let parts = operands(tokens, at);
        let mut value = self.numeric(parts[0], depth)?;
        for (&i, part) in at.iter().zip(&parts[1..]) {
            let right = self.numeric(part, depth)?;
            value = apply(&tokens[i], value, right)?;
        }
        Ok(value)
    }

    fn boolean(&self, tokens: &[Token], depth: usize) -> Result<bool> {
        if depth > MAX_EXPRESSION_DEPTH {
            return Err(WallError::ExpressionTooDeep);
        }
        if tokens.is_empty() {
            return Err(WallError::InvalidExpression("empty condition".to_string()));
        }

        let ors = top_level_positions(tokens, |_, t| *t == Token::OrOr);
        if !ors.is_empty() {
            for part in operands(tokens, &ors) {
                if self.boolean(part, depth)? {
                    return Ok(true);
                }
            }
            return Ok(false);
        }
        let ands = top_level_positions(tokens, |_, t| *t == Token::AndAnd);
        if !ands.is_empty() {
            for part in operands(tokens, &ands) {
                if !self.boolean(part, depth)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        }

        if let Some(i) = leftmost_top_level(tokens, Token::is_comparison) {
            let left = self.numeric(&tokens[..i], depth + 1)?;
            let right = self.numeric(&tokens[i + 1..], depth + 1)?;
            return Ok(match tokens[i] {
                Token::Equal => left == right,
                Token::NotEqual => left != right,
                Token::LessEqual => left <= right,
                Token::GreaterEqual => left >= right,
                Token::Less => left < right,
                _ => left > right,
            });
        }

        match tokens {
            [Token::True] => Ok(true),
            [Token::False] => Ok(false),
            [Token::Identifier(name)]
                if matches!(self.variables.get(name), Ok(Value::Bool(_))) =>
            {
                self.variables.get_bool(name)
            }
            _ => match unwrap_parens(tokens) {
                Some(inner) => self.boolean(inner, depth + 1),
                None => Ok(self.numeric(tokens, depth + 1)? != 0),
            },
        }
    }

    /// Built-in queries; `args` is the token slice between the call's parentheses.
    fn call(&self, name: &str, args: &[Token], depth: usize) -> Result<i64> {
        let args = split_top_level_commas(args);
        let expect = |expected: usize| -> Result<()> {
            if args.len() != expected {
                return Err(WallError::ArgumentCount {
                    function: name.to_string(),
                    expected,
                    found: args.len(),
                });
            }
            Ok(())
        };
        let number = |arg: &[Token]| self.numeric(arg, depth + 1);

        match name {
            "GetActualX" => {
                expect(0)?;
                Ok(self.agent.x())
            }
            "GetActualY" => {
                expect(0)?;
                Ok(self.agent.y())
            }
            "GetCanvasSize" => {
                expect(0)?;
                Ok(self.agent.canvas_size())
            }
            "IsBrushColor" => {
                expect(1)?;
                self.agent.is_brush_color(color_argument(args[0])?)
            }
            "IsBrushSize" => {
                expect(1)?;
                Ok(self.agent.is_brush_size(number(args[0])?))
            }
            "IsCanvasColor" => {
                expect(3)?;
                self.agent.is_canvas_color(
                    color_argument(args[0])?,
                    number(args[1])?,
                    number(args[2])?,
                )
            }
            "GetColorCount" => {
                expect(5)?;
                self.agent.get_color_count(
                    color_argument(args[0])?,
                    number(args[1])?,
                    number(args[2])?,
                    number(args[3])?,
                    number(args[4])?,
                )
            }
            _ => Err(WallError::UnknownFunction(name.to_string())),
        }
    }
}

fn color_argument(arg: &[Token]) -> Result<&str> {
    match arg {
        [Token::Str(name)] | [Token::Identifier(name)] => Ok(name),
        _ => Err(WallError::InvalidExpression(format!(
            "expected a color name, found '{}'",
            render(arg)
        ))),
    }
}

fn apply(op: &Token, left: i64, right: i64) -> Result<i64> {
    let result = match op {
        Token::Plus => left.checked_add(right),
        Token::Minus => left.checked_sub(right),
        Token::Star => left.checked_mul(right),
        Token::Slash | Token::Percent if right == 0 => return Err(WallError::DivideByZero),
        Token::Slash => left.checked_div(right),
        Token::Percent => left.checked_rem(right),
        // Real exponentiation truncated back to an integer; huge results saturate.
        Token::StarStar => Some((left as f64).powf(right as f64) as i64),
        _ => return Err(WallError::InvalidExpression(op.to_string())),
    };
    result.ok_or(WallError::Overflow)
}

/// Indices of every token outside parentheses accepted by `pred`.
fn top_level_positions(tokens: &[Token], pred: impl Fn(usize, &Token) -> bool) -> Vec<usize> {
    let mut depth = 0i32;
    let mut found = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            _ if depth == 0 && pred(i, token) => found.push(i),
            _ => {}
        }
    }
    found
}

/// The slices between the operator tokens at `at`.
fn operands<'t>(tokens: &'t [Token], at: &[usize]) -> Vec<&'t [Token]> {
    let mut parts = Vec::with_capacity(at.len() + 1);
    let mut start = 0;
    for &i in at {
        parts.push(&tokens[start..i]);
        start = i + 1;
    }
    parts.push(&tokens[start..]);
    parts
}

fn leftmost_top_level(tokens: &[Token], pred: impl Fn(&Token) -> bool) -> Option<usize> {
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            _ if depth == 0 && pred(token) => return Some(i),
            _ => {}
        }
    }
    None
}

fn has_top_level(tokens: &[Token], pred: impl Fn(&Token) -> bool) -> bool {
    leftmost_top_level(tokens, pred).is_some()
}

/// The inside of `( ... )` when the first parenthesis closes at the very end.
fn unwrap_parens(tokens: &[Token]) -> Option<&[Token]> {
    let [Token::LParen, .., Token::RParen] = tokens else {
        return None;
    };
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return (i == tokens.len() - 1).then(|| &tokens[1..i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level_commas(tokens: &[Token]) -> Vec<&[Token]> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            Token::Comma if depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(source: &str) -> Result<i64> {
        let vars = Variables::new();
        let agent = Agent::new(10);
        Evaluator::new(&vars, &agent).evaluate_numeric(source)
    }

    fn boolean(source: &str) -> Result<bool> {
        let vars = Variables::new();
        let agent = Agent::new(10);
        Evaluator::new(&vars, &agent).evaluate_boolean(source)
    }

    #[test]
    fn precedence_and_parentheses() {
        assert_eq!(numeric("3 + 4 * 2"), Ok(11));
        assert_eq!(numeric("(3 + 4) * 2"), Ok(14));
        assert_eq!(numeric("7 / 2"), Ok(3));
        assert_eq!(numeric("7 % 2"), Ok(1));
        assert_eq!(numeric("2 ** 3"), Ok(8));
        assert_eq!(numeric("2 * 3 ** 2"), Ok(18));
        assert_eq!(numeric("((1 + 1) * (2 + 2))"), Ok(8));
    }

    #[test]
    fn left_associativity() {
        assert_eq!(numeric("10 - 3 - 2"), Ok(5));
        assert_eq!(numeric("100 / 10 / 5"), Ok(2));
        assert_eq!(numeric("2 ** 3 ** 2"), Ok(64));
    }

    #[test]
    fn unary_minus() {
        assert_eq!(numeric("-5"), Ok(-5));
        assert_eq!(numeric("3 * -2"), Ok(-6));
        assert_eq!(numeric("-3 - -2"), Ok(-1));
        assert_eq!(numeric("(-1)"), Ok(-1));
        assert_eq!(numeric("2 ** -1"), Ok(0));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(numeric("1 / 0"), Err(WallError::DivideByZero));
        assert_eq!(numeric("1 % (2 - 2)"), Err(WallError::DivideByZero));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(numeric("9223372036854775807 + 1"), Err(WallError::Overflow));
    }

    #[test]
    fn malformed_expressions() {
        assert!(matches!(numeric("1 +"), Err(WallError::InvalidExpression(_))));
        assert!(matches!(numeric("(1 2)"), Err(WallError::InvalidExpression(_))));
        assert!(matches!(numeric(""), Err(WallError::InvalidExpression(_))));
        assert_eq!(numeric("nope"), Err(WallError::UndefinedVariable("nope".into())));
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(boolean("1 < 2"), Ok(true));
        assert_eq!(boolean("2 + 2 == 4"), Ok(true));
        assert_eq!(boolean("1 >= 2 || 3 != 3"), Ok(false));
        assert_eq!(boolean("true && (1 <= 1)"), Ok(true));
        // && binds tighter than ||.
        assert_eq!(boolean("true || false && false"), Ok(true));
        assert_eq!(boolean("3"), Ok(true));
        assert_eq!(boolean("3 - 3"), Ok(false));
    }

    #[test]
    fn boolean_in_numeric_context_is_one_or_zero() {
        assert_eq!(numeric("(2 > 1) + (1 > 2) * 5"), Ok(1));
        assert_eq!(numeric("(1 == 1) * 7"), Ok(7));
    }

    #[test]
    fn variables_are_typed() {
        let mut vars = Variables::new();
        vars.assign("n", Value::Int(4)).unwrap();
        vars.assign("flag", Value::Bool(true)).unwrap();
        vars.assign("step-size", Value::Int(2)).unwrap();
        let agent = Agent::new(10);
        let eval = Evaluator::new(&vars, &agent);

        assert_eq!(eval.evaluate_numeric("n * n"), Ok(16));
        assert_eq!(eval.evaluate_numeric("step-size-1"), Ok(1));
        assert_eq!(eval.evaluate_boolean("flag"), Ok(true));
        assert_eq!(eval.evaluate_boolean("flag && n > 3"), Ok(true));
        assert!(matches!(
            eval.evaluate_numeric("flag + 1"),
            Err(WallError::TypeMismatch { .. })
        ));
        assert_eq!(eval.evaluate("n + 1"), Ok(Value::Int(5)));
        assert_eq!(eval.evaluate("(n > 1)"), Ok(Value::Bool(true)));
        assert_eq!(eval.evaluate("flag"), Ok(Value::Bool(true)));
        assert_eq!(eval.evaluate("false"), Ok(Value::Bool(false)));
    }

    #[test]
    fn builtin_queries() {
        let vars = Variables::new();
        let mut agent = Agent::new(20);
        agent.spawn(3, 4).unwrap();
        let eval = Evaluator::new(&vars, &agent);

        assert_eq!(eval.evaluate_numeric("GetActualX() + GetActualY()"), Ok(7));
        assert_eq!(eval.evaluate_numeric("GetCanvasSize()"), Ok(20));
        assert_eq!(eval.evaluate_numeric("IsBrushColor(\"Black\")"), Ok(1));
        assert_eq!(eval.evaluate_numeric("IsBrushSize(1 + 2)"), Ok(0));
        assert_eq!(eval.evaluate_numeric("IsCanvasColor(\"White\", 0, 1)"), Ok(1));
        assert_eq!(
            eval.evaluate_numeric("GetColorCount(\"White\", 0, 0, 1, 1) * 2"),
            Ok(8)
        );
        assert_eq!(eval.evaluate_boolean("GetActualX() == 3"), Ok(true));
        assert!(matches!(
            eval.evaluate_numeric("GetActualX(1)"),
            Err(WallError::ArgumentCount { expected: 0, found: 1, .. })
        ));
        assert_eq!(
            eval.evaluate_numeric("Teleport()"),
            Err(WallError::UnknownFunction("Teleport".into()))
        );
        assert_eq!(
            eval.evaluate_numeric("IsBrushColor(\"Mauve\")"),
            Err(WallError::UnknownColor("Mauve".into()))
        );
    }

    #[test]
    fn long_flat_chains_are_not_nesting() {
        let sum = vec!["1"; 300].join(" + ");
        assert_eq!(numeric(&sum), Ok(300));
        let product = format!("{} * 7", vec!["1"; 1000].join(" * "));
        assert_eq!(numeric(&product), Ok(7));
        let any = format!("{} || 1 == 1", vec!["1 > 2"; 400].join(" || "));
        assert_eq!(boolean(&any), Ok(true));
        let all = vec!["true"; 400].join(" && ");
        assert_eq!(boolean(&all), Ok(true));
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let source = format!("{}1{}", "(".repeat(400), ")".repeat(400));
        assert_eq!(numeric(&source), Err(WallError::ExpressionTooDeep));
    }
}
