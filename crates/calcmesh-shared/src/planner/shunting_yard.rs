//! Infix-to-postfix conversion (spec §4.1).
//!
//! Unary minus is resolved before the Shunting-Yard pass proper: a `-`
//! token is rewritten to `Token::Neg` whenever it sits where a value is
//! expected — at the very start of the expression, or right after `(` or
//! another operator — and left as binary subtraction everywhere else.

use super::errors::PlannerError;
use super::token::Token;
use crate::domain::Operation;

pub fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, PlannerError> {
    if tokens.is_empty() {
        return Err(PlannerError::EmptyExpression);
    }
    if tokens.len() < 3 {
        return Err(PlannerError::ShortExpression);
    }

    let tokens = resolve_unary_minus(tokens);

    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Token> = Vec::new();

    for tok in tokens {
        match &tok {
            Token::Number(_) => output.push(tok),
            Token::LParen => ops.push(tok),
            Token::RParen => {
                let mut closed = false;
                while let Some(top) = ops.pop() {
                    if matches!(top, Token::LParen) {
                        closed = true;
                        break;
                    }
                    output.push(top);
                }
                if !closed {
                    return Err(PlannerError::NoOpeningParenthesis);
                }
            }
            Token::Plus | Token::Minus | Token::Star | Token::Slash | Token::Neg => {
                let prec = Operation::from_token(&tok)
                    .expect("operator token always maps to an Operation")
                    .precedence();
                while let Some(top) = ops.last() {
                    if matches!(top, Token::LParen) {
                        break;
                    }
                    let top_prec = Operation::from_token(top)
                        .expect("operator token always maps to an Operation")
                        .precedence();
                    if top_prec >= prec {
                        output.push(ops.pop().expect("just peeked"));
                    } else {
                        break;
                    }
                }
                ops.push(tok);
            }
            Token::Unknown(_) => return Err(PlannerError::InvalidExpression),
        }
    }

    while let Some(top) = ops.pop() {
        if matches!(top, Token::LParen) {
            return Err(PlannerError::NoClosingParenthesis);
        }
        output.push(top);
    }

    Ok(output)
}

fn resolve_unary_minus(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    for (i, tok) in tokens.into_iter().enumerate() {
        if matches!(tok, Token::Minus) && expects_value(&out, i) {
            out.push(Token::Neg);
        } else {
            out.push(tok);
        }
    }
    out
}

/// True when the previous emitted token means "a value comes next": start
/// of expression, after `(`, or after another operator.
fn expects_value(emitted_so_far: &[Token], index: usize) -> bool {
    if index == 0 {
        return true;
    }
    match emitted_so_far.last() {
        Some(Token::LParen) => true,
        Some(t) if t.is_operator() => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(s: &str) -> Token {
        match s {
            "+" => Token::Plus,
            "-" => Token::Minus,
            "*" => Token::Star,
            "/" => Token::Slash,
            "(" => Token::LParen,
            ")" => Token::RParen,
            n => Token::Number(n.to_string()),
        }
    }

    fn toks(strs: &[&str]) -> Vec<Token> {
        strs.iter().map(|s| op(s)).collect()
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(to_postfix(vec![]).unwrap_err(), PlannerError::EmptyExpression);
    }

    #[test]
    fn rejects_too_short() {
        assert_eq!(
            to_postfix(toks(&["2", "+"])).unwrap_err(),
            PlannerError::ShortExpression
        );
    }

    #[test]
    fn converts_simple_precedence() {
        // 2+2*2 -> 2 2 2 * +
        let result = to_postfix(toks(&["2", "+", "2", "*", "2"])).unwrap();
        assert_eq!(
            result,
            vec![
                Token::Number("2".into()),
                Token::Number("2".into()),
                Token::Number("2".into()),
                Token::Star,
                Token::Plus,
            ]
        );
    }

    #[test]
    fn converts_parenthesized_expression() {
        // (52-49)*4-1 -> 52 49 - 4 * 1 -
        let result = to_postfix(toks(&["(", "52", "-", "49", ")", "*", "4", "-", "1"])).unwrap();
        assert_eq!(
            result,
            vec![
                Token::Number("52".into()),
                Token::Number("49".into()),
                Token::Minus,
                Token::Number("4".into()),
                Token::Star,
                Token::Number("1".into()),
                Token::Minus,
            ]
        );
    }

    #[test]
    fn resolves_leading_unary_minus() {
        // -3+4 -> 3 ~ 4 +
        let result = to_postfix(toks(&["-", "3", "+", "4"])).unwrap();
        assert_eq!(
            result,
            vec![
                Token::Number("3".into()),
                Token::Neg,
                Token::Number("4".into()),
                Token::Plus,
            ]
        );
    }

    #[test]
    fn missing_closing_paren_is_rejected() {
        assert_eq!(
            to_postfix(toks(&["(", "2", "+", "3"])).unwrap_err(),
            PlannerError::NoClosingParenthesis
        );
    }

    #[test]
    fn missing_opening_paren_is_rejected() {
        assert_eq!(
            to_postfix(toks(&["2", "+", "3", ")"])).unwrap_err(),
            PlannerError::NoOpeningParenthesis
        );
    }

    #[test]
    fn unknown_token_is_rejected() {
        assert_eq!(
            to_postfix(vec![
                Token::Number("2".into()),
                Token::Unknown("&".into()),
                Token::Number("2".into()),
            ])
            .unwrap_err(),
            PlannerError::InvalidExpression
        );
    }
}
