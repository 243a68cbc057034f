use monk_lexer::Token;

/// Precedence ladder, lowest to highest. Deriving `Ord` on a fieldless enum
/// orders variants by declaration order, so `Precedence::Sum < Precedence::Product`
/// falls out for free.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

/// Precedence of `token` when it appears as an infix/postfix operator.
/// Tokens with no infix meaning (e.g. `;`) are `Lowest`, which is what stops
/// the Pratt loop from trying to continue past them.
pub fn precedence_of(token: &Token) -> Precedence {
    match token {
        Token::Eq | Token::NotEq => Precedence::Equals,
        Token::Lt | Token::Gt => Precedence::LessGreater,
        Token::Plus | Token::Minus => Precedence::Sum,
        Token::Slash | Token::Asterisk => Precedence::Product,
        Token::LParen => Precedence::Call,
        Token::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}
