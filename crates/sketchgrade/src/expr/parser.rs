//! Grammar for formulas.
//!
//! The grammar accepts a superset of the evaluable language (comparisons, bitwise and
//! modulo operators, attribute access, subscripts) so that such inputs are reported as
//! unsupported constructs rather than as syntax errors.

/// Arithmetic operators of the evaluable subset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Ast {
    Number(f64),
    Name(String),
    Neg(Box<Ast>),
    Pos(Box<Ast>),
    Binary(BinOp, Box<Ast>, Box<Ast>),
    Call(String, Vec<Ast>),
    /// A parsed construct outside the arithmetic subset, with its operands.
    Unsupported(String, Vec<Ast>),
}

impl Ast {
    fn binary(op: &str, lhs: Ast, rhs: Ast) -> Ast {
        let op = match op {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "**" => BinOp::Pow,
            other => return Ast::Unsupported(format!("operator `{other}`"), vec![lhs, rhs]),
        };
        Ast::Binary(op, Box::new(lhs), Box::new(rhs))
    }
}

fn fold(first: Ast, rest: Vec<(&str, Ast)>) -> Ast {
    rest.into_iter()
        .fold(first, |lhs, (op, rhs)| Ast::binary(op, lhs, rhs))
}

peg::parser! {
    pub grammar formula() for str {
        rule _() = quiet!{ [' ' | '\t' | '\r' | '\n']* }

        /// A complete formula, surrounding whitespace allowed.
        pub rule root() -> Ast = _ e:comparison() _ { e }

        rule comparison() -> Ast
            = first:bitwise()
              rest:(_ op:$("<=" / ">=" / "==" / "!=" / "<" / ">") _ rhs:bitwise() { (op, rhs) })*
            { fold(first, rest) }

        rule bitwise() -> Ast
            = first:shift() rest:(_ op:$("|" / "^" / "&") _ rhs:shift() { (op, rhs) })*
            { fold(first, rest) }

        rule shift() -> Ast
            = first:sum() rest:(_ op:$("<<" / ">>") _ rhs:sum() { (op, rhs) })*
            { fold(first, rest) }

        rule sum() -> Ast
            = first:product() rest:(_ op:$("+" / "-") _ rhs:product() { (op, rhs) })*
            { fold(first, rest) }

        rule product() -> Ast
            = first:unary()
              rest:(_ op:$("//" / "*" !"*" / "/" / "%" / "@") _ rhs:unary() { (op, rhs) })*
            { fold(first, rest) }

        rule unary() -> Ast
            = "-" _ u:unary() { Ast::Neg(Box::new(u)) }
            / "+" _ u:unary() { Ast::Pos(Box::new(u)) }
            / "~" _ u:unary() { Ast::Unsupported("operator `~`".into(), vec![u]) }
            / power()

        /// Right-associative; the exponent may carry a sign as in `2**-x`.
        rule power() -> Ast
            = base:postfix() _ "**" _ exp:unary() { Ast::binary("**", base, exp) }
            / postfix()

        rule postfix() -> Ast
            = p:primary() suffix:(_ s:suffix() { s })* {
                if suffix.is_empty() {
                    p
                } else {
                    Ast::Unsupported(suffix.join(", "), vec![p])
                }
            }

        rule suffix() -> String
            = "." _ ident() { "attribute access".to_string() }
            / "[" _ comparison() _ "]" { "subscript".to_string() }

        rule primary() -> Ast
            = number()
            / call()
            / n:ident() { Ast::Name(n.to_string()) }
            / "(" _ e:comparison() _ ")" { e }

        rule call() -> Ast
            = f:ident() _ "(" _ args:(comparison() ** (_ "," _)) _ ")" {
                Ast::Call(f.to_string(), args)
            }

        rule ident() -> &'input str
            = $(['a'..='z' | 'A'..='Z' | '_'] ['a'..='z' | 'A'..='Z' | '0'..='9' | '_']*)

        rule number() -> Ast
            = n:$((['0'..='9']+ ("." ['0'..='9']*)? / "." ['0'..='9']+)
                  (['e' | 'E'] ['+' | '-']? ['0'..='9']+)?) {?
                n.parse::<f64>().map(Ast::Number).or(Err("number"))
            }
    }
}
