//! Directive-language parser.
//!
//! The template dialect is a small handlebars-like subset:
//! `{{field}}` placeholders (dotted paths, `this` for the current element),
//! `{{#if expr}} … {{else}} … {{/if}}` conditionals where `expr` may carry a
//! `.length` suffix testing array non-emptiness, and
//! `{{#each array}} … {{/each}}` repeated blocks.
//!
//! Templates are parsed into a directive tree and evaluated against the
//! document data, so malformed structure is caught up front instead of
//! leaking broken markup: an unterminated token or block is a parse error.
//! Stray closers and unknown directives are dropped — the rendered output
//! must never contain leftover directive syntax.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Placeholder(String),
    If {
        cond: Cond,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    Each {
        path: String,
        body: Vec<Node>,
    },
}

/// Condition of an `#if` directive: a path, optionally suffixed `.length`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cond {
    pub path: String,
    pub length: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unterminated placeholder token at byte offset {0}")]
    UnterminatedToken(usize),

    #[error("unterminated #if block for '{0}'")]
    UnterminatedIf(String),

    #[error("unterminated #each block for '{0}'")]
    UnterminatedEach(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Var(String),
    IfOpen(Cond),
    EachOpen(String),
    Else,
    EndIf,
    EndEach,
    /// Unrecognized directive (e.g. `#unless`): stripped from output.
    Unknown,
}

pub fn parse(input: &str) -> Result<Vec<Node>, ParseError> {
    let tokens = lex(input)?;
    let mut pos = 0;
    let (nodes, _) = parse_seq(&tokens, &mut pos, Ctx::Top, "")?;
    Ok(nodes)
}

fn lex(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut rest = input;
    let mut offset = 0;

    while let Some(open) = rest.find("{{") {
        if open > 0 {
            tokens.push(Token::Text(rest[..open].to_string()));
        }
        let after_open = &rest[open + 2..];
        let close = after_open
            .find("}}")
            .ok_or(ParseError::UnterminatedToken(offset + open))?;
        tokens.push(classify(after_open[..close].trim()));
        let consumed = open + 2 + close + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest.to_string()));
    }
    Ok(tokens)
}

fn classify(inner: &str) -> Token {
    if let Some(expr) = inner.strip_prefix("#if ") {
        let expr = expr.trim();
        let (path, length) = match expr.strip_suffix(".length") {
            Some(prefix) if !prefix.is_empty() => (prefix, true),
            _ => (expr, false),
        };
        return Token::IfOpen(Cond {
            path: path.to_string(),
            length,
        });
    }
    if let Some(path) = inner.strip_prefix("#each ") {
        return Token::EachOpen(path.trim().to_string());
    }
    match inner {
        "/if" => Token::EndIf,
        "/each" => Token::EndEach,
        "else" => Token::Else,
        "" => Token::Unknown,
        _ if inner.starts_with('#') || inner.starts_with('/') => Token::Unknown,
        path => Token::Var(path.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Ctx {
    Top,
    IfThen,
    IfElse,
    Each,
}

/// What ended a sequence: end of input, a matching closer, or `{{else}}`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Terminator {
    Eof,
    EndIf,
    EndEach,
    Else,
}

fn parse_seq(
    tokens: &[Token],
    pos: &mut usize,
    ctx: Ctx,
    label: &str,
) -> Result<(Vec<Node>, Terminator), ParseError> {
    let mut nodes = Vec::new();

    while *pos < tokens.len() {
        let token = tokens[*pos].clone();
        *pos += 1;
        match token {
            Token::Text(s) => nodes.push(Node::Text(s)),
            Token::Var(path) => nodes.push(Node::Placeholder(path)),
            Token::Unknown => {}
            Token::IfOpen(cond) => {
                let name = cond.path.clone();
                let (then, hit) = parse_seq(tokens, pos, Ctx::IfThen, &name)?;
                let otherwise = if hit == Terminator::Else {
                    let (nodes, _) = parse_seq(tokens, pos, Ctx::IfElse, &name)?;
                    nodes
                } else {
                    Vec::new()
                };
                nodes.push(Node::If {
                    cond,
                    then,
                    otherwise,
                });
            }
            Token::EachOpen(path) => {
                let (body, _) = parse_seq(tokens, pos, Ctx::Each, &path)?;
                nodes.push(Node::Each { path, body });
            }
            Token::EndIf => match ctx {
                Ctx::IfThen | Ctx::IfElse => return Ok((nodes, Terminator::EndIf)),
                // stray closer: strip
                Ctx::Top | Ctx::Each => {}
            },
            Token::EndEach => match ctx {
                Ctx::Each => return Ok((nodes, Terminator::EndEach)),
                Ctx::Top | Ctx::IfThen | Ctx::IfElse => {}
            },
            Token::Else => match ctx {
                Ctx::IfThen => return Ok((nodes, Terminator::Else)),
                Ctx::Top | Ctx::IfElse | Ctx::Each => {}
            },
        }
    }

    match ctx {
        Ctx::Top => Ok((nodes, Terminator::Eof)),
        Ctx::IfThen | Ctx::IfElse => Err(ParseError::UnterminatedIf(label.to_string())),
        Ctx::Each => Err(ParseError::UnterminatedEach(label.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text_and_placeholders() {
        let nodes = parse("Hello {{firstName}} {{lastName}}!").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("Hello ".to_string()),
                Node::Placeholder("firstName".to_string()),
                Node::Text(" ".to_string()),
                Node::Placeholder("lastName".to_string()),
                Node::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_if_with_else() {
        let nodes = parse("{{#if current}}Present{{else}}{{endDate}}{{/if}}").unwrap();
        assert_eq!(
            nodes,
            vec![Node::If {
                cond: Cond {
                    path: "current".to_string(),
                    length: false
                },
                then: vec![Node::Text("Present".to_string())],
                otherwise: vec![Node::Placeholder("endDate".to_string())],
            }]
        );
    }

    #[test]
    fn test_parse_length_suffix() {
        let nodes = parse("{{#if experience.length}}x{{/if}}").unwrap();
        let Node::If { cond, .. } = &nodes[0] else {
            panic!("expected if node");
        };
        assert_eq!(cond.path, "experience");
        assert!(cond.length);
    }

    #[test]
    fn test_parse_nested_each_inside_if() {
        let nodes =
            parse("{{#if skills.length}}{{#each skills}}<b>{{name}}</b>{{/each}}{{/if}}").unwrap();
        let Node::If { then, .. } = &nodes[0] else {
            panic!("expected if node");
        };
        let Node::Each { path, body } = &then[0] else {
            panic!("expected each node");
        };
        assert_eq!(path, "skills");
        assert_eq!(body.len(), 3);
    }

    #[test]
    fn test_unterminated_each_is_an_error() {
        let err = parse("{{#each experience}}<div>{{position}}</div>").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedEach("experience".to_string()));
    }

    #[test]
    fn test_unterminated_if_is_an_error() {
        let err = parse("{{#if summary}}<p>{{summary}}</p>").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedIf("summary".to_string()));
    }

    #[test]
    fn test_unterminated_token_is_an_error() {
        let err = parse("<p>{{firstName</p>").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedToken(_)));
    }

    #[test]
    fn test_stray_closers_are_stripped() {
        let nodes = parse("a{{/if}}b{{/each}}c{{else}}d").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("a".to_string()),
                Node::Text("b".to_string()),
                Node::Text("c".to_string()),
                Node::Text("d".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_directives_are_stripped() {
        let nodes = parse("{{#unless hidden}}shown{{/unless}}").unwrap();
        assert_eq!(nodes, vec![Node::Text("shown".to_string())]);
    }
}
