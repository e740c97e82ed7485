//! # URI Templates
//!
//! RFC 6570 expansion for string-valued variables, covering every operator
//! (`{var}`, `{+var}`, `{#var}`, `{.var}`, `{/var}`, `{;var}`, `{?var}`,
//! `{&var}`) and the `:n` prefix modifier. The explode modifier is accepted
//! and has no effect on string values. Undefined variables expand to nothing,
//! so `https://x/{pid}{?access_token}` with only `pid` set yields `https://x/P`.

/// Per-operator expansion behaviour, RFC 6570 appendix A.
struct Operator {
    first: &'static str,
    sep: &'static str,
    named: bool,
    if_empty: &'static str,
    allow_reserved: bool,
}

fn operator(c: Option<char>) -> (Operator, usize) {
    let op = |first, sep, named, if_empty, allow_reserved| Operator {
        first,
        sep,
        named,
        if_empty,
        allow_reserved,
    };
    match c {
        Some('+') => (op("", ",", false, "", true), 1),
        Some('#') => (op("#", ",", false, "", true), 1),
        Some('.') => (op(".", ".", false, "", false), 1),
        Some('/') => (op("/", "/", false, "", false), 1),
        Some(';') => (op(";", ";", true, "", false), 1),
        Some('?') => (op("?", "&", true, "=", false), 1),
        Some('&') => (op("&", "&", true, "=", false), 1),
        _ => (op("", ",", false, "", false), 0),
    }
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

fn is_reserved(b: u8) -> bool {
    matches!(
        b,
        b':' | b'/'
            | b'?'
            | b'#'
            | b'['
            | b']'
            | b'@'
            | b'!'
            | b'$'
            | b'&'
            | b'\''
            | b'('
            | b')'
            | b'*'
            | b'+'
            | b','
            | b';'
            | b'='
    )
}

fn encode(value: &str, allow_reserved: bool, out: &mut String) {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let pct_triplet = b == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit();
        if is_unreserved(b) || (allow_reserved && (is_reserved(b) || pct_triplet)) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
        i += 1;
    }
}

fn lookup<'a>(vars: &[(&str, &'a str)], name: &str) -> Option<&'a str> {
    vars.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

fn expand_expression(expr: &str, vars: &[(&str, &str)], out: &mut String) {
    let (op, skip) = operator(expr.chars().next());
    let mut first = true;
    for spec in expr[skip..].split(',') {
        let spec = spec.trim_end_matches('*');
        let (name, prefix) = match spec.split_once(':') {
            Some((name, len)) => (name, len.parse::<usize>().ok()),
            None => (spec, None),
        };
        let Some(value) = lookup(vars, name) else {
            continue;
        };
        let value: String = match prefix {
            Some(n) => value.chars().take(n).collect(),
            None => value.to_string(),
        };
        out.push_str(if first { op.first } else { op.sep });
        first = false;
        if op.named {
            out.push_str(name);
            if value.is_empty() {
                out.push_str(op.if_empty);
                continue;
            }
            out.push('=');
        }
        encode(&value, op.allow_reserved, out);
    }
}

/// Expand `template` with `vars`. Unterminated expressions are copied
/// through literally.
pub fn expand(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                expand_expression(&after[..close], vars, &mut out);
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: &[(&str, &str)] = &[
        ("var", "value"),
        ("hello", "Hello World!"),
        ("path", "/foo/bar"),
        ("x", "1024"),
        ("y", "768"),
        ("empty", ""),
    ];

    #[test]
    fn rfc6570_examples() {
        assert_eq!(expand("{var}", VARS), "value");
        assert_eq!(expand("{hello}", VARS), "Hello%20World%21");
        assert_eq!(expand("{+path}/here", VARS), "/foo/bar/here");
        assert_eq!(expand("{#path}", VARS), "#/foo/bar");
        assert_eq!(expand("X{.x,y}", VARS), "X.1024.768");
        assert_eq!(expand("{/var,x}/here", VARS), "/value/1024/here");
        assert_eq!(expand("{;x,y,empty}", VARS), ";x=1024;y=768;empty");
        assert_eq!(expand("{?x,y,empty}", VARS), "?x=1024&y=768&empty=");
        assert_eq!(expand("?fixed=yes{&x}", VARS), "?fixed=yes&x=1024");
        assert_eq!(expand("{var:3}", VARS), "val");
    }

    #[test]
    fn undefined_variables_vanish() {
        assert_eq!(
            expand("https://api.example/persons/{pid}{?access_token}", &[("pid", "P1")]),
            "https://api.example/persons/P1"
        );
        assert_eq!(expand("{?a,b}", &[]), "");
    }

    #[test]
    fn search_query_is_encoded() {
        assert_eq!(
            expand("https://api.example/search{?q,start,count}", &[("q", "givenName:John"), ("count", "5")]),
            "https://api.example/search?q=givenName%3AJohn&count=5"
        );
    }

    #[test]
    fn unterminated_expression_is_literal() {
        assert_eq!(expand("a{b", &[("b", "x")]), "a{b");
    }
}
