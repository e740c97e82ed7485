//! # RFC 5988 `Link` Header Parsing
//!
//! Turns `Link` response-header values into [`Link`]s:
//!
//! ```text
//! Link: <https://api.example/persons?start=20>; rel="next", </persons>; rel="first last"
//! ```
//!
//! - A link-value whose `rel` lists several relation types yields one link
//!   per type.
//! - Relative targets are resolved against the response URL.
//! - Malformed link-values are skipped; the rest of the header still parses.

use url::Url;

use crate::link::Link;

/// Split `input` on `delim`, ignoring delimiters inside `<...>` or quotes.
fn split_top_level(input: &str, delim: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut in_angle = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' if !in_angle => in_quotes = !in_quotes,
            '<' if !in_quotes => in_angle = true,
            '>' if !in_quotes => in_angle = false,
            c if c == delim && !in_quotes && !in_angle => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => {
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else {
                    out.push(c);
                }
            }
            out
        }
        None => value.to_string(),
    }
}

fn parse_link_value(value: &str, base: &Url) -> Vec<Link> {
    let value = value.trim();
    let Some(rest) = value.strip_prefix('<') else {
        return Vec::new();
    };
    let Some(close) = rest.find('>') else {
        return Vec::new();
    };
    let target = rest[..close].trim();
    let Ok(href) = base.join(target) else {
        return Vec::new();
    };

    let mut template = Link {
        href: Some(href.to_string()),
        ..Link::default()
    };
    let mut rels = Vec::new();
    for param in split_top_level(&rest[close + 1..], ';') {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }
        let (name, raw) = param.split_once('=').unwrap_or((param, ""));
        let name = name.trim().to_ascii_lowercase();
        let val = unquote(raw);
        match name.as_str() {
            // First occurrence wins for rel, per RFC 5988 §5.3.
            "rel" if rels.is_empty() => {
                rels = val.split_whitespace().map(str::to_string).collect();
            }
            "type" => template.media_type = Some(val),
            "title" => template.title = Some(val),
            "hreflang" => template.hreflang = Some(val),
            "accept" => template.accept = Some(val),
            "allow" => template.allow = Some(val),
            _ => {}
        }
    }

    rels.into_iter()
        .map(|rel| Link {
            rel,
            ..template.clone()
        })
        .collect()
}

/// Parse one `Link` header value, which may hold several comma-separated
/// link-values.
pub fn parse(value: &str, base: &Url) -> Vec<Link> {
    split_top_level(value, ',')
        .into_iter()
        .flat_map(|part| parse_link_value(part, base))
        .collect()
}

/// Parse every `Link` header value of a response, in arrival order.
pub fn parse_all<'a, I>(values: I, base: &Url) -> Vec<Link>
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().flat_map(|v| parse(v, base)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn base() -> Url {
        Url::parse("https://api.example.org/platform/tree/persons?start=0").unwrap()
    }

    #[test]
    fn parses_multiple_link_values() {
        let links = parse(
            r#"<https://api.example.org/p?start=20>; rel="next", <https://api.example.org/p?start=0>; rel="first""#,
            &base(),
        );
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].rel, "next");
        assert_eq!(links[0].href.as_deref(), Some("https://api.example.org/p?start=20"));
        assert_eq!(links[1].rel, "first");
    }

    #[test]
    fn multi_valued_rel_yields_one_link_each() {
        let links = parse(r#"</p>; rel="first prev""#, &base());
        let rels: Vec<_> = links.iter().map(|l| l.rel.as_str()).collect();
        assert_eq!(rels, ["first", "prev"]);
        assert!(links.iter().all(|l| l.href.as_deref() == Some("https://api.example.org/p")));
    }

    #[test]
    fn relative_target_resolves_against_base() {
        let links = parse("<../collections/tree>; rel=collection", &base());
        assert_eq!(
            links[0].href.as_deref(),
            Some("https://api.example.org/platform/collections/tree")
        );
    }

    #[test]
    fn quoted_commas_do_not_split() {
        let links = parse(r#"<https://a.example/x>; rel="next"; title="a, b; c""#, &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title.as_deref(), Some("a, b; c"));
    }

    #[test]
    fn target_with_comma_does_not_split() {
        let links = parse("<https://a.example/x?ids=1,2>; rel=next", &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href.as_deref(), Some("https://a.example/x?ids=1,2"));
    }

    #[test]
    fn media_type_and_escaped_quote() {
        let links = parse(
            r#"<https://a.example/x>; rel="alternate"; type="application/json"; title="say \"hi\"""#,
            &base(),
        );
        assert_eq!(links[0].media_type.as_deref(), Some("application/json"));
        assert_eq!(links[0].title.as_deref(), Some("say \"hi\""));
    }

    #[test]
    fn malformed_values_are_skipped() {
        let links = parse(r#"garbage, <https://a.example/ok>; rel="self", <unterminated"#, &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].rel, "self");
    }

    #[test]
    fn link_without_rel_is_dropped() {
        assert!(parse("<https://a.example/x>; title=x", &base()).is_empty());
    }

    #[test]
    fn parse_all_keeps_order() {
        let links = parse_all(
            ["<https://a.example/1>; rel=a", "<https://a.example/2>; rel=b"],
            &base(),
        );
        let rels: Vec<_> = links.iter().map(|l| l.rel.as_str()).collect();
        assert_eq!(rels, ["a", "b"]);
    }

    proptest! {
        #[test]
        fn never_panics(input in ".{0,200}") {
            let _ = parse(&input, &base());
        }

        #[test]
        fn formatted_links_parse_back(
            entries in prop::collection::vec(("[a-z][a-z0-9-]{0,12}", "[a-z0-9]{1,8}"), 1..6)
        ) {
            let header = entries
                .iter()
                .map(|(rel, seg)| format!("<https://api.example.org/{seg}>; rel=\"{rel}\""))
                .collect::<Vec<_>>()
                .join(", ");
            let links = parse(&header, &base());
            prop_assert_eq!(links.len(), entries.len());
            for (link, (rel, seg)) in links.iter().zip(&entries) {
                prop_assert_eq!(&link.rel, rel);
                let expected = format!("https://api.example.org/{seg}");
                prop_assert_eq!(link.href.as_deref(), Some(expected.as_str()));
            }
        }
    }
}
