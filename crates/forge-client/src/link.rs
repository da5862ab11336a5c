//! `Link` response header parsing
//!
//! Forge APIs announce further pages with a header such as:
//!
//! ```text
//! Link: <https://api.example/items?page=2>; rel="next", <https://api.example/items?page=5>; rel="last"
//! ```
//!
//! Only the relation types matter here; other parameters are ignored.

use crate::Resource;

/// One link-value of a `Link` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target as written between `<` and `>` (may be relative)
    pub target: String,
    /// Relation types, lower-cased
    pub rels: Vec<String>,
}

impl Link {
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Parse a `Link` header value into its link-values
///
/// Tolerates quoted or bare `rel` values, several space-separated relation
/// types, commas inside quoted parameters and stray whitespace. Malformed
/// trailing segments are skipped.
pub fn parse_link_header(value: &str) -> Vec<Link> {
    let mut links = Vec::new();
    let mut rest = value;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            break;
        };
        let target = after[..end].trim().to_string();
        let (params, remaining) = split_params(&after[end + 1..]);
        links.push(Link {
            target,
            rels: parse_rels(params),
        });
        rest = remaining;
    }

    links
}

/// Target of the `rel="next"` link across all `Link` headers of `resource`
///
/// The header name is matched case-insensitively.
pub fn next_link(resource: &Resource) -> Option<String> {
    resource
        .header_values("link")
        .into_iter()
        .flat_map(parse_link_header)
        .find(|link| link.has_rel("next"))
        .map(|link| link.target)
}

/// Split the parameters of one link-value from the rest of the header
///
/// Parameters end at the first comma outside double quotes.
fn split_params(s: &str) -> (&str, &str) {
    let mut in_quotes = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return (&s[..i], &s[i + 1..]),
            _ => {}
        }
    }
    (s, "")
}

fn parse_rels(params: &str) -> Vec<String> {
    params
        .split(';')
        .filter_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("rel")
                .then(|| value.trim().trim_matches('"'))
        })
        .flat_map(str::split_whitespace)
        .map(str::to_ascii_lowercase)
        .collect()
}
