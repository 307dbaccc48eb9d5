//! Inline style parsing.
//!
//! Parses the contents of a `style="..."` attribute into a [`StyleMap`] with
//! camelCase keys. Values are kept as written (trimmed, with any
//! `!important` flag removed); no value interpretation happens here.
//! Declarations that fail to parse are skipped individually.

use cssparser::{Delimiter, ParseError, Parser, ParserInput};

use crate::node::StyleMap;

/// Parse an inline style declaration list.
///
/// ```
/// let style = semtree::style::parse_style("color: red; font-size: 16px; bogus");
/// assert_eq!(style["color"], "red");
/// assert_eq!(style["fontSize"], "16px");
/// assert_eq!(style.len(), 2);
/// ```
pub fn parse_style(style_attr: &str) -> StyleMap {
    let mut style = StyleMap::new();
    let mut input = ParserInput::new(style_attr);
    let mut parser = Parser::new(&mut input);

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        match parser.parse_until_before(Delimiter::Semicolon, parse_declaration) {
            Ok((property, value)) => {
                let key = to_camel_case(&property);
                if !key.is_empty() {
                    style.insert(key, value);
                }
            }
            Err(_) => {
                tracing::trace!(style = style_attr, "skipping malformed declaration");
            }
        }

        // Consume the semicolon (or hit the end of input)
        let _ = parser.next();
    }

    style
}

/// Parse one `property: value` declaration.
fn parse_declaration<'i>(
    input: &mut Parser<'i, '_>,
) -> Result<(String, String), ParseError<'i, ()>> {
    let property = input.expect_ident()?.to_ascii_lowercase();
    input.expect_colon()?;

    let start = input.position();
    while input.next().is_ok() {}
    let value = strip_important(input.slice_from(start).trim());

    if value.is_empty() {
        return Err(input.new_custom_error(()));
    }
    Ok((property, value.to_string()))
}

fn strip_important(value: &str) -> &str {
    if let Some((head, flag)) = value.rsplit_once('!')
        && flag.trim().eq_ignore_ascii_case("important")
    {
        return head.trim_end();
    }
    value
}

/// Convert a hyphenated CSS property name to its canonical camelCase key.
///
/// Vendor prefixes become capitalised (`-webkit-box` → `WebkitBox`) except
/// `-ms-`, which stays lowercase. Custom properties (`--x`) are unchanged.
pub fn to_camel_case(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_string();
    }

    let property = property.strip_prefix("-ms-").map_or_else(
        || property.to_string(),
        |rest| format!("ms-{rest}"),
    );

    let mut out = String::with_capacity(property.len());
    let mut upper_next = false;
    for ch in property.chars() {
        if ch == '-' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Convert a canonical camelCase key back to a CSS property name.
pub fn to_kebab_case(key: &str) -> String {
    if key.starts_with("--") {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    if out.starts_with("ms-") {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_simple_declarations() {
        let style = parse_style("color: red; font-size: 16px;");
        assert_eq!(style.len(), 2);
        assert_eq!(style["color"], "red");
        assert_eq!(style["fontSize"], "16px");
    }

    #[test]
    fn test_parse_without_trailing_semicolon() {
        let style = parse_style("margin:0 auto");
        assert_eq!(style["margin"], "0 auto");
    }

    #[test]
    fn test_malformed_declarations_are_skipped() {
        let style = parse_style("color red; width: ; : 5px; height: 10px; ;;");
        assert_eq!(style.len(), 1);
        assert_eq!(style["height"], "10px");
    }

    #[test]
    fn test_semicolons_inside_values() {
        let style = parse_style(r#"background: url("a;b.png") no-repeat; content: ";""#);
        assert_eq!(style["background"], r#"url("a;b.png") no-repeat"#);
        assert_eq!(style["content"], r#"";""#);
    }

    #[test]
    fn test_important_is_stripped() {
        let style = parse_style("color: blue !important; width: 10px!IMPORTANT");
        assert_eq!(style["color"], "blue");
        assert_eq!(style["width"], "10px");
    }

    #[test]
    fn test_property_names_are_case_insensitive() {
        let style = parse_style("COLOR: Red; Font-Weight: Bold");
        assert_eq!(style["color"], "Red");
        assert_eq!(style["fontWeight"], "Bold");
    }

    #[test]
    fn test_later_declaration_wins() {
        let style = parse_style("color: red; color: green");
        assert_eq!(style["color"], "green");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_style("").is_empty());
        assert!(parse_style("   ").is_empty());
    }

    #[test]
    fn test_camel_case_conversion() {
        assert_eq!(to_camel_case("color"), "color");
        assert_eq!(to_camel_case("font-size"), "fontSize");
        assert_eq!(to_camel_case("border-top-left-radius"), "borderTopLeftRadius");
        assert_eq!(to_camel_case("-webkit-line-clamp"), "WebkitLineClamp");
        assert_eq!(to_camel_case("-ms-transform"), "msTransform");
        assert_eq!(to_camel_case("--brand-color"), "--brand-color");
    }

    #[test]
    fn test_kebab_case_conversion() {
        assert_eq!(to_kebab_case("fontSize"), "font-size");
        assert_eq!(to_kebab_case("borderTopLeftRadius"), "border-top-left-radius");
        assert_eq!(to_kebab_case("WebkitLineClamp"), "-webkit-line-clamp");
        assert_eq!(to_kebab_case("msTransform"), "-ms-transform");
        assert_eq!(to_kebab_case("--brand-color"), "--brand-color");
    }

    proptest! {
        #[test]
        fn prop_parse_style_accepts_any_input(input in "\\PC{0,64}") {
            let style = parse_style(&input);
            for (key, value) in &style {
                prop_assert!(!key.is_empty());
                prop_assert!(!value.trim().is_empty());
            }
        }

        #[test]
        fn prop_kebab_round_trip(property in "[a-z]{1,6}(-[a-z]{1,6}){0,3}") {
            // `ms-` is reserved for the unprefixed form of `-ms-`
            prop_assume!(!property.starts_with("ms-"));
            prop_assert_eq!(to_kebab_case(&to_camel_case(&property)), property);
        }
    }
}
