// src/utils/html.rs

use std::borrow::Cow;

use ammonia::Builder;

use crate::settings::PluginSettings;

/// Structural elements kept on top of ammonia's default tag set.
const STRUCTURAL_TAGS: &[&str] = &[
    "html", "head", "body", "title", "meta", "link",
    "h1", "h2", "h3", "h4", "h5", "h6",
    "p", "br", "hr", "div", "span",
    "ul", "ol", "li", "dl", "dt", "dd",
    "table", "thead", "tbody", "tr", "td", "th",
    "a", "img", "strong", "em", "u", "strike",
    "pre", "code", "blockquote",
];

const IMG_ATTRIBUTES: &[&str] = &["src", "alt", "width", "height"];

/// Fragments that let a CSS declaration load or run something.
const UNSAFE_STYLE_TOKENS: &[&str] = &[
    "javascript:",
    "vbscript:",
    "expression(",
    "url(",
    "@import",
    "behavior:",
    "-moz-binding",
];

/// What the sanitizer may let through.
///
/// There is deliberately no switch for script: `<script>`, event handler
/// attributes, `javascript:` URLs and embedded objects are always removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizePolicy {
    pub allow_style: bool,
}

impl From<&PluginSettings> for SanitizePolicy {
    fn from(settings: &PluginSettings) -> Self {
        Self {
            allow_style: settings.enable_css,
        }
    }
}

/// Clean uploaded markup with an allow-list built on ammonia.
///
/// Anything not allowed is removed, not escaped. Unknown wrappers are
/// dropped but their text is kept; `<script>` and `<style>` lose their
/// content too. Invalid UTF-8 is replaced rather than rejected, so this
/// never fails and always returns the same output for the same input.
pub fn sanitize(raw: &[u8], policy: &SanitizePolicy) -> String {
    let input = String::from_utf8_lossy(raw);
    builder(policy).clean(&input).to_string()
}

fn builder(policy: &SanitizePolicy) -> Builder<'static> {
    let mut builder = Builder::default();
    builder
        .add_tags(STRUCTURAL_TAGS)
        .add_tag_attributes("a", &["href"])
        .add_tag_attributes("img", IMG_ATTRIBUTES)
        .add_generic_attributes(&["class", "id"]);

    if policy.allow_style {
        builder
            .add_generic_attributes(&["style"])
            .attribute_filter(filter_style);
    }

    builder
}

/// Drops a `style` attribute whose value could fetch or execute anything.
/// Other attributes pass through untouched.
fn filter_style<'u>(_element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    if attribute == "style" && !is_inert_style(value) {
        return None;
    }
    Some(Cow::Borrowed(value))
}

/// True when a declaration list has no escapes and none of the unsafe tokens
/// once comments and whitespace are stripped.
fn is_inert_style(value: &str) -> bool {
    // CSS escapes can spell any token; refuse them outright.
    if value.contains('\\') {
        return false;
    }

    let mut compact = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("/*") {
        compact.push_str(&rest[..start]);
        rest = match rest[start + 2..].find("*/") {
            Some(end) => &rest[start + 2 + end + 2..],
            None => "",
        };
    }
    compact.push_str(rest);

    let compact: String = compact
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect();

    !UNSAFE_STYLE_TOKENS.iter().any(|token| compact.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT: SanitizePolicy = SanitizePolicy { allow_style: false };
    const STYLED: SanitizePolicy = SanitizePolicy { allow_style: true };

    fn clean(input: &str, policy: &SanitizePolicy) -> String {
        sanitize(input.as_bytes(), policy)
    }

    #[test]
    fn script_and_handlers_are_removed_from_document() {
        let input = r#"<html><body><script>alert(1)</script><p onclick="x()">Hi</p></body></html>"#;
        let output = clean(input, &SanitizePolicy::from(&PluginSettings::default()));

        assert!(output.contains("<p>Hi</p>"), "got {}", output);
        assert!(!output.contains("script"));
        assert!(!output.contains("onclick"));
        assert!(!output.contains("alert"));
    }

    #[test]
    fn script_vectors_never_survive_any_settings() {
        let inputs = [
            "<script>alert(1)</script>",
            "<SCRIPT src=\"https://evil.example/x.js\"></SCRIPT>",
            r#"<div onclick="steal()">a</div>"#,
            r#"<img src="x.png" onerror="steal()">"#,
            r#"<body onload="steal()"><p>b</p></body>"#,
            r#"<a href="javascript:steal()">c</a>"#,
            r#"<a href="JaVaScRiPt:steal()">c</a>"#,
            r#"<img src="javascript:steal()">"#,
            r#"<iframe src="https://evil.example"></iframe>"#,
            r#"<object data="x.swf"></object><embed src="x.swf">"#,
            r#"<svg><script>alert(1)</script></svg>"#,
            r#"<p style="color:red" onmouseover="steal()">d</p>"#,
            r#"<p style="background:url(javascript:alert(1))">e</p>"#,
            r#"<p style="width: expression(alert(1))">f</p>"#,
            r#"<p style="background:u/**/rl(JAVA SCRIPT:alert(1))">g</p>"#,
            r#"<p style="background:&#106;avascript:alert(1)">h</p>"#,
        ];

        for enable_css in [false, true] {
            for enable_javascript in [false, true] {
                let settings = PluginSettings {
                    max_file_size_mb: 1,
                    enable_javascript,
                    enable_css,
                };
                let policy = SanitizePolicy::from(&settings);
                for input in inputs {
                    let output = clean(input, &policy).to_ascii_lowercase();
                    assert!(!output.contains("<script"), "{} -> {}", input, output);
                    assert!(!output.contains("javascript:"), "{} -> {}", input, output);
                    assert!(!output.contains("onclick"), "{} -> {}", input, output);
                    assert!(!output.contains("onerror"), "{} -> {}", input, output);
                    assert!(!output.contains("onload"), "{} -> {}", input, output);
                    assert!(!output.contains("onmouseover"), "{} -> {}", input, output);
                    assert!(!output.contains("<iframe"), "{} -> {}", input, output);
                    assert!(!output.contains("<object"), "{} -> {}", input, output);
                    assert!(!output.contains("<embed"), "{} -> {}", input, output);
                    assert!(!output.contains("expression("), "{} -> {}", input, output);
                }
            }
        }
    }

    #[test]
    fn style_attribute_requires_css() {
        let input = r#"<p style="color:red">x</p>"#;

        let strict = clean(input, &STRICT);
        assert!(!strict.contains("style="), "got {}", strict);
        assert!(strict.contains("<p>x</p>"));

        let styled = clean(input, &STYLED);
        assert!(styled.contains(r#"style="color:red""#), "got {}", styled);
    }

    #[test]
    fn style_values_that_load_or_run_code_are_dropped() {
        let unsafe_styles = [
            r#"<p style="background:url(javascript:alert(1))">x</p>"#,
            r#"<p style="width: expression(alert(1))">x</p>"#,
            r#"<p style="background: URL( https://tracker.example/p.gif )">x</p>"#,
            r#"<p style="@import 'https://evil.example/a.css'">x</p>"#,
            r#"<p style="background:u/* split */rl(x.png)">x</p>"#,
            r#"<p style="background:\75 rl(x.png)">x</p>"#,
            r#"<p style="-moz-binding: url(x.xml#xss)">x</p>"#,
        ];

        for input in unsafe_styles {
            let output = clean(input, &STYLED);
            assert_eq!(output, "<p>x</p>", "{}", input);
        }
    }

    #[test]
    fn plain_declarations_survive_the_style_filter() {
        let output = clean(
            r#"<p style="color: red; font-weight: bold /* note */">x</p>"#,
            &STYLED,
        );
        assert!(output.contains("style="), "got {}", output);
        assert!(output.contains("font-weight: bold"));
    }

    #[test]
    fn style_filter_leaves_other_attributes_alone() {
        let output = clean(
            r#"<a href="https://example.com/url(x)" class="url(" style="color:blue">l</a>"#,
            &STYLED,
        );
        assert!(output.contains(r#"href="https://example.com/url(x)""#), "got {}", output);
        assert!(output.contains(r#"class="url(""#));
        assert!(output.contains(r#"style="color:blue""#));
    }

    #[test]
    fn style_elements_are_always_dropped() {
        for policy in [STRICT, STYLED] {
            let output = clean("<style>p { color: red }</style><p>x</p>", &policy);
            assert!(!output.contains("<style"));
            assert!(!output.contains("color: red"));
            assert!(output.contains("<p>x</p>"));
        }
    }

    #[test]
    fn sanitize_is_deterministic() {
        let input = r#"<div class="a" id="b"><table><tr><td onclick="x">1</td></tr></table><custom>t</custom></div>"#;
        for policy in [STRICT, STYLED] {
            assert_eq!(clean(input, &policy), clean(input, &policy));
        }
    }

    #[test]
    fn allowed_structure_and_attributes_are_kept() {
        let input = concat!(
            r#"<h1 id="top" class="title">T</h1>"#,
            r#"<ul><li>one</li></ul>"#,
            r#"<table><thead><tr><th>h</th></tr></thead><tbody><tr><td>c</td></tr></tbody></table>"#,
            r#"<img src="https://example.com/a.png" alt="pic" width="10" height="20">"#,
            r#"<blockquote><pre><code>let x = 1;</code></pre></blockquote>"#,
        );
        let output = clean(input, &STRICT);

        assert!(output.contains(r#"id="top""#));
        assert!(output.contains(r#"class="title""#));
        assert!(output.contains("<li>one</li>"));
        assert!(output.contains("<th>h</th>"));
        assert!(output.contains("<td>c</td>"));
        assert!(output.contains(r#"src="https://example.com/a.png""#));
        assert!(output.contains(r#"alt="pic""#));
        assert!(output.contains(r#"width="10""#));
        assert!(output.contains("<code>let x = 1;</code>"));
    }

    #[test]
    fn unknown_wrappers_keep_their_text() {
        let output = clean("<blink>visible</blink><marquee>text</marquee>", &STRICT);
        assert_eq!(output, "visibletext");
    }

    #[test]
    fn safe_links_are_kept() {
        let output = clean(r#"<a href="https://example.com/">ok</a>"#, &STRICT);
        assert!(output.contains(r#"href="https://example.com/""#));
        assert!(output.contains(">ok</a>"));
    }

    #[test]
    fn void_elements_are_well_formed() {
        let output = clean("<p>a<br>b</p><hr><p>unclosed", &STRICT);
        assert_eq!(output, "<p>a<br>b</p><hr><p>unclosed</p>");
    }

    #[test]
    fn plain_text_sources_are_escaped_not_executed() {
        let output = clean("if (a < b) { document.write('<b>x</b>') }", &STRICT);
        assert!(output.contains("&lt;"));
        assert!(output.contains("<b>x</b>"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let output = sanitize(b"<p>ok \xff</p>", &STRICT);
        assert!(output.starts_with("<p>ok "));
        assert!(output.contains('\u{FFFD}'));
    }
}
