//! Serializers for generated fault trees.
//!
//! Both formats list gates in topological order: a gate always appears
//! before the gates it has as children.

mod shorthand;
mod xml;

pub use shorthand::write_shorthand;
pub use xml::write_xml;

use crate::config::{GeneratorConfig, OutputFormat};
use crate::generator::GeneratedFaultTree;
use std::borrow::Cow;
use std::io::{self, Write};

/// Write `generated` in the format selected by `config.format`.
pub fn write_tree<W: Write>(
    out: &mut W,
    generated: &GeneratedFaultTree,
    config: &GeneratorConfig,
) -> io::Result<()> {
    match config.format {
        OutputFormat::Xml => write_xml(out, generated, config),
        OutputFormat::Shorthand => write_shorthand(out, generated),
    }
}

/// Render `generated` to a string in the format selected by `config.format`.
pub fn render(generated: &GeneratedFaultTree, config: &GeneratorConfig) -> io::Result<String> {
    let mut buf = Vec::new();
    write_tree(&mut buf, generated, config)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Escape the characters that are special inside XML attribute values.
pub(crate) fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert!(matches!(escape("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape(r#"a<b & "c"'"#), "a&lt;b &amp; &quot;c&quot;&apos;");
    }
}
