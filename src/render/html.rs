//! HTML renderer.
//!
//! A single enter/exit walk over the tree. Block elements start on a fresh
//! line; paragraphs directly inside the items of a tight list are written
//! without `<p>` tags. Image alt text is rendered as plain text from the
//! image's descendants.

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

use crate::config::Config;
use crate::tree::{ListType, NodeEvent, NodeId, NodeKind, NodeValue, Tree};

/// Bytes left as they are in `href` and `src` values. Everything else,
/// including all non-ASCII bytes, is percent-encoded.
const HREF_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'+')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b',')
    .remove(b'%')
    .remove(b'#')
    .remove(b'@')
    .remove(b'?')
    .remove(b'=')
    .remove(b';')
    .remove(b':')
    .remove(b'/')
    .remove(b'&')
    .remove(b'$')
    .remove(b'~');

static DANGEROUS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:javascript|vbscript|file|data):").expect("valid dangerous url regex")
});

static SAFE_DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^data:image/(?:png|gif|jpeg|webp)").expect("valid data url regex")
});

const RAW_HTML_OMITTED: &str = "<!-- raw HTML omitted -->";

/// Renders the subtree at `id` as HTML with the default configuration.
///
/// Any node can be rendered, attached or not. A stale id renders as the
/// empty string.
pub fn render_html(tree: &Tree, id: NodeId) -> String {
    render_html_with_config(tree, id, &Config::default())
}

/// Renders the subtree at `id` as HTML.
///
/// `safe` replaces raw HTML and dangerous URLs, `hardbreaks`/`nobreaks`
/// change soft breaks, and `sourcepos` adds `data-sourcepos` attributes to
/// block elements.
pub fn render_html_with_config(tree: &Tree, id: NodeId, config: &Config) -> String {
    let mut renderer = HtmlRenderer::new(tree, config);
    for event in tree.traverse(id) {
        match event {
            NodeEvent::Enter(node) => renderer.enter(node),
            NodeEvent::Exit(node) => renderer.exit(node),
        }
    }
    renderer.out
}

/// Escapes text for element content and attribute values.
pub(crate) fn escape_html(out: &mut String, text: &str) {
    html_escape::encode_double_quoted_attribute_to_string(text, out);
}

/// Escapes a URL for an `href` or `src` attribute.
pub(crate) fn escape_href(out: &mut String, url: &str) {
    for chunk in utf8_percent_encode(url, HREF_SAFE) {
        for c in chunk.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '\'' => out.push_str("&#x27;"),
                _ => out.push(c),
            }
        }
    }
}

fn is_dangerous_url(url: &str) -> bool {
    DANGEROUS_URL.is_match(url) && !SAFE_DATA_URL.is_match(url)
}

struct HtmlRenderer<'a> {
    tree: &'a Tree,
    config: &'a Config,
    out: String,
    /// The image whose alt text is being written. Only literal text is
    /// emitted while this is set.
    plain: Option<NodeId>,
}

impl<'a> HtmlRenderer<'a> {
    fn new(tree: &'a Tree, config: &'a Config) -> Self {
        Self {
            tree,
            config,
            out: String::new(),
            plain: None,
        }
    }

    /// Starts a new line unless the output is empty or already at one.
    fn cr(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn write_sourcepos(&mut self, node: NodeId) {
        if self.config.sourcepos {
            let pos = self.tree.sourcepos(node);
            self.out.push_str(&format!(
                " data-sourcepos=\"{}:{}-{}:{}\"",
                pos.start_line, pos.start_column, pos.end_line, pos.end_column
            ));
        }
    }

    fn write_raw_html(&mut self, literal: &str) {
        if self.config.safe {
            self.out.push_str(RAW_HTML_OMITTED);
        } else {
            self.out.push_str(literal);
        }
    }

    fn write_url(&mut self, url: &str) {
        if !(self.config.safe && is_dangerous_url(url)) {
            escape_href(&mut self.out, url);
        }
    }

    /// Whether a paragraph sits in an item of a tight list.
    fn in_tight_list(&self, paragraph: NodeId) -> bool {
        self.tree
            .parent(paragraph)
            .and_then(|item| self.tree.parent(item))
            .and_then(|list| self.tree.value(list))
            .is_some_and(|value| matches!(value, NodeValue::List(list) if list.tight))
    }

    fn enter(&mut self, node: NodeId) {
        let Some(value) = self.tree.value(node) else {
            return;
        };

        if self.plain.is_some() {
            match value {
                NodeValue::Text(literal) | NodeValue::Code(literal) | NodeValue::HtmlInline(literal) => {
                    escape_html(&mut self.out, literal);
                }
                NodeValue::SoftBreak | NodeValue::LineBreak => self.out.push(' '),
                _ => {}
            }
            return;
        }

        match value {
            NodeValue::Document => {}
            NodeValue::BlockQuote => {
                self.cr();
                self.out.push_str("<blockquote");
                self.write_sourcepos(node);
                self.out.push_str(">\n");
            }
            NodeValue::List(list) => {
                self.cr();
                match list.list_type {
                    ListType::Bullet => self.out.push_str("<ul"),
                    ListType::Ordered => {
                        self.out.push_str("<ol");
                        if list.start != 1 {
                            self.out.push_str(&format!(" start=\"{}\"", list.start));
                        }
                    }
                }
                self.write_sourcepos(node);
                self.out.push_str(">\n");
            }
            NodeValue::Item(_) => {
                self.cr();
                self.out.push_str("<li");
                self.write_sourcepos(node);
                self.out.push('>');
            }
            NodeValue::Heading(heading) => {
                self.cr();
                self.out.push_str(&format!("<h{}", heading.level));
                self.write_sourcepos(node);
                self.out.push('>');
            }
            NodeValue::CodeBlock(code) => {
                self.cr();
                self.out.push_str("<pre");
                self.write_sourcepos(node);
                self.out.push_str("><code");
                let language = code
                    .info
                    .split([' ', '\t', '\n', '\r', '\x0B', '\x0C'])
                    .next()
                    .unwrap_or("");
                if !language.is_empty() {
                    self.out.push_str(" class=\"language-");
                    escape_html(&mut self.out, language);
                    self.out.push('"');
                }
                self.out.push('>');
                escape_html(&mut self.out, &code.literal);
                self.out.push_str("</code></pre>\n");
            }
            NodeValue::HtmlBlock(html) => {
                self.cr();
                self.write_raw_html(&html.literal);
                self.cr();
            }
            NodeValue::CustomBlock(custom) => {
                self.cr();
                self.out.push_str(&custom.on_enter);
            }
            NodeValue::ThematicBreak => {
                self.cr();
                self.out.push_str("<hr");
                self.write_sourcepos(node);
                self.out.push_str(" />\n");
            }
            NodeValue::Paragraph => {
                if !self.in_tight_list(node) {
                    self.cr();
                    self.out.push_str("<p");
                    self.write_sourcepos(node);
                    self.out.push('>');
                }
            }
            NodeValue::Text(literal) => escape_html(&mut self.out, literal),
            NodeValue::SoftBreak => {
                if self.config.hardbreaks {
                    self.out.push_str("<br />\n");
                } else if self.config.nobreaks {
                    self.out.push(' ');
                } else {
                    self.out.push('\n');
                }
            }
            NodeValue::LineBreak => self.out.push_str("<br />\n"),
            NodeValue::Code(literal) => {
                self.out.push_str("<code>");
                escape_html(&mut self.out, literal);
                self.out.push_str("</code>");
            }
            NodeValue::HtmlInline(literal) => self.write_raw_html(literal),
            NodeValue::CustomInline(custom) => self.out.push_str(&custom.on_enter),
            NodeValue::Emph => self.out.push_str("<em>"),
            NodeValue::Strong => self.out.push_str("<strong>"),
            NodeValue::Link(link) => {
                self.out.push_str("<a href=\"");
                self.write_url(&link.url);
                self.out.push('"');
                if !link.title.is_empty() {
                    self.out.push_str(" title=\"");
                    escape_html(&mut self.out, &link.title);
                    self.out.push('"');
                }
                self.out.push('>');
            }
            NodeValue::Image(image) => {
                self.out.push_str("<img src=\"");
                self.write_url(&image.url);
                self.out.push_str("\" alt=\"");
                self.plain = Some(node);
            }
        }
    }

    fn exit(&mut self, node: NodeId) {
        let Some(value) = self.tree.value(node) else {
            return;
        };

        if let Some(image) = self.plain {
            if image != node {
                return;
            }
            self.plain = None;
            if let NodeValue::Image(data) = value
                && !data.title.is_empty()
            {
                self.out.push_str("\" title=\"");
                escape_html(&mut self.out, &data.title);
            }
            self.out.push_str("\" />");
            return;
        }

        match value {
            NodeValue::BlockQuote => {
                self.cr();
                self.out.push_str("</blockquote>\n");
            }
            NodeValue::List(list) => match list.list_type {
                ListType::Bullet => self.out.push_str("</ul>\n"),
                ListType::Ordered => self.out.push_str("</ol>\n"),
            },
            NodeValue::Item(_) => self.out.push_str("</li>\n"),
            NodeValue::Heading(heading) => {
                self.out.push_str(&format!("</h{}>\n", heading.level));
            }
            NodeValue::CustomBlock(custom) => {
                self.out.push_str(&custom.on_exit);
                self.cr();
            }
            NodeValue::Paragraph => {
                if !self.in_tight_list(node) {
                    self.out.push_str("</p>\n");
                }
            }
            NodeValue::CustomInline(custom) => self.out.push_str(&custom.on_exit),
            NodeValue::Emph => self.out.push_str("</em>"),
            NodeValue::Strong => self.out.push_str("</strong>"),
            NodeValue::Link(_) => self.out.push_str("</a>"),
            _ => debug_assert!(
                value.kind().is_leaf() || value.kind() == NodeKind::Document,
                "unexpected exit for {}",
                value.kind()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::parser::{parse, parse_with_config};

    fn to_html(input: &str) -> String {
        let tree = parse(input);
        render_html(&tree, tree.root())
    }

    fn to_html_with(input: &str, config: &Config) -> String {
        let tree = parse_with_config(input, config);
        render_html_with_config(&tree, tree.root(), config)
    }

    #[test]
    fn test_escape_href() {
        let mut out = String::new();
        escape_href(&mut out, "foo%20b\u{e4}?a=1&b='x' [y]\\");
        assert_eq!(out, "foo%20b%C3%A4?a=1&amp;b=&#x27;x&#x27;%20%5By%5D%5C");
    }

    #[test]
    fn test_escape_html() {
        let mut out = String::new();
        escape_html(&mut out, "<a href=\"x\">&'");
        assert_eq!(out, "&lt;a href=&quot;x&quot;&gt;&amp;'");
    }

    #[test]
    fn test_code_block_language_class() {
        assert_eq!(
            to_html("```rust extra\nlet x = 1 < 2;\n```\n"),
            "<pre><code class=\"language-rust\">let x = 1 &lt; 2;\n</code></pre>\n"
        );
        assert_eq!(
            to_html("    indented\n"),
            "<pre><code>indented\n</code></pre>\n"
        );
    }

    #[test]
    fn test_ordered_list_start() {
        assert_eq!(
            to_html("3. three\n4. four\n"),
            "<ol start=\"3\">\n<li>three</li>\n<li>four</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_loose_list_keeps_paragraphs() {
        assert_eq!(
            to_html("- a\n\n- b\n"),
            "<ul>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_image_alt_is_plain_text() {
        assert_eq!(
            to_html("![foo *bar* `baz`](/url \"title\")"),
            "<p><img src=\"/url\" alt=\"foo bar baz\" title=\"title\" /></p>\n"
        );
    }

    #[test]
    fn test_blockquote_and_rule() {
        assert_eq!(
            to_html("> quote\n\n---\n"),
            "<blockquote>\n<p>quote</p>\n</blockquote>\n<hr />\n"
        );
    }

    #[test]
    fn test_safe_mode() {
        let config = ConfigBuilder::default().safe(true).build();
        assert_eq!(
            to_html_with("<div>\nraw\n</div>\n\n[x](javascript:alert(1)) <b>", &config),
            "<!-- raw HTML omitted -->\n<p><a href=\"\">x</a> <!-- raw HTML omitted --></p>\n"
        );
        assert_eq!(
            to_html_with("![x](data:image/png;base64,AAAA)", &config),
            "<p><img src=\"data:image/png;base64,AAAA\" alt=\"x\" /></p>\n"
        );
    }

    #[test]
    fn test_soft_break_options() {
        let hard = ConfigBuilder::default().hardbreaks(true).build();
        let none = ConfigBuilder::default().nobreaks(true).build();
        assert_eq!(to_html("a\nb"), "<p>a\nb</p>\n");
        assert_eq!(to_html_with("a\nb", &hard), "<p>a<br />\nb</p>\n");
        assert_eq!(to_html_with("a\nb", &none), "<p>a b</p>\n");
    }

    #[test]
    fn test_sourcepos_attributes() {
        let config = ConfigBuilder::default().sourcepos(true).build();
        assert_eq!(
            to_html_with("# Hi\n\ntext\nmore\n", &config),
            "<h1 data-sourcepos=\"1:1-1:4\">Hi</h1>\n<p data-sourcepos=\"3:1-4:4\">text\nmore</p>\n"
        );
    }

    #[test]
    fn test_custom_nodes() {
        let mut tree = Tree::new();
        let root = tree.root();
        let block = tree.create(NodeKind::CustomBlock);
        tree.set_on_enter(block, "<section>").unwrap();
        tree.set_on_exit(block, "</section>").unwrap();
        let para = tree.create(NodeKind::Paragraph);
        let text = tree.create(NodeKind::Text);
        tree.set_string_content(text, "hi").unwrap();
        tree.append_child(para, text).unwrap();
        tree.append_child(block, para).unwrap();
        tree.append_child(root, block).unwrap();
        assert_eq!(
            render_html(&tree, root),
            "<section>\n<p>hi</p>\n</section>\n"
        );
    }

    #[test]
    fn test_detached_and_stale_nodes() {
        let mut tree = Tree::new();
        let emph = tree.create(NodeKind::Emph);
        let text = tree.create(NodeKind::Text);
        tree.set_string_content(text, "x").unwrap();
        tree.append_child(emph, text).unwrap();
        assert_eq!(render_html(&tree, emph), "<em>x</em>");

        tree.destroy(emph).unwrap();
        assert_eq!(render_html(&tree, emph), "");
    }
}
