//! Indented one-node-per-line dump of a subtree, for diagnostics.

use std::fmt::Write;

use crate::tree::{ListDelimType, ListType, NodeEvent, NodeId, NodeValue, Tree};

/// Dumps the subtree at `id`, two spaces of indentation per level.
///
/// The format is meant for people and snapshot tests, not for parsing.
pub fn debug_string(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for event in tree.traverse(id) {
        match event {
            NodeEvent::Enter(node) => {
                let Some(value) = tree.value(node) else {
                    continue;
                };
                out.push_str(&"  ".repeat(depth));
                out.push_str(value.kind().name());
                write_attributes(&mut out, value);
                out.push('\n');
                if !value.kind().is_leaf() {
                    depth += 1;
                }
            }
            NodeEvent::Exit(_) => depth = depth.saturating_sub(1),
        }
    }
    out
}

/// Logs [`debug_string`] at debug level.
pub fn debug_print(tree: &Tree, id: NodeId) {
    log::debug!("\n{}", debug_string(tree, id));
}

fn write_attributes(out: &mut String, value: &NodeValue) {
    // Writing into a String cannot fail.
    let _ = match value {
        NodeValue::Heading(heading) => write!(out, " level={}", heading.level),
        NodeValue::List(list) => {
            let _ = match list.list_type {
                ListType::Bullet => write!(out, " type=bullet"),
                ListType::Ordered => {
                    let delim = match list.delimiter {
                        Some(ListDelimType::Paren) => "paren",
                        Some(ListDelimType::Period) | None => "period",
                    };
                    write!(out, " type=ordered start={} delim={delim}", list.start)
                }
            };
            write!(out, " tight={}", list.tight)
        }
        NodeValue::CodeBlock(code) => {
            if !code.info.is_empty() {
                let _ = write!(out, " info={:?}", code.info);
            }
            write!(out, " {:?}", code.literal)
        }
        NodeValue::HtmlBlock(html) => write!(out, " {:?}", html.literal),
        NodeValue::Text(literal) | NodeValue::Code(literal) | NodeValue::HtmlInline(literal) => {
            write!(out, " {literal:?}")
        }
        NodeValue::Link(link) | NodeValue::Image(link) => {
            let _ = write!(out, " url={:?}", link.url);
            if link.title.is_empty() {
                Ok(())
            } else {
                write!(out, " title={:?}", link.title)
            }
        }
        NodeValue::CustomBlock(custom) | NodeValue::CustomInline(custom) => write!(
            out,
            " on_enter={:?} on_exit={:?}",
            custom.on_enter, custom.on_exit
        ),
        _ => Ok(()),
    };
}
