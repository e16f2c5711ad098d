//! CommonMark parser building a mutable, navigable document tree, with an
//! HTML renderer.
//!
//! ```rust
//! use cmark_tree::{NodeKind, Tree, markdown_to_html, parse, render_html};
//!
//! assert_eq!(markdown_to_html("Boo\n==="), "<h1>Boo</h1>\n");
//!
//! let mut tree = parse("# Title\n\nBody");
//! let heading = tree.first_child(tree.root()).unwrap();
//! tree.set_heading_level(heading, 2).unwrap();
//! assert_eq!(render_html(&tree, tree.root()), "<h2>Title</h2>\n<p>Body</p>\n");
//! ```

pub mod config;
pub mod error;
mod parser;
pub mod render;
pub mod tree;

pub use config::{Config, ConfigBuilder};
pub use error::{ConfigError, ParseError, TreeError};
pub use parser::{Parser, parse, parse_with_config};
pub use render::{debug_print, debug_string, render_html, render_html_with_config};
pub use tree::{ListDelimType, ListType, NodeEvent, NodeId, NodeKind, NodeValue, Sourcepos, Tree};

/// Parses `input` and renders the whole document as HTML.
pub fn markdown_to_html(input: &str) -> String {
    markdown_to_html_with_config(input, &Config::default())
}

/// Parses and renders with the same configuration for both steps.
pub fn markdown_to_html_with_config(input: &str, config: &Config) -> String {
    let tree = parse_with_config(input, config);
    render_html_with_config(&tree, tree.root(), config)
}
