//! Renderers over a finished (or hand-built) [`Tree`](crate::Tree).

mod debug;
mod html;

pub use debug::{debug_print, debug_string};
pub use html::{render_html, render_html_with_config};
