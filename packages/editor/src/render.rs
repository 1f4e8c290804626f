//! Plain-text outline of a block tree.
//!
//! ```text
//! name (text) "Name" [person.name = "Ada"]
//! stack (stack)
//!   submit (button)
//!   + main.stack
//! <fallback> main.legacy
//! + main
//! ```
//!
//! Unknown block types render as a placeholder naming where they sit. In an
//! editable scope every child list ends with a `+ <target>` line naming the
//! drop target a block released there would report.

use formwork_blocks::{get_value, walk_block, walk_blocks, BlockNode, ScopeContext, ValueBag, Visitor};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Visitor that writes one line per block
pub struct OutlineRenderer<'v> {
    values: &'v ValueBag,
    output: String,
}

impl<'v> OutlineRenderer<'v> {
    pub fn new(values: &'v ValueBag) -> Self {
        Self {
            values,
            output: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.output.push_str(INDENT);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn describe_block(&self, block: &BlockNode) -> String {
        let mut text = format!("{} ({})", block.key, block.block_type);

        if let Some(label) = block.str_property("label").or_else(|| block.str_property("text")) {
            let _ = write!(text, " {:?}", label);
        }

        if block.has_field() {
            let value = get_value(self.values, &block.field_key)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(text, " [{} = {}]", block.field_key, value);
        }

        text
    }
}

impl Visitor for OutlineRenderer<'_> {
    fn visit_blocks(&mut self, blocks: &[BlockNode], scope: &ScopeContext<'_>) {
        walk_blocks(self, blocks, scope);
        if scope.is_editable() {
            self.line(scope.depth(), &format!("+ {}", scope.drop_target()));
        }
    }

    fn visit_block(&mut self, block: &BlockNode, scope: &ScopeContext<'_>) {
        if scope.describe(&block.block_type).is_none() {
            let location = format!("{}.{}", scope.zone(), scope.key_path_of(block));
            self.line(scope.depth(), &format!("<{}> {}", scope.resolve(&block.block_type).id, location));
        } else {
            let text = self.describe_block(block);
            self.line(scope.depth(), &text);
        }

        walk_block(self, block, scope);
    }
}

/// Render `blocks` as an indented outline
pub fn render_outline(blocks: &[BlockNode], scope: &ScopeContext<'_>, values: &ValueBag) -> String {
    let mut renderer = OutlineRenderer::new(values);
    renderer.visit_blocks(blocks, scope);
    renderer.finish()
}
