use crate::block::BlockNode;
use crate::scope::ScopeContext;

/// Visitor pattern for traversing block trees immutably
///
/// The default implementations walk the whole tree, deriving a child scope
/// every time a container is entered. Override `visit_*` methods to act on
/// blocks; call the matching `walk_*` function to keep descending.
pub trait Visitor: Sized {
    fn visit_blocks(&mut self, blocks: &[BlockNode], scope: &ScopeContext<'_>) {
        walk_blocks(self, blocks, scope);
    }

    fn visit_block(&mut self, block: &BlockNode, scope: &ScopeContext<'_>) {
        walk_block(self, block, scope);
    }
}

pub fn walk_blocks<V: Visitor>(visitor: &mut V, blocks: &[BlockNode], scope: &ScopeContext<'_>) {
    for block in blocks {
        visitor.visit_block(block, scope);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &BlockNode, scope: &ScopeContext<'_>) {
    if let Some(children) = block.children() {
        let inner = scope.enter(block);
        visitor.visit_blocks(children, &inner);
    }
}
