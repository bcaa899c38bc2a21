//! Arena allocator for syntax tree nodes.
//!
//! Every node produced by a single parse lives in one arena and is freed
//! together with it, so trees and the cursors borrowing them can never
//! outlive the pass that created them.

use bumpalo::Bump;

/// Bump arena owning the nodes and token texts of one parse.
///
/// # Example
///
/// ```rust
/// use solint_cst::CstArena;
///
/// let arena = CstArena::new();
/// let text = arena.alloc_str("uint256");
/// assert_eq!(text, "uint256");
/// ```
pub struct CstArena {
    bump: Bump,
}

impl CstArena {
    /// Creates a new, empty arena.
    #[inline]
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Creates an arena pre-sized for roughly `capacity` bytes.
    ///
    /// Parsers size it from the source length to avoid regrowing while
    /// building large trees.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    /// Allocates a value in the arena.
    #[inline]
    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    /// Copies a string into the arena.
    #[inline]
    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    /// Copies a slice into the arena.
    #[inline]
    pub fn alloc_slice_copy<T: Copy>(&self, slice: &[T]) -> &[T] {
        self.bump.alloc_slice_copy(slice)
    }

    /// Total bytes currently allocated.
    #[inline]
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for CstArena {
    fn default() -> Self {
        Self::new()
    }
}
