//! Index arithmetic for the implicit d-ary heap, root at index 0.

pub(crate) const fn parent_of<const D: usize>(child: usize) -> usize {
    (child - 1) / D
}

pub(crate) const fn left_child_of<const D: usize>(parent: usize) -> usize {
    D * parent + 1
}
