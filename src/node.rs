use crate::reference::Ref;

/// A decision node: `if variable then high else low`.
///
/// The terminal node carries variable `0` and points to itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Node {
    pub const fn terminal() -> Self {
        Self {
            variable: 0,
            low: Ref::positive(1),
            high: Ref::positive(1),
        }
    }

    pub const fn is_terminal(&self) -> bool {
        self.variable == 0
    }
}
