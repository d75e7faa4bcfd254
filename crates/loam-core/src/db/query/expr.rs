///
/// SetExpr
///
/// Lazily-built set expression. Leaves name existing store keys (index
/// sets, the membership set); internal nodes are the three set operations
/// over one or more sub-expressions. Building is pure; nothing touches
/// the store until a plan is executed.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SetExpr {
    Key(String),
    Inter(Vec<SetExpr>),
    Union(Vec<SetExpr>),
    Diff(Vec<SetExpr>),
}

impl SetExpr {
    /// The leaf key, when the expression needs no evaluation at all.
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            _ => None,
        }
    }

    /// Intersection, collapsing the trivial single-part case.
    #[must_use]
    pub(crate) fn inter(parts: Vec<Self>) -> Self {
        Self::collapse(parts, Self::Inter)
    }

    /// Union, collapsing the trivial single-part case.
    #[must_use]
    pub(crate) fn union_of(parts: Vec<Self>) -> Self {
        Self::collapse(parts, Self::Union)
    }

    fn collapse(mut parts: Vec<Self>, node: fn(Vec<Self>) -> Self) -> Self {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            node(parts)
        }
    }
}
