//! Effects - side effects declared by the reducer

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch a catalog page; `cursor` is used verbatim.
    LoadPage { seq: u64, cursor: String },
    /// Fetch one entry's detail record.
    LoadDetail { seq: u64, name: String },
    /// Flip and persist favorite membership.
    ToggleFavorite { name: String },
    /// Flip and persist the theme flag, then apply it to the renderer.
    ToggleTheme,
}
