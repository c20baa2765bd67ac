/// Anything that can be referred to by a display name.
pub trait Named {
    /// The name shown to users, if one can be determined.
    fn name(&self) -> Option<&str>;
}
