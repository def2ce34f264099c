/// Kotlin-style scope functions to keep call chains going where Rust would
/// otherwise force an intermediate binding.
pub trait LetAlso: Sized {
    /// Consumes `self` and passes it to `f`, returning the result.
    fn let_owned<R, F>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }

    /// Passes `self` to `f` for a side effect and returns `self` unchanged.
    fn also<F>(self, f: F) -> Self
    where
        F: FnOnce(&Self),
    {
        f(&self);
        self
    }
}

impl<T: Sized> LetAlso for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn let_owned_maps_value() {
        let result = 21.let_owned(|x| x * 2);
        assert_eq!(result, 42);
    }

    #[test]
    fn also_returns_value_unchanged() {
        let mut seen = 0;
        let result = 7.also(|x| seen = *x);
        assert_eq!(result, 7);
        assert_eq!(seen, 7);
    }
}
