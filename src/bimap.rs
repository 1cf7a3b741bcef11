use std::marker::PhantomData;

/// A total, invertible map between two types.
///
/// Implementations must satisfy `apply_inverse(&apply(t)) == t` for every `t` in the domain
/// and `apply(&apply_inverse(i)) == i` for every `i` in the codomain.
pub trait BiMap {
    type Domain;
    type Codomain;

    fn apply(&self, t: &Self::Domain) -> Self::Codomain;
    fn apply_inverse(&self, i: &Self::Codomain) -> Self::Domain;
}

/// Swaps the components of pairs. Self-inverse.
#[derive(Debug, Clone, Copy)]
pub struct SwapBimap<T>(PhantomData<T>);

impl<T> SwapBimap<T> {
    pub const fn new() -> Self {
        SwapBimap(PhantomData)
    }
}

impl<T> Default for SwapBimap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> BiMap for SwapBimap<T> {
    type Domain = (T, T);
    type Codomain = (T, T);

    fn apply(&self, t: &(T, T)) -> (T, T) {
        (t.1.clone(), t.0.clone())
    }

    fn apply_inverse(&self, i: &(T, T)) -> (T, T) {
        self.apply(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_is_self_inverse() {
        let swap = SwapBimap::<char>::new();
        assert_eq!(swap.apply(&('a', 'b')), ('b', 'a'));
        assert_eq!(swap.apply_inverse(&swap.apply(&('a', 'b'))), ('a', 'b'));
    }
}
