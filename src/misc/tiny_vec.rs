use std::ops::Deref;

/// Fixed capacity vector living entirely on the stack.
///
/// Only the first `len` slots are meaningful; the rest hold `T::default()`.
/// Used for the short per-move lists the rules engine returns (captured tokens,
/// movable tokens) so that outcomes stay `Copy`.
#[derive(Debug, Clone, Copy)]
pub struct TinyVec<T, const N: usize>
where
    T: Copy + Default,
{
    buf: [T; N],
    len: u8,
}

impl<T, const N: usize> TinyVec<T, N>
where
    T: Copy + Default,
{
    pub fn new() -> Self {
        const { assert!(N <= 255, "TinyVec supports up to 255 elements") }
        TinyVec { buf: [T::default(); N], len: 0 }
    }

    pub fn push(&mut self, val: T) {
        assert!((self.len as usize) < N, "TinyVec is full");
        self.buf[self.len as usize] = val;
        self.len += 1;
    }

}

impl<T: Copy + Default, const N: usize> Default for TinyVec<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default, const N: usize> Deref for TinyVec<T, N> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.buf[..self.len as usize]
    }
}

impl<T: Copy + Default + PartialEq, const N: usize> PartialEq for TinyVec<T, N> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Copy + Default + Eq, const N: usize> Eq for TinyVec<T, N> {}

impl<T: Copy + Default, const N: usize> FromIterator<T> for TinyVec<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = TinyVec::new();
        for val in iter {
            vec.push(val);
        }
        vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push() {
        let mut vec: TinyVec<u8, 4> = TinyVec::new();
        assert!(vec.is_empty());
        vec.push(3);
        vec.push(5);
        assert_eq!(&*vec, &[3, 5]);
        assert_eq!(vec.len(), 2);

        let collected: TinyVec<u8, 4> = [3, 5].into_iter().collect();
        assert_eq!(vec, collected);
    }

    #[test]
    fn test_collect() {
        let vec: TinyVec<u8, 6> = (1..=6).filter(|v| v % 2 == 0).collect();
        assert_eq!(&*vec, &[2, 4, 6]);
    }

    #[test]
    #[should_panic(expected = "TinyVec is full")]
    fn test_overflow_panics() {
        let mut vec: TinyVec<u8, 1> = TinyVec::new();
        vec.push(1);
        vec.push(2);
    }
}
