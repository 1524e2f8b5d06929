/// Rearranges the slice into the next permutation in lexicographic order. Returns false, leaving
/// the slice sorted, if it was already the last permutation.
pub fn next_permutation(items: &mut [usize]) -> bool {
    if items.len() < 2 {
        return false;
    }

    // find the longest non-increasing suffix
    let mut pivot = items.len() - 1;
    while pivot > 0 && items[pivot - 1] >= items[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        items.reverse();
        return false;
    }

    let mut successor = items.len() - 1;
    while items[successor] <= items[pivot - 1] {
        successor -= 1;
    }
    items.swap(pivot - 1, successor);
    items[pivot..].reverse();
    true
}

/// Every permutation of `0..n`, in lexicographic order, starting with the identity.
pub fn permutations(n: usize) -> Permutations {
    Permutations {
        current: (0..n).collect(),
        done: false,
    }
}

/// An iterator over permutations, created by [`permutations`].
pub struct Permutations {
    current: Vec<usize>,
    done: bool,
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.current.clone();
        self.done = !next_permutation(&mut self.current);
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn lexicographic() {
        let all = permutations(3).collect::<Vec<_>>();
        assert_eq!(all, vec![
            vec![0, 1, 2],
            vec![0, 2, 1],
            vec![1, 0, 2],
            vec![1, 2, 0],
            vec![2, 0, 1],
            vec![2, 1, 0],
        ]);
    }

    #[test]
    fn empty() {
        assert_eq!(permutations(0).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(permutations(4).count(), 24);
    }
}
