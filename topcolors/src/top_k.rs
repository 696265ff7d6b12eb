use std::cmp::Ordering;

use crate::{color::Rgb24, histogram::Histogram};

/// How many colors end up in a record
pub const TOP_COLORS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ranked {
    pub color: Rgb24,
    pub count: u64,
}

impl Ranked {
    /// `Less` means `self` ranks higher. Higher counts first, then lower colors.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.color.cmp(&other.color))
    }
}

/// The `K` highest ranked colors seen so far, best first. Only the first `len` slots
/// are in use.
#[derive(Clone, Copy, Debug)]
pub struct TopK<const K: usize> {
    slots: [Option<Ranked>; K],
    len: usize,
}

impl<const K: usize> TopK<K> {
    pub fn new() -> Self {
        Self {
            slots: [None; K],
            len: 0,
        }
    }

    pub fn from_histogram(hist: &Histogram) -> Self {
        let mut top = Self::new();
        hist.iter()
            .for_each(|(color, count)| top.offer(Ranked { color, count }));
        top
    }

    pub fn offer(&mut self, candidate: Ranked) {
        let pos = self.slots[..self.len]
            .iter()
            .flatten()
            .position(|taken| candidate.rank(taken).is_lt())
            .unwrap_or(self.len);

        if pos >= K {
            return;
        }

        self.slots[pos..].rotate_right(1);
        self.slots[pos] = Some(candidate);
        self.len = (self.len + 1).min(K);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn ranked(&self) -> impl Iterator<Item = Ranked> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn colors(&self) -> Vec<Rgb24> {
        self.ranked().map(|r| r.color).collect()
    }
}

impl<const K: usize> Default for TopK<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// The most common colors, at most [`TOP_COLORS`] of them.
pub fn top_colors(hist: &Histogram) -> Vec<Rgb24> {
    TopK::<TOP_COLORS>::from_histogram(hist).colors()
}
