use std::collections::HashMap;

use image::{GenericImageView, Rgb};

use crate::color::Rgb24;

/// How many times every color occurs in an image. Every stored count is at least one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: HashMap<Rgb24, u64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visits every pixel exactly once.
    pub fn from_image<I>(img: &I) -> Self
    where
        I: GenericImageView<Pixel = Rgb<u8>>,
    {
        // NOTE: `pixels()` doesn't stop on zero width images, it keeps going down the rows
        // and indexes out of bounds
        if img.width() == 0 || img.height() == 0 {
            return Self::new();
        }
        Self::from_pixels(img.pixels().map(|(_, _, rgb)| Rgb24::from_pixel(rgb)))
    }

    pub fn from_pixels(pixels: impl IntoIterator<Item = Rgb24>) -> Self {
        let mut hist = Self::new();
        hist.extend(pixels);
        hist
    }

    pub fn add(&mut self, color: Rgb24) {
        *self.counts.entry(color).or_insert(0) += 1;
    }

    /// Number of distinct colors
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of pixels seen
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn count(&self, color: Rgb24) -> u64 {
        self.counts.get(&color).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rgb24, u64)> + '_ {
        self.counts.iter().map(|(&color, &count)| (color, count))
    }
}

impl Extend<Rgb24> for Histogram {
    fn extend<T: IntoIterator<Item = Rgb24>>(&mut self, iter: T) {
        iter.into_iter().for_each(|color| self.add(color))
    }
}
