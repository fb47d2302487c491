use rand::seq::SliceRandom;
use rand::Rng;

use super::idx::{IdxImages, IdxLabels};
use crate::errors::{NetError, Result};

pub const CLASSES: usize = 10;

/// Labelled greyscale images held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    rows: usize,
    cols: usize,
    pixels: Vec<u8>,
    labels: Vec<u8>,
}

impl Dataset {
    pub fn new(images: IdxImages, labels: IdxLabels) -> Result<Self> {
        if images.count != labels.labels.len() {
            return Err(NetError::Format(format!(
                "{} images but {} labels",
                images.count,
                labels.labels.len()
            )));
        }
        Self::from_parts(images.rows, images.cols, images.pixels, labels.labels)
    }

    pub fn from_parts(rows: usize, cols: usize, pixels: Vec<u8>, labels: Vec<u8>) -> Result<Self> {
        if rows * cols == 0 {
            return Err(NetError::Format(format!("empty image shape {rows}x{cols}")));
        }
        if pixels.len() != labels.len() * rows * cols {
            return Err(NetError::Format(format!(
                "{} pixels do not make {} images of {rows}x{cols}",
                pixels.len(),
                labels.len()
            )));
        }
        if let Some(i) = labels.iter().position(|&l| l as usize >= CLASSES) {
            return Err(NetError::Format(format!(
                "label {} at index {i} is not a digit",
                labels[i]
            )));
        }
        Ok(Self {
            rows,
            cols,
            pixels,
            labels,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Pixels per image.
    #[inline]
    pub fn image_size(&self) -> usize {
        self.rows * self.cols
    }

    /// Image `i` and its label, or `None` past the end.
    pub fn get(&self, i: usize) -> Option<(&[u8], u8)> {
        let label = *self.labels.get(i)?;
        Some((self.image(i), label))
    }

    /// # Panics
    /// If `i >= self.len()`. The same holds for `input`, `label` and `one_hot`.
    pub fn image(&self, i: usize) -> &[u8] {
        let n = self.image_size();
        &self.pixels[i * n..(i + 1) * n]
    }

    /// Network input for image `i`, pixels scaled to [0, 1].
    pub fn input(&self, i: usize) -> Vec<f64> {
        self.image(i).iter().map(|&p| p as f64 / 255.0).collect()
    }

    pub fn label(&self, i: usize) -> u8 {
        self.labels[i]
    }

    /// Desired network output for image `i`.
    pub fn one_hot(&self, i: usize) -> Vec<f64> {
        let mut v = vec![0.0; CLASSES];
        v[self.labels[i] as usize] = 1.0;
        v
    }

    /// Reorder examples; each image keeps its label.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);

        let n = self.image_size();
        let mut pixels = Vec::with_capacity(self.pixels.len());
        let mut labels = Vec::with_capacity(self.labels.len());
        for &i in &order {
            pixels.extend_from_slice(&self.pixels[i * n..(i + 1) * n]);
            labels.push(self.labels[i]);
        }
        self.pixels = pixels;
        self.labels = labels;
    }

    /// Keep only the first `n` examples.
    pub fn truncate(&mut self, n: usize) {
        if n < self.len() {
            self.labels.truncate(n);
            self.pixels.truncate(n * self.image_size());
        }
    }

    /// One text row per pixel row, `*` where the pixel is lit.
    pub fn render_ascii(&self, i: usize) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in self.image(i).chunks(self.cols) {
            for &p in row {
                out.push(if p > 0 { '*' } else { ' ' });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // image i is filled with value i*10, labelled i % 10
    fn tiny(n: usize) -> Dataset {
        let pixels = (0..n).flat_map(|i| vec![(i * 10) as u8; 4]).collect();
        let labels = (0..n).map(|i| (i % 10) as u8).collect();
        Dataset::from_parts(2, 2, pixels, labels).unwrap()
    }

    #[test]
    fn indexes_images_and_labels() {
        let d = tiny(3);
        assert_eq!(d.len(), 3);
        assert_eq!(d.image(2), &[20, 20, 20, 20]);
        assert_eq!(d.label(1), 1);
        assert_eq!(d.one_hot(2), vec![0., 0., 1., 0., 0., 0., 0., 0., 0., 0.]);
        assert!(d.input(2).iter().all(|&x| (x - 20.0 / 255.0).abs() < 1e-12));
    }

    #[test]
    fn get_is_bounds_checked() {
        let d = tiny(3);
        assert_eq!(d.get(1), Some((&[10u8, 10, 10, 10][..], 1)));
        assert_eq!(d.get(3), None);
        assert_eq!(d.get(usize::MAX), None);
    }

    #[test]
    fn shuffle_keeps_pairs_together() {
        let mut d = tiny(10);
        d.shuffle(&mut StdRng::seed_from_u64(3));
        assert_eq!(d.len(), 10);
        for i in 0..d.len() {
            assert_eq!(d.image(i)[0] as usize / 10 % 10, d.label(i) as usize);
        }
        let mut labels: Vec<u8> = (0..10).map(|i| d.label(i)).collect();
        labels.sort_unstable();
        assert_eq!(labels, (0..10).collect::<Vec<u8>>());
    }

    #[test]
    fn rejects_bad_shapes_and_labels() {
        assert!(Dataset::from_parts(2, 2, vec![0; 7], vec![1, 2]).is_err());
        assert!(Dataset::from_parts(2, 2, vec![0; 4], vec![10]).is_err());
        assert!(Dataset::from_parts(0, 2, vec![], vec![]).is_err());
        let imgs = IdxImages {
            count: 2,
            rows: 1,
            cols: 1,
            pixels: vec![0, 0],
        };
        let labels = IdxLabels { labels: vec![3] };
        assert!(Dataset::new(imgs, labels).is_err());
    }

    #[test]
    fn ascii_render_marks_lit_pixels() {
        let d = Dataset::from_parts(2, 3, vec![0, 5, 0, 9, 0, 1], vec![4]).unwrap();
        assert_eq!(d.render_ascii(0), " * \n* *\n");
    }

    #[test]
    fn truncate_limits_examples() {
        let mut d = tiny(5);
        d.truncate(2);
        assert_eq!(d.len(), 2);
        assert_eq!(d.image(1), &[10, 10, 10, 10]);
        d.truncate(50);
        assert_eq!(d.len(), 2);
    }
}
