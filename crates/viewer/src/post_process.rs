#![forbid(unsafe_code)]

//! Frame buffer and the pixelation pass applied after rendering.

use config::PostProcessing;

pub type Rgba = [u8; 4];

/// Row-major RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }
}

/// Average each square cell of the frame, optionally collapsing it to luma.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelationFilter {
    cell: u32,
    grayscale: bool,
}

impl PixelationFilter {
    pub fn from_config(pp: &PostProcessing) -> Self {
        Self {
            cell: pp.cell_size(),
            grayscale: pp.grayscale_only,
        }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell
    }

    pub fn apply(&self, frame: &mut Frame) {
        let cell = self.cell.max(1);
        for y0 in (0..frame.height).step_by(cell as usize) {
            for x0 in (0..frame.width).step_by(cell as usize) {
                let x1 = (x0 + cell).min(frame.width);
                let y1 = (y0 + cell).min(frame.height);

                let mut sum = [0u64; 4];
                for y in y0..y1 {
                    for x in x0..x1 {
                        let px = frame.pixels[y as usize * frame.width as usize + x as usize];
                        for (acc, channel) in sum.iter_mut().zip(px) {
                            *acc += u64::from(channel);
                        }
                    }
                }

                let count = u64::from((x1 - x0) * (y1 - y0));
                let mut avg = sum.map(|s| ((s + count / 2) / count) as u8);
                if self.grayscale {
                    let y = luma(avg);
                    avg = [y, y, y, avg[3]];
                }

                for y in y0..y1 {
                    let row = y as usize * frame.width as usize;
                    frame.pixels[row + x0 as usize..row + x1 as usize].fill(avg);
                }
            }
        }
    }
}

/// Rec. 601 luma.
pub fn luma([r, g, b, _]: Rgba) -> u8 {
    let y = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn filter(grid_size: u32, grayscale_only: bool) -> PixelationFilter {
        PixelationFilter::from_config(&PostProcessing {
            grid_size,
            pixel_size_ratio: 1.0,
            grayscale_only,
        })
    }

    #[test]
    fn cells_take_their_average() {
        let mut frame = Frame::new(4, 2);
        frame.set(0, 0, [200, 0, 0, 255]);
        frame.set(1, 1, [0, 0, 0, 255]);
        frame.set(0, 1, [0, 0, 0, 255]);
        frame.set(1, 0, [0, 0, 0, 255]);
        frame.set(2, 0, [10, 20, 30, 40]);

        filter(2, false).apply(&mut frame);

        assert_eq!(frame.get(1, 1), Some([50, 0, 0, 255]));
        assert_eq!(frame.get(0, 0), frame.get(1, 1));
        // (10 + 0 + 0 + 0) / 4 rounds to 3
        assert_eq!(frame.get(3, 1), Some([3, 5, 8, 10]));
    }

    #[test]
    fn grayscale_uses_luma_and_keeps_alpha() {
        let mut frame = Frame::filled(3, 3, [255, 0, 0, 128]);
        filter(4, true).apply(&mut frame);
        assert!(frame.pixels().iter().all(|px| *px == [76, 76, 76, 128]));
    }

    #[test]
    fn partial_edge_cells_are_handled() {
        let mut frame = Frame::filled(5, 5, [9, 9, 9, 9]);
        frame.set(4, 4, [1, 1, 1, 1]);
        filter(4, false).apply(&mut frame);
        assert_eq!(frame.get(4, 4), Some([1, 1, 1, 1]));
        assert_eq!(frame.get(4, 0), Some([9, 9, 9, 9]));
    }

    proptest! {
        #[test]
        fn uniform_frames_are_fixed_points(w in 1u32..40, h in 1u32..40, grid in 1u32..12, v in any::<u8>()) {
            let mut frame = Frame::filled(w, h, [v, v, v, 255]);
            let before = frame.clone();
            filter(grid, true).apply(&mut frame);
            prop_assert_eq!(frame, before);
        }
    }
}
