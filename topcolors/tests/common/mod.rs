// NOTE: every test will complain about the functions it doesn't use
#![allow(unused)]

use std::{
    fs,
    num::NonZeroUsize,
    path::Path,
    thread,
    time::Duration,
};

use image::RgbImage;
use tempfile::TempDir;
use topcolors::{
    driver::Config,
    fetch::{self, ImageSource, UrlSource},
};

/// A fresh working directory with `data/` in it
pub struct Workdir {
    pub dir: TempDir,
}

impl Workdir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("could not create a temporary dir");
        fs::create_dir(dir.path().join("data")).expect("could not create data dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self, jobs: usize) -> Config {
        Config {
            input: self.path().join("data/input.txt"),
            output: self.path().join("output.csv"),
            jobs: NonZeroUsize::new(jobs).expect("at least one job"),
        }
    }

    /// Saves `img` as a png and returns a `file://` url to it
    pub fn image_url(&self, name: &str, img: &RgbImage) -> String {
        let path = self.path().join(format!("{name}.png"));
        img.save_with_format(&path, image::ImageFormat::Png)
            .expect("could not save the image");
        format!("file://{}", path.display())
    }

    pub fn missing_url(&self, name: &str) -> String {
        format!("file://{}", self.path().join(format!("{name}.png")).display())
    }

    pub fn write_input(&self, lines: &str) {
        fs::write(self.path().join("data/input.txt"), lines).expect("could not write input");
    }

    pub fn read_output(&self) -> String {
        fs::read_to_string(self.path().join("output.csv")).expect("could not read output")
    }
}

/// Finishes later the earlier the url appears, to shuffle the completion order of
/// parallel work.
pub struct SlowFirst {
    pub inner: UrlSource,
    pub order: Vec<String>,
}

impl ImageSource for SlowFirst {
    fn fetch(&self, url: &str) -> fetch::Result<RgbImage> {
        let pos = self.order.iter().position(|u| u == url).unwrap_or(0);
        let delay = self.order.len().saturating_sub(pos) as u64;
        thread::sleep(Duration::from_millis(10 * delay));
        self.inner.fetch(url)
    }
}
