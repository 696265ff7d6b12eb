use std::{
    fs::File,
    io::{self, Cursor, Read},
    path::Path,
    time::Duration,
};

use image::{io::Reader as ImageReader, ImageError, RgbImage};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_BYTES: u64 = 64 * 1024 * 1024;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, thiserror::Error)]
#[error("failed when {context}: {kind}")]
pub struct FetchError {
    context: &'static str,
    kind: ErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("http: {0}")]
    Http(Box<ureq::Error>),
    #[error("image: {0}")]
    Image(#[from] ImageError),
    #[error("unsupported or missing url scheme in '{0}'")]
    Scheme(String),
    #[error("the image is larger than {0} bytes")]
    TooLarge(u64),
}

impl From<ureq::Error> for ErrorKind {
    fn from(value: ureq::Error) -> Self {
        Self::Http(Box::new(value))
    }
}

impl FetchError {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

trait ErrContext<T> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T, E> ErrContext<T> for std::result::Result<T, E>
where
    E: Into<ErrorKind>,
{
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|e| FetchError {
            context,
            kind: e.into(),
        })
    }
}

/// Turns a url into decoded pixels. Implementations are shared between worker threads.
pub trait ImageSource: Sync {
    fn fetch(&self, url: &str) -> Result<RgbImage>;
}

/// Fetches `http://`, `https://` and `file://` urls.
pub struct UrlSource {
    agent: ureq::Agent,
    max_bytes: u64,
}

impl UrlSource {
    pub fn new(timeout: Duration, max_bytes: u64) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent, max_bytes }
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.agent.get(url).call().context("downloading")?;
        log::debug!(
            "{url} responded with {} ({})",
            response.status(),
            response.content_type()
        );
        read_limited(response.into_reader(), self.max_bytes).context("downloading")
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let file = File::open(path).context("opening the file")?;
        read_limited(file, self.max_bytes).context("reading the file")
    }
}

impl Default for UrlSource {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_MAX_BYTES)
    }
}

impl ImageSource for UrlSource {
    fn fetch(&self, url: &str) -> Result<RgbImage> {
        let bytes = match Scheme::of(url) {
            Some(Scheme::Http) => self.download(url)?,
            Some(Scheme::File(path)) => self.read_file(path)?,
            None => {
                return Err(ErrorKind::Scheme(url.to_string())).context("parsing the url")
            }
        };
        decode(bytes)
    }
}

enum Scheme<'a> {
    Http,
    File(&'a Path),
}

impl<'a> Scheme<'a> {
    fn of(url: &'a str) -> Option<Self> {
        let (scheme, rest) = url.split_once("://")?;
        if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
            Some(Self::Http)
        } else if scheme.eq_ignore_ascii_case("file") {
            let path = rest.strip_prefix("localhost").unwrap_or(rest);
            path.starts_with('/').then(|| Self::File(Path::new(path)))
        } else {
            None
        }
    }
}

fn read_limited(reader: impl Read, max_bytes: u64) -> std::result::Result<Vec<u8>, ErrorKind> {
    let mut bytes = Vec::new();
    reader
        .take(max_bytes.saturating_add(1))
        .read_to_end(&mut bytes)?;
    if bytes.len() as u64 > max_bytes {
        return Err(ErrorKind::TooLarge(max_bytes));
    }
    Ok(bytes)
}

/// Guesses the format from the bytes themselves. Alpha is thrown away.
pub fn decode(bytes: Vec<u8>) -> Result<RgbImage> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("guessing the image format")?
        .decode()
        .context("decoding")?;
    Ok(image.to_rgb8())
}

#[cfg(test)]
mod test {
    use image::{ImageOutputFormat, Rgb, Rgba, RgbaImage};

    use super::*;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageOutputFormat::Png)
            .expect("writing to a vec works");
        bytes.into_inner()
    }

    #[test]
    fn decode_drops_alpha() -> Result<()> {
        let img = RgbaImage::from_pixel(2, 3, Rgba([1, 2, 3, 0]));
        let decoded = decode(png_bytes(&img))?;
        assert_eq!((2, 3), decoded.dimensions());
        assert!(decoded.pixels().all(|p| *p == Rgb([1, 2, 3])));
        Ok(())
    }

    #[test]
    fn decode_garbage() {
        let err = decode(b"definitely not a picture".to_vec()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Image(_)));
    }

    #[test]
    fn bad_schemes() {
        let source = UrlSource::default();
        for url in ["", "   ", "not a url", "ftp://example.com/a.png", "file://relative"] {
            let err = source.fetch(url).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::Scheme(_)), "{url}: {err}");
        }
    }

    #[test]
    fn file_urls() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("red.png");
        std::fs::write(&path, png_bytes(&RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]))))?;

        let url = format!("file://{}", path.display());
        let img = UrlSource::default().fetch(&url)?;
        assert_eq!(&Rgb([255, 0, 0]), img.get_pixel(0, 0));

        let tiny = UrlSource::new(DEFAULT_TIMEOUT, 8);
        assert!(matches!(tiny.fetch(&url).unwrap_err().kind(), ErrorKind::TooLarge(8)));

        let missing = format!("file://{}", dir.path().join("nope.png").display());
        assert!(matches!(
            UrlSource::default().fetch(&missing).unwrap_err().kind(),
            ErrorKind::Io(_)
        ));
        Ok(())
    }

    #[test]
    fn read_limited_boundary() {
        assert_eq!(4, read_limited(&b"abcd"[..], 4).expect("fits").len());
        assert!(matches!(read_limited(&b"abcde"[..], 4), Err(ErrorKind::TooLarge(4))));
    }
}
