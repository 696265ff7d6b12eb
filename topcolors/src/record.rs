use std::{fmt, io};

use crate::{
    color::{HexToken, Rgb24},
    top_k::TOP_COLORS,
};

/// One line of the output csv.
///
/// The url is written verbatim, so a url containing a comma or a newline will break the
/// column layout of that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    url: String,
    colors: [Option<Rgb24>; TOP_COLORS],
}

impl Record {
    /// Colors past the third are ignored, missing ones become `NULL`.
    pub fn new(url: impl Into<String>, top: &[Rgb24]) -> Self {
        let mut colors = [None; TOP_COLORS];
        colors
            .iter_mut()
            .zip(top)
            .for_each(|(slot, &color)| *slot = Some(color));
        Self {
            url: url.into(),
            colors,
        }
    }

    /// Writes the whole line, newline included, in one call.
    pub fn write_line<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(format!("{self}\n").as_bytes())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)?;
        for color in self.colors {
            write!(f, ",{}", HexToken(color))?;
        }
        Ok(())
    }
}
