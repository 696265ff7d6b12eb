//! Finds the three most common colors of images behind a list of urls.

pub mod color;
pub mod driver;
pub mod fetch;
pub mod histogram;
pub mod record;
pub mod top_k;
