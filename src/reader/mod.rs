pub mod vcf;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{CustomError, Result};
use crate::model::Site;

/// Source of per-site records, aligned to a fixed sample header.
pub trait SiteSource: Iterator<Item = Result<Site>> {
    fn samples(&self) -> &[String];
}

/// Open a text file, transparently decompressing when the name ends in .gz.
pub(crate) fn open_text(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let f = File::open(path).map_err(|e| CustomError::ReadWithPath {
        source: e,
        path: path.to_path_buf(),
    })?;
    let is_gz = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if is_gz {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(BufReader::new(
            f,
        )))))
    } else {
        Ok(Box::new(BufReader::new(f)))
    }
}
