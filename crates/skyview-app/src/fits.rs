//! Minimal reader for HEALPix maps stored as FITS binary tables.
//!
//! A HEALPix FITS file is an empty primary HDU followed by a `BINTABLE`
//! extension. The map is the first column, either one pixel per row or a
//! fixed-size vector of pixels per row (`TFORM1 = '1024E'`). Resolution and
//! ordering come from the `NSIDE` and `ORDERING` header keywords.
//!
//! ```text
//! +---------------------------+------------------------------+
//! | primary header (2880*k)   | extension header (2880*k)    |
//! +---------------------------+------------------------------+
//! | table rows, big-endian, padded to a multiple of 2880     |
//! +----------------------------------------------------------+
//! ```

use std::path::Path;

use skyview_healpix::{FieldError, MAX_NSIDE, PixelOrdering, SphericalField, pixel_count};
use tracing::{debug, warn};

/// FITS logical record size.
const BLOCK: usize = 2880;
/// Header card size.
const CARD: usize = 80;

/// Errors raised while reading a HEALPix FITS file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file ends before a header or the table data is complete.
    #[error("file truncated: needed {needed} bytes, {available} available")]
    Truncated {
        /// Bytes required.
        needed: usize,
        /// Bytes present.
        available: usize,
    },

    /// A required header keyword is absent.
    #[error("missing header keyword {0}")]
    MissingKeyword(&'static str),

    /// A header keyword holds an unusable value.
    #[error("invalid value for {keyword}: '{value}'")]
    InvalidKeyword {
        /// The keyword.
        keyword: &'static str,
        /// Its raw value.
        value: String,
    },

    /// No binary table extension follows the primary HDU.
    #[error("no BINTABLE extension found")]
    NoTable,

    /// The first column is not a float or double column that fits its row.
    #[error("unsupported column format '{0}'")]
    UnsupportedColumn(String),

    /// The table does not describe a valid HEALPix field.
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// A map as read from disk, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    /// Resolution parameter.
    pub nside: u64,
    /// Pixel ordering of `values`.
    pub ordering: PixelOrdering,
    /// `COORDSYS` keyword, if present.
    pub coordsys: Option<String>,
    /// One sample per pixel.
    pub values: Vec<f32>,
}

impl RawField {
    /// Move the samples into a validated [`SphericalField`].
    pub fn into_field(self) -> Result<SphericalField, FieldError> {
        SphericalField::new(self.nside, self.ordering, self.values)
    }
}

/// Read and validate the map at `path`.
pub fn load_field(path: &Path) -> Result<SphericalField, LoadError> {
    let raw = read_healpix_map(path)?;
    debug!(
        nside = raw.nside,
        ordering = %raw.ordering,
        coordsys = raw.coordsys.as_deref().unwrap_or("unknown"),
        "read healpix map"
    );
    Ok(raw.into_field()?)
}

/// Read the map at `path` without validating its length.
pub fn read_healpix_map(path: &Path) -> Result<RawField, LoadError> {
    let bytes = std::fs::read(path)?;
    parse_healpix_map(&bytes)
}

/// Parse a HEALPix map from the bytes of a FITS file.
pub fn parse_healpix_map(bytes: &[u8]) -> Result<RawField, LoadError> {
    let mut offset = 0;
    let primary = read_header(bytes, &mut offset)?;
    offset = skip_data(offset, primary.data_size()?, bytes.len())?;

    while offset < bytes.len() {
        let header = read_header(bytes, &mut offset)?;
        let size = header.data_size()?;
        if header.string("XTENSION").as_deref() == Some("BINTABLE") {
            let data = bytes.get(offset..).unwrap_or_default();
            return read_table(&header, data);
        }
        offset = skip_data(offset, size, bytes.len())?;
    }

    Err(LoadError::NoTable)
}

fn read_table(header: &Header, data: &[u8]) -> Result<RawField, LoadError> {
    let row_bytes = header.usize("NAXIS1")?;
    let rows = header.usize("NAXIS2")?;
    let tform = header
        .string("TFORM1")
        .ok_or(LoadError::MissingKeyword("TFORM1"))?;
    let (repeat, width) = parse_tform(&tform)?;
    let Some(column_bytes) = repeat
        .checked_mul(width)
        .filter(|&bytes| row_bytes > 0 && bytes <= row_bytes)
    else {
        return Err(LoadError::UnsupportedColumn(tform));
    };

    let needed = rows
        .checked_mul(row_bytes)
        .ok_or_else(|| LoadError::InvalidKeyword {
            keyword: "NAXIS2",
            value: rows.to_string(),
        })?;
    if data.len() < needed {
        return Err(LoadError::Truncated {
            needed,
            available: data.len(),
        });
    }

    let mut values = Vec::with_capacity(rows * repeat);
    for row in data[..needed].chunks_exact(row_bytes) {
        for cell in row[..column_bytes].chunks_exact(width) {
            values.push(match cell {
                &[a, b, c, d] => f32::from_be_bytes([a, b, c, d]),
                &[a, b, c, d, e, f, g, h] => f64::from_be_bytes([a, b, c, d, e, f, g, h]) as f32,
                _ => f32::NAN,
            });
        }
    }

    let nside = match header.int("NSIDE")? {
        Some(n) => u64::try_from(n).map_err(|_| LoadError::InvalidKeyword {
            keyword: "NSIDE",
            value: n.to_string(),
        })?,
        None => {
            let inferred = ((values.len() / 12) as f64).sqrt().round() as u64;
            warn!(nside = inferred, "NSIDE keyword missing, inferred from pixel count");
            inferred
        }
    };
    if nside > MAX_NSIDE {
        return Err(LoadError::InvalidKeyword {
            keyword: "NSIDE",
            value: nside.to_string(),
        });
    }
    let ordering = match header.string("ORDERING") {
        Some(keyword) => PixelOrdering::from_keyword(&keyword),
        None => {
            warn!("ORDERING keyword missing, assuming NESTED");
            PixelOrdering::Nest
        }
    };

    // Some writers pad the final row; keep exactly one sample per pixel.
    if values.len() > pixel_count(nside) {
        values.truncate(pixel_count(nside));
    }

    Ok(RawField {
        nside,
        ordering,
        coordsys: header.string("COORDSYS"),
        values,
    })
}

/// `(repeat, bytes per element)` of a binary table column format.
fn parse_tform(tform: &str) -> Result<(usize, usize), LoadError> {
    let tform = tform.trim();
    let split = tform
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| LoadError::UnsupportedColumn(tform.to_string()))?;
    let repeat = if split == 0 {
        1
    } else {
        tform[..split]
            .parse()
            .map_err(|_| LoadError::UnsupportedColumn(tform.to_string()))?
    };
    let width = match tform[split..].chars().next() {
        Some('E') => 4,
        Some('D') => 8,
        _ => return Err(LoadError::UnsupportedColumn(tform.to_string())),
    };
    Ok((repeat, width))
}

/// Offset just past a data unit of `size` bytes starting at `offset`.
fn skip_data(offset: usize, size: usize, available: usize) -> Result<usize, LoadError> {
    let end = size
        .checked_next_multiple_of(BLOCK)
        .and_then(|padded| offset.checked_add(padded))
        .unwrap_or(usize::MAX);
    if end > available {
        return Err(LoadError::Truncated {
            needed: end,
            available,
        });
    }
    Ok(end)
}

/// Keyword/value pairs of one header, values with quotes and comments removed.
struct Header {
    cards: Vec<(String, String)>,
}

impl Header {
    fn get(&self, keyword: &str) -> Option<&str> {
        self.cards
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, v)| v.as_str())
    }

    fn string(&self, keyword: &str) -> Option<String> {
        self.get(keyword).map(str::to_string)
    }

    fn int(&self, keyword: &'static str) -> Result<Option<i64>, LoadError> {
        self.get(keyword)
            .map(|v| {
                v.parse().map_err(|_| LoadError::InvalidKeyword {
                    keyword,
                    value: v.to_string(),
                })
            })
            .transpose()
    }

    fn usize(&self, keyword: &'static str) -> Result<usize, LoadError> {
        let value = self.int(keyword)?.ok_or(LoadError::MissingKeyword(keyword))?;
        usize::try_from(value).map_err(|_| LoadError::InvalidKeyword {
            keyword,
            value: value.to_string(),
        })
    }

    /// Size in bytes of the data unit following this header, before padding.
    fn data_size(&self) -> Result<usize, LoadError> {
        let naxis = self.int("NAXIS")?.unwrap_or(0);
        if naxis <= 0 {
            return Ok(0);
        }
        let bitpix = self.int("BITPIX")?.ok_or(LoadError::MissingKeyword("BITPIX"))?;
        let overflow = |keyword: &'static str, value: i64| LoadError::InvalidKeyword {
            keyword,
            value: format!("{value} (data unit size overflows)"),
        };

        let mut elements: usize = 1;
        for axis in 1..=naxis {
            let key = format!("NAXIS{axis}");
            let len = self.get(&key).and_then(|v| v.parse::<usize>().ok()).unwrap_or(0);
            elements = elements
                .checked_mul(len)
                .ok_or_else(|| overflow("NAXIS", axis))?;
        }
        let pcount = self.int("PCOUNT")?.unwrap_or(0).max(0);
        let gcount = self.int("GCOUNT")?.unwrap_or(1).max(1);
        let pcount = usize::try_from(pcount).map_err(|_| overflow("PCOUNT", pcount))?;
        let gcount = usize::try_from(gcount).map_err(|_| overflow("GCOUNT", gcount))?;

        pcount
            .checked_add(elements)
            .and_then(|n| n.checked_mul(gcount))
            .and_then(|n| n.checked_mul(bitpix.unsigned_abs() as usize / 8))
            .ok_or_else(|| overflow("BITPIX", bitpix))
    }
}

fn read_header(bytes: &[u8], offset: &mut usize) -> Result<Header, LoadError> {
    let mut cards = Vec::new();
    loop {
        let end = offset.saturating_add(BLOCK);
        let block = bytes.get(*offset..end).ok_or(LoadError::Truncated {
            needed: end,
            available: bytes.len(),
        })?;
        *offset = end;

        for card in block.chunks_exact(CARD) {
            let text: String = card
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect();
            let keyword = text[..8].trim_end();
            if keyword == "END" {
                return Ok(Header { cards });
            }
            if &text[8..10] == "= " {
                cards.push((keyword.to_string(), card_value(&text[10..])));
            }
        }
    }
}

fn card_value(raw: &str) -> String {
    let raw = raw.trim_start();
    if let Some(quoted) = raw.strip_prefix('\'') {
        // '' inside a string is an escaped quote.
        let mut value = String::new();
        let mut chars = quoted.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                } else {
                    break;
                }
            }
            value.push(c);
        }
        value.trim_end().to_string()
    } else {
        raw.split('/').next().unwrap_or_default().trim().to_string()
    }
}

/// Encode a map as a single-column FITS binary table with `nside` rows.
pub fn encode_healpix_map(nside: u64, ordering: PixelOrdering, values: &[f32]) -> Vec<u8> {
    let per_row = (12 * nside) as usize;
    let rows = values.len().div_ceil(per_row.max(1));

    let mut out = Vec::new();
    write_header(
        &mut out,
        &[
            ("SIMPLE", "T".to_string()),
            ("BITPIX", "8".to_string()),
            ("NAXIS", "0".to_string()),
            ("EXTEND", "T".to_string()),
        ],
    );
    write_header(
        &mut out,
        &[
            ("XTENSION", "'BINTABLE'".to_string()),
            ("BITPIX", "8".to_string()),
            ("NAXIS", "2".to_string()),
            ("NAXIS1", (per_row * 4).to_string()),
            ("NAXIS2", rows.to_string()),
            ("PCOUNT", "0".to_string()),
            ("GCOUNT", "1".to_string()),
            ("TFIELDS", "1".to_string()),
            ("TTYPE1", "'SIGNAL  '".to_string()),
            ("TFORM1", format!("'{per_row}E'")),
            ("PIXTYPE", "'HEALPIX '".to_string()),
            ("ORDERING", format!("'{ordering}'")),
            ("NSIDE", nside.to_string()),
            ("COORDSYS", "'G       '".to_string()),
        ],
    );

    let start = out.len();
    for value in values {
        out.extend_from_slice(&value.to_be_bytes());
    }
    out.resize(start + rows * per_row * 4, 0);
    out.resize(start + (out.len() - start).next_multiple_of(BLOCK), 0);
    out
}

fn write_header(out: &mut Vec<u8>, cards: &[(&str, String)]) {
    let start = out.len();
    for (keyword, value) in cards {
        let card = format!("{keyword:<8}= {value:>20}");
        out.extend_from_slice(format!("{card:<80}").as_bytes());
    }
    out.extend_from_slice(format!("{:<80}", "END").as_bytes());
    out.resize(start + (out.len() - start).next_multiple_of(BLOCK), b' ');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(nside: u64) -> Vec<f32> {
        (0..pixel_count(nside)).map(|i| i as f32 * 0.5).collect()
    }

    #[test]
    fn test_parse_encoded_map() {
        let values = ramp(4);
        let bytes = encode_healpix_map(4, PixelOrdering::Ring, &values);
        assert_eq!(bytes.len() % BLOCK, 0);

        let raw = parse_healpix_map(&bytes).unwrap();
        assert_eq!(raw.nside, 4);
        assert_eq!(raw.ordering, PixelOrdering::Ring);
        assert_eq!(raw.coordsys.as_deref(), Some("G"));
        assert_eq!(raw.values, values);
    }

    #[test]
    fn test_into_field_validates() {
        let bytes = encode_healpix_map(2, PixelOrdering::Nest, &ramp(2));
        let field = parse_healpix_map(&bytes).unwrap().into_field().unwrap();
        assert_eq!(field.order(), 1);
        assert_eq!(field.ordering(), PixelOrdering::Nest);
    }

    #[test]
    fn test_truncated_data() {
        let bytes = encode_healpix_map(8, PixelOrdering::Nest, &ramp(8));
        let cut = &bytes[..bytes.len() - BLOCK];
        assert!(matches!(
            parse_healpix_map(cut),
            Err(LoadError::Truncated { .. })
        ));
    }

    /// Rewrite the value of the first header card named `keyword`.
    fn set_card(bytes: &mut [u8], keyword: &str, value: &str) {
        let prefix = format!("{keyword:<8}=");
        let card = bytes
            .chunks_exact_mut(CARD)
            .find(|card| card.starts_with(prefix.as_bytes()))
            .unwrap();
        let text = format!("{:<80}", format!("{keyword:<8}= {value:>20}"));
        card.copy_from_slice(text.as_bytes());
    }

    #[test]
    fn test_oversized_nside_is_rejected() {
        let mut bytes = encode_healpix_map(2, PixelOrdering::Nest, &ramp(2));
        set_card(&mut bytes, "NSIDE", "4294967296");
        assert!(matches!(
            parse_healpix_map(&bytes),
            Err(LoadError::InvalidKeyword {
                keyword: "NSIDE",
                ..
            })
        ));
    }

    #[test]
    fn test_overflowing_row_count_is_rejected() {
        let mut bytes = encode_healpix_map(2, PixelOrdering::Nest, &ramp(2));
        set_card(&mut bytes, "NAXIS2", "4611686018427387904");
        assert!(matches!(
            parse_healpix_map(&bytes),
            Err(LoadError::InvalidKeyword { .. })
        ));
    }

    #[test]
    fn test_huge_primary_data_is_truncated() {
        let mut bytes = encode_healpix_map(2, PixelOrdering::Nest, &ramp(2));
        // Primary cards are SIMPLE, BITPIX, NAXIS, EXTEND, END.
        set_card(&mut bytes, "NAXIS", "1");
        let axis = format!("{:<80}", format!("{:<8}= {:>20}", "NAXIS1", usize::MAX / 2));
        bytes[4 * CARD..5 * CARD].copy_from_slice(axis.as_bytes());
        bytes[5 * CARD..6 * CARD].copy_from_slice(format!("{:<80}", "END").as_bytes());
        assert!(matches!(
            parse_healpix_map(&bytes),
            Err(LoadError::Truncated { .. })
        ));
    }

    #[test]
    fn test_not_fits() {
        assert!(parse_healpix_map(b"hello").is_err());
    }

    #[test]
    fn test_primary_only_has_no_table() {
        let mut out = Vec::new();
        write_header(&mut out, &[("SIMPLE", "T".to_string()), ("NAXIS", "0".to_string())]);
        assert!(matches!(parse_healpix_map(&out), Err(LoadError::NoTable)));
    }

    #[test]
    fn test_parse_tform() {
        assert_eq!(parse_tform("1024E").unwrap(), (1024, 4));
        assert_eq!(parse_tform("E").unwrap(), (1, 4));
        assert_eq!(parse_tform("D").unwrap(), (1, 8));
        assert!(parse_tform("1J").is_err());
        assert!(parse_tform("12").is_err());
    }

    #[test]
    fn test_card_value() {
        assert_eq!(card_value("  'RING    '  / ordering"), "RING");
        assert_eq!(card_value("                  64 / nside"), "64");
        assert_eq!(card_value("'it''s'"), "it's");
    }

    #[test]
    fn test_load_field_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.fits");
        std::fs::write(&path, encode_healpix_map(2, PixelOrdering::Nest, &ramp(2))).unwrap();
        let field = load_field(&path).unwrap();
        assert_eq!(field.len(), 48);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_field(&dir.path().join("absent.fits")),
            Err(LoadError::Io(_))
        ));
    }
}
