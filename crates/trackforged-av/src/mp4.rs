//! Top-level MP4 atom scanning.
//!
//! Only atom headers are read (plus the small `ftyp` payload), so scanning a
//! multi-gigabyte file costs a handful of seeks.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Largest `ftyp` payload we are willing to read.
const MAX_FTYP_SIZE: u64 = 4096;

/// Four-character atom type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AtomType(pub [u8; 4]);

impl AtomType {
    pub const FTYP: Self = Self(*b"ftyp");
    pub const MOOV: Self = Self(*b"moov");
    pub const MDAT: Self = Self(*b"mdat");
    pub const MOOF: Self = Self(*b"moof");
    pub const FREE: Self = Self(*b"free");
    pub const SKIP: Self = Self(*b"skip");
    pub const WIDE: Self = Self(*b"wide");
    pub const UUID: Self = Self(*b"uuid");

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Get the 4-char code as a string.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }

    /// Real atom codes are printable ASCII; anything else means we are not
    /// looking at an atom header.
    fn is_plausible(&self) -> bool {
        self.0.iter().all(|b| (0x20..=0x7e).contains(b))
    }
}

impl std::fmt::Display for AtomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<AtomType> for String {
    fn from(atom: AtomType) -> Self {
        atom.as_str().to_string()
    }
}

impl TryFrom<String> for AtomType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let bytes: [u8; 4] = value
            .as_bytes()
            .try_into()
            .map_err(|_| format!("atom type must be 4 bytes: {:?}", value))?;
        Ok(Self(bytes))
    }
}

/// One top-level atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopLevelAtom {
    pub atom_type: AtomType,
    /// File offset of the atom header.
    pub offset: u64,
    /// Atom size including header.
    pub size: u64,
}

/// Order and identity of the top-level atoms in a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomLayout {
    pub atoms: Vec<TopLevelAtom>,
    /// `ftyp` major brand, if present.
    pub major_brand: Option<String>,
    /// `ftyp` compatible brands.
    pub compatible_brands: Vec<String>,
    /// The scan stopped at a header that ran past the end of the file or was
    /// not a valid atom.
    pub truncated: bool,
}

impl AtomLayout {
    fn offset_of(&self, atom_type: AtomType) -> Option<u64> {
        self.atoms
            .iter()
            .find(|a| a.atom_type == atom_type)
            .map(|a| a.offset)
    }

    pub fn moov_offset(&self) -> Option<u64> {
        self.offset_of(AtomType::MOOV)
    }

    pub fn mdat_offset(&self) -> Option<u64> {
        self.offset_of(AtomType::MDAT)
    }

    /// Whether `moov` precedes the first `mdat`.
    ///
    /// A `moov` with no `mdat` at all (fragmented or metadata-only files)
    /// counts as faststart. Without a `moov` the layout says nothing.
    pub fn is_faststart(&self) -> Option<bool> {
        match (self.moov_offset(), self.mdat_offset()) {
            (Some(moov), Some(mdat)) => Some(moov < mdat),
            (Some(_), None) => Some(true),
            (None, _) => None,
        }
    }

    /// Atom codes in file order, e.g. `ftyp, moov, mdat`.
    pub fn summary(&self) -> String {
        self.atoms
            .iter()
            .map(|a| a.atom_type.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Scan the top-level atoms of an MP4 stream.
///
/// # Errors
///
/// Returns [`Error::InvalidMp4`] when the very first header is not an atom.
pub fn scan_top_level<R: Read + Seek>(reader: &mut R) -> Result<AtomLayout> {
    let end = reader.seek(SeekFrom::End(0))?;
    let mut layout = AtomLayout::default();
    let mut pos = 0u64;

    while pos < end {
        reader.seek(SeekFrom::Start(pos))?;

        let mut header = [0u8; 8];
        if reader.read_exact(&mut header).is_err() {
            layout.truncated = true;
            break;
        }

        let size = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as u64;
        let atom_type = AtomType::from_bytes([header[4], header[5], header[6], header[7]]);

        if !atom_type.is_plausible() {
            if layout.atoms.is_empty() {
                return Err(Error::invalid_mp4(format!(
                    "no atom header at offset 0 ({:02x?})",
                    header
                )));
            }
            layout.truncated = true;
            break;
        }

        let (actual_size, header_size) = if size == 1 {
            // 64-bit extended size
            let mut ext = [0u8; 8];
            if reader.read_exact(&mut ext).is_err() {
                layout.truncated = true;
                break;
            }
            (u64::from_be_bytes(ext), 16u64)
        } else if size == 0 {
            // Atom extends to end of file
            (end - pos, 8u64)
        } else {
            (size, 8u64)
        };

        if actual_size < header_size {
            layout.truncated = true;
            break;
        }

        if atom_type == AtomType::FTYP {
            read_brands(reader, actual_size - header_size, &mut layout)?;
        }

        layout.atoms.push(TopLevelAtom {
            atom_type,
            offset: pos,
            size: actual_size,
        });

        match pos.checked_add(actual_size) {
            Some(next) if next <= end => pos = next,
            _ => {
                layout.truncated = true;
                break;
            }
        }
    }

    if layout.atoms.is_empty() {
        return Err(Error::invalid_mp4("no atoms found"));
    }

    Ok(layout)
}

/// Scan the top-level atoms of a file on disk.
pub fn scan_file(path: &Path) -> Result<AtomLayout> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }
    let mut reader = BufReader::new(File::open(path)?);
    scan_top_level(&mut reader)
}

fn read_brands<R: Read>(reader: &mut R, data_size: u64, layout: &mut AtomLayout) -> Result<()> {
    if !(8..=MAX_FTYP_SIZE).contains(&data_size) {
        return Ok(());
    }
    let mut data = vec![0u8; data_size as usize];
    if reader.read_exact(&mut data).is_err() {
        return Ok(());
    }

    let brand = |chunk: &[u8]| String::from_utf8_lossy(chunk).trim().to_string();

    layout.major_brand = Some(brand(&data[0..4]));
    // data[4..8] is the minor version
    layout.compatible_brands = data[8..]
        .chunks_exact(4)
        .map(brand)
        .filter(|b| !b.is_empty())
        .collect();

    Ok(())
}
