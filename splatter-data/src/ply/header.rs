//! PLY header reading, parsing and extraction.

use crate::error::PlyError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Encoding declared by the `format` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

/// Scalar property types and their on-disk sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl ScalarType {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "char" | "int8" => ScalarType::Int8,
            "uchar" | "uint8" => ScalarType::UInt8,
            "short" | "int16" => ScalarType::Int16,
            "ushort" | "uint16" => ScalarType::UInt16,
            "int" | "int32" => ScalarType::Int32,
            "uint" | "uint32" => ScalarType::UInt32,
            "float" | "float32" => ScalarType::Float32,
            "double" | "float64" => ScalarType::Float64,
            _ => return None,
        })
    }

    /// Size in bytes of one value.
    pub fn size(self) -> usize {
        match self {
            ScalarType::Int8 | ScalarType::UInt8 => 1,
            ScalarType::Int16 | ScalarType::UInt16 => 2,
            ScalarType::Int32 | ScalarType::UInt32 | ScalarType::Float32 => 4,
            ScalarType::Float64 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Scalar(ScalarType),
    List { count: ScalarType, item: ScalarType },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyProperty {
    pub name: String,
    pub kind: PropertyKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyElement {
    pub name: String,
    pub count: usize,
    pub properties: Vec<PlyProperty>,
}

impl PlyElement {
    /// Byte size of one record, or `None` if any property is a list.
    pub fn record_size(&self) -> Option<usize> {
        self.properties
            .iter()
            .map(|p| match p.kind {
                PropertyKind::Scalar(ty) => Some(ty.size()),
                PropertyKind::List { .. } => None,
            })
            .sum()
    }

    /// Byte offset and type of a scalar property within one record.
    pub fn scalar_offset(&self, name: &str) -> Option<(usize, ScalarType)> {
        let mut offset = 0;
        for property in &self.properties {
            match property.kind {
                PropertyKind::Scalar(ty) if property.name == name => return Some((offset, ty)),
                PropertyKind::Scalar(ty) => offset += ty.size(),
                PropertyKind::List { .. } => return None,
            }
        }
        None
    }
}

/// Parsed PLY header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyHeader {
    pub format: PlyFormat,
    pub elements: Vec<PlyElement>,
    pub comments: Vec<String>,
}

impl PlyHeader {
    /// Parse header text up to and including `end_header`.
    pub fn parse(bytes: &[u8]) -> Result<Self, PlyError> {
        let text = String::from_utf8_lossy(bytes);
        let mut lines = text.lines().enumerate();

        match lines.next() {
            Some((_, magic)) if magic.trim() == "ply" => {}
            _ => {
                return Err(PlyError::InvalidHeader {
                    line: 1,
                    message: "missing 'ply' magic".into(),
                });
            }
        }

        let mut format = None;
        let mut elements: Vec<PlyElement> = Vec::new();
        let mut comments = Vec::new();

        for (i, line) in lines {
            let line_no = i + 1;
            let invalid = |message: &str| PlyError::InvalidHeader {
                line: line_no,
                message: message.to_string(),
            };
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("format") => {
                    format = Some(match tokens.next() {
                        Some("ascii") => PlyFormat::Ascii,
                        Some("binary_little_endian") => PlyFormat::BinaryLittleEndian,
                        Some("binary_big_endian") => PlyFormat::BinaryBigEndian,
                        _ => return Err(invalid("unknown format")),
                    });
                }
                Some("comment") => {
                    comments.push(line.trim_start()["comment".len()..].trim().to_string());
                }
                Some("obj_info") | None => {}
                Some("element") => {
                    let name = tokens.next().ok_or_else(|| invalid("element without name"))?;
                    let count = tokens
                        .next()
                        .and_then(|c| c.parse().ok())
                        .ok_or_else(|| invalid("element without count"))?;
                    elements.push(PlyElement {
                        name: name.to_string(),
                        count,
                        properties: Vec::new(),
                    });
                }
                Some("property") => {
                    let element = elements
                        .last_mut()
                        .ok_or_else(|| invalid("property before any element"))?;
                    let ty = tokens.next().ok_or_else(|| invalid("property without type"))?;
                    let kind = if ty == "list" {
                        let count = tokens.next().and_then(ScalarType::parse);
                        let item = tokens.next().and_then(ScalarType::parse);
                        match (count, item) {
                            (Some(count), Some(item)) => PropertyKind::List { count, item },
                            _ => return Err(invalid("bad list property types")),
                        }
                    } else {
                        PropertyKind::Scalar(
                            ScalarType::parse(ty).ok_or_else(|| invalid("unknown property type"))?,
                        )
                    };
                    let name = tokens.next().ok_or_else(|| invalid("property without name"))?;
                    element.properties.push(PlyProperty {
                        name: name.to_string(),
                        kind,
                    });
                }
                Some("end_header") => break,
                Some(other) => return Err(invalid(&format!("unexpected keyword '{}'", other))),
            }
        }

        let format = format.ok_or(PlyError::InvalidHeader {
            line: 2,
            message: "missing format line".into(),
        })?;

        Ok(Self {
            format,
            elements,
            comments,
        })
    }

    pub fn element(&self, name: &str) -> Option<&PlyElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Texture file named by a `comment TextureFile <name>` line.
    pub fn texture_file(&self) -> Option<&str> {
        self.comments.iter().find_map(|c| {
            c.strip_prefix("TextureFile")
                .map(str::trim)
                .filter(|name| !name.is_empty())
        })
    }
}

/// Raw header bytes as they appear in the file.
#[derive(Debug, Clone)]
pub struct RawHeader {
    pub bytes: Vec<u8>,
    /// Whether an `end_header` line was found before end of input.
    pub terminated: bool,
}

impl RawHeader {
    pub fn parse(&self) -> Result<PlyHeader, PlyError> {
        if !self.terminated {
            return Err(PlyError::MissingEndHeader);
        }
        PlyHeader::parse(&self.bytes)
    }
}

/// Read header lines up to and including `end_header`.
///
/// The reader is left positioned at the first byte of the body.
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<RawHeader, PlyError> {
    let mut bytes = Vec::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(RawHeader {
                bytes,
                terminated: false,
            });
        }
        bytes.extend_from_slice(&line);
        if line.trim_ascii() == b"end_header" {
            return Ok(RawHeader {
                bytes,
                terminated: true,
            });
        }
    }
}

/// Copy the header of `input` byte-for-byte into `output`.
///
/// Returns the number of header bytes written. A file without an
/// `end_header` line is copied in full.
#[tracing::instrument(skip_all, fields(path = %input.display()))]
pub fn extract_header(input: &Path, output: &Path) -> Result<usize, PlyError> {
    let file = File::open(input).map_err(|e| PlyError::io(input, e))?;
    let mut reader = BufReader::new(file);
    let header = read_header(&mut reader).map_err(|e| match e {
        PlyError::Stream(source) => PlyError::io(input, source),
        other => other,
    })?;

    if !header.terminated {
        warn!("No end_header line found, copying {} bytes", header.bytes.len());
    }

    let out = File::create(output).map_err(|e| PlyError::io(output, e))?;
    let mut writer = BufWriter::new(out);
    writer
        .write_all(&header.bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| PlyError::io(output, e))?;

    debug!("Header is {} bytes", header.bytes.len());
    info!("Header written to {}", output.display());
    Ok(header.bytes.len())
}
