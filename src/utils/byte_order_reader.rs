/*
This file is part of the las_codec library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::trimmed_string;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::prelude::*;
use std::io::{Result, SeekFrom};

/// Reads typed values from a seekable source, tracking the current position.
pub struct ByteOrderReader<R: Read + Seek> {
    is_le: bool,
    reader: R,
    pos: u64,
}

impl<R: Read + Seek> ByteOrderReader<R> {
    pub fn new(reader: R, byte_order: Endianness) -> ByteOrderReader<R> {
        ByteOrderReader {
            reader: reader,
            is_le: byte_order == Endianness::LittleEndian,
            pos: 0u64,
        }
    }

    pub fn get_byte_order(&self) -> Endianness {
        if self.is_le {
            return Endianness::LittleEndian;
        }
        Endianness::BigEndian
    }

    pub fn seek(&mut self, position: u64) -> Result<()> {
        self.pos = self.reader.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    pub fn skip(&mut self, num_bytes: u64) -> Result<()> {
        let pos = self.pos + num_bytes;
        self.seek(pos)
    }

    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Reads a fixed-width text field, dropping everything from the first NUL on.
    pub fn read_string(&mut self, length: usize) -> Result<String> {
        let bytes = self.read_bytes(length)?;
        Ok(trimmed_string(&bytes))
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; length];
        self.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.reader.read_exact(buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let val = self.reader.read_u8()?;
        self.pos += 1;
        Ok(val)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        let val = self.reader.read_i8()?;
        self.pos += 1;
        Ok(val)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let val = if self.is_le {
            self.reader.read_u16::<LittleEndian>()?
        } else {
            self.reader.read_u16::<BigEndian>()?
        };
        self.pos += 2;
        Ok(val)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let val = if self.is_le {
            self.reader.read_u32::<LittleEndian>()?
        } else {
            self.reader.read_u32::<BigEndian>()?
        };
        self.pos += 4;
        Ok(val)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let val = if self.is_le {
            self.reader.read_u64::<LittleEndian>()?
        } else {
            self.reader.read_u64::<BigEndian>()?
        };
        self.pos += 8;
        Ok(val)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let val = if self.is_le {
            self.reader.read_f64::<LittleEndian>()?
        } else {
            self.reader.read_f64::<BigEndian>()?
        };
        self.pos += 8;
        Ok(val)
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Endianness {
    LittleEndian,
    BigEndian,
}

impl Default for Endianness {
    fn default() -> Endianness {
        Endianness::LittleEndian
    }
}
