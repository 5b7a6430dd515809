//! Container header format
//!
//! A colfs container starts with a 16-byte header holding the negotiated
//! access-policy flags. Create writes a fresh header; open validates it and
//! rewrites the flags byte to the opening policy, which is what lets a
//! later query derive the policy from the file rather than from in-memory
//! state.
//!
//! # File Structure
//!
//! ```text
//! +------------------+ 0
//! | Magic "CFSH"     | 4 bytes
//! +------------------+ 4
//! | Format version   | 4 bytes (u32 LE)
//! +------------------+ 8
//! | Policy flags     | 1 byte (bit0 writes, bit1 reads)
//! +------------------+ 9
//! | Reserved         | 3 bytes
//! +------------------+ 12
//! | CRC32 of 0..12   | 4 bytes (u32 LE)
//! +------------------+ 16
//! ```

use colfs_core::{AccessPolicy, Error, GroupId, Result};

/// Magic bytes: "CFSH"
pub const CONTAINER_MAGIC: [u8; 4] = *b"CFSH";

/// Container format version for forward compatibility
pub const CONTAINER_FORMAT_VERSION: u32 = 1;

/// Container header size in bytes
pub const CONTAINER_HEADER_SIZE: usize = 16;

const FLAG_METADATA_WRITES: u8 = 0b0000_0001;
const FLAG_METADATA_READS: u8 = 0b0000_0010;

/// Parsed container header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Format version read from (or written to) the file
    pub format_version: u32,
    /// Whether metadata writes were negotiated collective
    pub metadata_writes_collective: bool,
    /// Whether metadata reads were negotiated collective
    pub metadata_reads_collective: bool,
}

impl ContainerHeader {
    /// Header carrying the flags of `policy` at the current format version
    pub fn from_policy(policy: &AccessPolicy) -> Self {
        let (writes, reads) = policy.flags();
        ContainerHeader {
            format_version: CONTAINER_FORMAT_VERSION,
            metadata_writes_collective: writes,
            metadata_reads_collective: reads,
        }
    }

    /// Persisted flags as a `(writes, reads)` pair
    pub fn flags(&self) -> (bool, bool) {
        (self.metadata_writes_collective, self.metadata_reads_collective)
    }

    /// Rebuild an [`AccessPolicy`] bound to `group` from the persisted flags
    pub fn to_policy(&self, group: GroupId) -> AccessPolicy {
        AccessPolicy::from_flags(
            group,
            self.metadata_writes_collective,
            self.metadata_reads_collective,
        )
    }

    /// Serialize header to bytes
    pub fn to_bytes(&self) -> [u8; CONTAINER_HEADER_SIZE] {
        let mut bytes = [0u8; CONTAINER_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&CONTAINER_MAGIC);
        bytes[4..8].copy_from_slice(&self.format_version.to_le_bytes());
        let mut flags = 0u8;
        if self.metadata_writes_collective {
            flags |= FLAG_METADATA_WRITES;
        }
        if self.metadata_reads_collective {
            flags |= FLAG_METADATA_READS;
        }
        bytes[8] = flags;
        // bytes 9..12 reserved, already zero
        let crc = crc32fast::hash(&bytes[0..12]);
        bytes[12..16].copy_from_slice(&crc.to_le_bytes());
        bytes
    }

    /// Parse and validate a header from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`] on bad magic, an unsupported format
    /// version, a CRC mismatch, or set reserved/flag bits this version does
    /// not define.
    pub fn from_bytes(bytes: &[u8; CONTAINER_HEADER_SIZE]) -> Result<Self> {
        if bytes[0..4] != CONTAINER_MAGIC {
            return Err(Error::corruption(format!(
                "bad magic {:02x?}, expected {:02x?}",
                &bytes[0..4],
                CONTAINER_MAGIC
            )));
        }
        let format_version = u32::from_le_bytes(bytes[4..8].try_into().unwrap_or([0; 4]));
        if format_version > CONTAINER_FORMAT_VERSION {
            return Err(Error::corruption(format!(
                "unsupported format version {format_version} (max {CONTAINER_FORMAT_VERSION})"
            )));
        }
        let stored_crc = u32::from_le_bytes(bytes[12..16].try_into().unwrap_or([0; 4]));
        let computed_crc = crc32fast::hash(&bytes[0..12]);
        if stored_crc != computed_crc {
            return Err(Error::corruption(format!(
                "header CRC mismatch: stored {stored_crc:#010x}, computed {computed_crc:#010x}"
            )));
        }
        let flags = bytes[8];
        if flags & !(FLAG_METADATA_WRITES | FLAG_METADATA_READS) != 0 {
            return Err(Error::corruption(format!(
                "undefined policy flag bits set: {flags:#04x}"
            )));
        }
        Ok(ContainerHeader {
            format_version,
            metadata_writes_collective: flags & FLAG_METADATA_WRITES != 0,
            metadata_reads_collective: flags & FLAG_METADATA_READS != 0,
        })
    }
}
