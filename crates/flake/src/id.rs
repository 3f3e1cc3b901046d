use core::fmt;

/// A 64-bit flake ID.
///
/// - 1 bit reserved
/// - 41 bits timestamp (ms since the generator's epoch, ~69 years of range)
/// - 10 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21            12 11             0
///              +--------------+----------------+----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | worker ID (10) | sequence (12) |
///              +--------------+----------------+----------------+---------------+
///              |<----------- MSB ---------- 64 bits ---------- LSB ------------>|
/// ```
///
/// # Example
///
/// ```
/// use flake::FlakeId;
///
/// let id = FlakeId::from_components(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.worker_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// assert_eq!(id.to_raw(), (1000 << 22) | (2 << 12) | 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlakeId {
    id: u64,
}

impl FlakeId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u32 = 41;

    /// Width of the worker ID field.
    pub const WORKER_ID_BITS: u32 = 10;

    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u32 = 12;

    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for extracting the 10-bit worker ID field. Occupies bits 12
    /// through 21.
    pub const WORKER_ID_MASK: u64 = (1 << Self::WORKER_ID_BITS) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 = Self::WORKER_ID_SHIFT + Self::WORKER_ID_BITS;

    /// Number of bits to shift the worker ID to its position (bit 12).
    pub const WORKER_ID_SHIFT: u32 = Self::SEQUENCE_BITS;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Largest timestamp offset the layout can hold.
    pub const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;

    /// Largest worker ID the layout can hold.
    pub const MAX_WORKER_ID: u64 = Self::WORKER_ID_MASK;

    /// Largest sequence value the layout can hold.
    pub const MAX_SEQUENCE: u64 = Self::SEQUENCE_MASK;

    /// Packs the three fields into an ID. Each field is masked to its width.
    pub const fn from_components(timestamp: u64, worker_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | worker_id | sequence,
        }
    }

    /// Extracts the timestamp (ms since the epoch) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the raw `u64` value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Wraps a raw `u64` without validation. See [`FlakeId::is_valid`].
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns `true` if the reserved high bit is clear.
    pub const fn is_valid(&self) -> bool {
        self.id >> (Self::TIMESTAMP_SHIFT + Self::TIMESTAMP_BITS) == 0
    }

    /// Returns the absolute creation time of the ID in milliseconds since the
    /// Unix epoch, given the epoch it was generated against.
    pub const fn unix_millis(&self, epoch_millis: u64) -> u64 {
        epoch_millis + self.timestamp()
    }

    /// Returns the ID as a zero-padded 20-digit string, so that lexicographic
    /// order matches numeric order.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<FlakeId> for u64 {
    fn from(id: FlakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
