//! I2C bus helpers

use embedded_hal::i2c::I2c;

/// First non-reserved 7-bit address
pub const FIRST_ADDRESS: u8 = 0x08;

/// Last non-reserved 7-bit address
pub const LAST_ADDRESS: u8 = 0x77;

/// Set of 7-bit addresses that answered a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressSet(u128);

impl AddressSet {
    /// Empty set
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add an address; anything above 0x7f is ignored
    pub fn insert(&mut self, addr: u8) {
        if addr < 0x80 {
            self.0 |= 1 << addr;
        }
    }

    /// Whether `addr` answered
    #[must_use]
    pub const fn contains(&self, addr: u8) -> bool {
        addr < 0x80 && self.0 & (1 << addr) != 0
    }

    /// Number of addresses in the set
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether nothing answered
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Addresses in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..0x80).filter(|&addr| self.contains(addr))
    }
}

/// Probe every non-reserved address with an empty write and collect the ones that acknowledge
///
/// Bus errors are taken as absence; nothing is retried
pub fn scan<I2C>(i2c: &mut I2C) -> AddressSet
where
    I2C: I2c,
{
    let mut found = AddressSet::new();
    for addr in FIRST_ADDRESS..=LAST_ADDRESS {
        if i2c.write(addr, &[]).is_ok() {
            found.insert(addr);
        }
    }
    found
}
